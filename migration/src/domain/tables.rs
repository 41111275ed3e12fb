use std::collections::HashSet;

/// Inspects the tables that already exist in the target schema.
pub trait Tables: Send + Sync + Clone + 'static {
    /// load table names from database
    fn load(&self) -> impl Future<Output = Result<HashSet<String>, anyhow::Error>> + Send;
}
