pub mod migration;
pub mod settings;
pub mod tables;
