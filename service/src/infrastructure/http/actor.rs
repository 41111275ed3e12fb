use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{
    domain::actor::{Actor, Role},
    infrastructure::http::api::ApiError,
};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_NAME_HEADER: &str = "x-user-name";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Caller identity taken from request headers.
///
/// The headers are trusted as-is. Replacing this extractor with one backed by
/// a verified identity provider is the only change needed to authenticate
/// callers; handlers only ever see the resulting [`Actor`].
#[derive(Debug, Clone)]
pub struct CurrentActor(pub Actor);

impl<S> FromRequestParts<S> for CurrentActor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = header(parts, USER_ID_HEADER)?;
        let name = header(parts, USER_NAME_HEADER)?;
        let role = header(parts, USER_ROLE_HEADER)?
            .parse::<Role>()
            .map_err(|err| ApiError::Unauthenticated(err.to_string()))?;

        Ok(CurrentActor(Actor::new(id, name, role)))
    }
}

fn header<'a>(parts: &'a Parts, name: &str) -> Result<&'a str, ApiError> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ApiError::Unauthenticated(format!("missing or invalid {} header", name)))
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    async fn extract(request: Request<()>) -> Result<CurrentActor, ApiError> {
        let (mut parts, _) = request.into_parts();
        CurrentActor::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn reads_all_three_headers() {
        let request = Request::builder()
            .header(USER_ID_HEADER, "u-1")
            .header(USER_NAME_HEADER, "Ada")
            .header(USER_ROLE_HEADER, "Leadership")
            .body(())
            .unwrap();

        let CurrentActor(actor) = extract(request).await.unwrap();
        assert_eq!(actor, Actor::new("u-1", "Ada", Role::Leadership));
    }

    #[tokio::test]
    async fn unknown_role_is_unauthenticated() {
        let request = Request::builder()
            .header(USER_ID_HEADER, "u-1")
            .header(USER_NAME_HEADER, "Ada")
            .header(USER_ROLE_HEADER, "editor-in-chief")
            .body(())
            .unwrap();

        assert!(matches!(extract(request).await, Err(ApiError::Unauthenticated(_))));
    }

    #[tokio::test]
    async fn missing_id_is_unauthenticated() {
        let request = Request::builder()
            .header(USER_NAME_HEADER, "Ada")
            .header(USER_ROLE_HEADER, "staff")
            .body(())
            .unwrap();

        assert!(matches!(extract(request).await, Err(ApiError::Unauthenticated(_))));
    }
}
