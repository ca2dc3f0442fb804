//! Per-request acting user, taken from the `X-User-Id` and `X-User-Role`
//! headers. Nothing is authorized against it; it only labels log spans.

use super::error::ApiError;
use crate::errors::Error;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::fmt;

/// Header carrying the acting user's id.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the acting user's role.
pub const USER_ROLE_HEADER: &str = "x-user-role";

const ANONYMOUS_USER: &str = "anonymous";

/// Back-office role of the acting user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UserRole {
    /// Full back-office access
    #[default]
    Admin,
    /// Billing and collections staff
    Finance,
    /// Coaching staff
    Coach,
    /// Front desk and scheduling
    Operations,
}

impl UserRole {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "finance" => Some(Self::Finance),
            "coach" => Some(Self::Coach),
            "operations" => Some(Self::Operations),
            _ => None,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Admin => "admin",
            Self::Finance => "finance",
            Self::Coach => "coach",
            Self::Operations => "operations",
        })
    }
}

/// Who is making the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Opaque user id, `anonymous` when absent
    pub user_id: String,
    /// Role, `admin` when absent
    pub role: UserRole,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self {
            user_id: ANONYMOUS_USER.to_string(),
            role: UserRole::Admin,
        }
    }
}

fn header_value<'a>(parts: &'a Parts, name: &str) -> Result<Option<&'a str>, ApiError> {
    parts
        .headers
        .get(name)
        .map(|value| {
            value
                .to_str()
                .map(str::trim)
                .map_err(|_| Error::validation(format!("{name} header is not valid text")))
        })
        .transpose()
        .map(|value| value.filter(|v| !v.is_empty()))
        .map_err(ApiError::from)
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let mut context = Self::default();
        if let Some(user_id) = header_value(parts, USER_ID_HEADER)? {
            context.user_id = user_id.to_string();
        }
        if let Some(role) = header_value(parts, USER_ROLE_HEADER)? {
            context.role = UserRole::parse(role)
                .ok_or_else(|| Error::validation(format!("unknown role '{role}'")))?;
        }
        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Result<RequestContext, ApiError> {
        let (mut parts, ()) = request.into_parts();
        RequestContext::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_defaults_to_anonymous_admin() {
        let context = extract(Request::builder().body(()).unwrap()).await.unwrap();
        assert_eq!(context, RequestContext::default());
        assert_eq!(context.user_id, "anonymous");
        assert_eq!(context.role, UserRole::Admin);
    }

    #[tokio::test]
    async fn test_reads_headers() {
        let request = Request::builder()
            .header("X-User-Id", "u-42")
            .header("X-User-Role", "Finance")
            .body(())
            .unwrap();
        let context = extract(request).await.unwrap();
        assert_eq!(context.user_id, "u-42");
        assert_eq!(context.role, UserRole::Finance);
        assert_eq!(context.role.to_string(), "finance");
    }

    #[tokio::test]
    async fn test_rejects_unknown_role() {
        let request = Request::builder()
            .header("X-User-Role", "root")
            .body(())
            .unwrap();
        let rejected = extract(request).await.unwrap_err();
        assert!(matches!(rejected.0, Error::Validation { .. }));
    }
}
