//! Authentication extractors.
//!
//! Sign-in is handled by the authentication provider's gateway, which
//! forwards the verified identity on every request:
//!
//! - `x-forwarded-user` - provider uid (required for an authenticated request)
//! - `x-forwarded-email` - email address (optional)
//! - `x-forwarded-name` - display name (optional)
//!
//! The storefront never sees credentials.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, request::Parts},
    response::{IntoResponse, Response},
};

use greengrocer_core::UserId;

use crate::error::{ErrorBody, set_sentry_user};
use crate::models::CurrentUser;

/// Header carrying the provider uid.
pub const USER_HEADER: &str = "x-forwarded-user";
/// Header carrying the shopper's email.
pub const EMAIL_HEADER: &str = "x-forwarded-email";
/// Header carrying the shopper's display name.
pub const NAME_HEADER: &str = "x-forwarded-name";

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Read the forwarded identity, if any.
#[must_use]
pub fn current_user(headers: &HeaderMap) -> Option<CurrentUser> {
    let uid = header(headers, USER_HEADER)?;
    Some(CurrentUser {
        uid: UserId::new(uid),
        email: header(headers, EMAIL_HEADER),
        display_name: header(headers, NAME_HEADER),
    })
}

/// Extractor that requires an authenticated shopper.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAuth(user): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", user.uid)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Rejection for [`RequireAuth`].
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            error: "You must be logged in.".to_string(),
        };
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = current_user(&parts.headers).ok_or(AuthRejection)?;
        set_sentry_user(&user.uid, user.email.as_deref());
        Ok(Self(user))
    }
}

/// Extractor that optionally gets the current shopper.
///
/// Unlike `RequireAuth`, this does not reject anonymous requests.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = current_user(&parts.headers);
        if let Some(user) = &user {
            set_sentry_user(&user.uid, user.email.as_deref());
        }
        Ok(Self(user))
    }
}
