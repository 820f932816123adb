use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use headers::authorization::Basic;
use headers::{Authorization, HeaderMapExt};
use subtle::ConstantTimeEq;

use crate::abilities::CallerContext;
use crate::error::FormsError;
use crate::router::FormsState;

/// The single administrator login accepted by the service.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    username: String,
    app_password: String,
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, app_password: impl AsRef<str>) -> Self {
        Self {
            username: username.into(),
            app_password: normalize_app_password(app_password.as_ref()),
        }
    }

    /// Both halves must be configured; anything less disables the
    /// administrative tier.
    pub fn from_parts(username: Option<&str>, app_password: Option<&str>) -> Option<Self> {
        match (username, app_password) {
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => Some(Self::new(u, p)),
            _ => None,
        }
    }

    fn matches(&self, username: &str, password: &str) -> bool {
        let password = normalize_app_password(password);
        let user_ok = username.as_bytes().ct_eq(self.username.as_bytes());
        let pass_ok = password.as_bytes().ct_eq(self.app_password.as_bytes());
        bool::from(user_ok & pass_ok)
    }
}

/// Application passwords are handed out in space-separated groups.
fn normalize_app_password(password: &str) -> String {
    password.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Resolve the caller's tier from an optional `Authorization: Basic` header.
/// No header means a public caller; a header that does not match the
/// configured administrator is rejected outright.
pub fn identify_caller(
    headers: &HeaderMap,
    admin: Option<&AdminCredentials>,
) -> Result<CallerContext, FormsError> {
    if headers.get(axum::http::header::AUTHORIZATION).is_none() {
        return Ok(CallerContext::Public);
    }

    let Some(Authorization(basic)) = headers.typed_get::<Authorization<Basic>>() else {
        return Err(FormsError::InvalidCredentials);
    };

    match admin {
        Some(admin) if admin.matches(basic.username(), basic.password()) => {
            Ok(CallerContext::Administrative)
        }
        _ => Err(FormsError::InvalidCredentials),
    }
}

impl FromRequestParts<FormsState> for CallerContext {
    type Rejection = FormsError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &FormsState,
    ) -> Result<Self, Self::Rejection> {
        identify_caller(&parts.headers, state.admin.as_deref())
    }
}
