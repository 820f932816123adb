pub mod abilities;
pub mod legacy;

use crate::error::FormsError;

/// Fallback for every unmatched path or method.
pub async fn no_route() -> FormsError {
    FormsError::NoRoute
}
