pub mod auth;
pub mod json_body;

pub use auth::{AdminCredentials, identify_caller};
pub use json_body::LenientJson;
