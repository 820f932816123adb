pub mod abilities;
pub mod bridge;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod mcp;
pub mod middleware;
pub mod router;
pub mod service;
pub mod types;

pub use abilities::{AbilityRegistry, CallerContext};
pub use db::FormsStorage;
pub use error::{BridgeError, FormsError};
pub use service::FormsOps;
