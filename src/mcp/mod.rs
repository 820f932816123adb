//! MCP server over stdio, tools only. Built on `rmcp`; each tool forwards
//! to [`crate::bridge::Bridge`].

pub mod server;

pub use server::{McpServer, SERVER_NAME};
