//! MCP server: configuration, startup guards and the runtime.
pub mod auth;
pub mod config;
pub mod runtime;
