//! MCP tools that forward to the Cheat Engine REST plugin.
//!
//! One module per category; each contributes a `#[tool_router]` block that
//! `CheatEngineServer::router` merges into the server's router.

pub mod address;
pub mod address_list;
pub mod client;
pub mod errors;
pub mod memory;
pub mod models;
pub mod process;
pub mod request;
pub mod scan;
pub mod utility;

pub use client::{ApiCall, CheatEngineClient, Endpoint, HttpMethod};
pub use errors::{bridge_error_to_error_data, validation_error_to_error_data, RequestValidationError};
pub use memory::{MemoryTarget, ValueKind};
pub use models::{ApiInfoResponse, BaseResponse, HealthResponse};
pub use scan::{AlignmentType, RoundingType, ScanOption, VariableType};
