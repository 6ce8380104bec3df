//! Client authentication and TTY checks performed at startup.
use std::process::ExitCode;

use serde_json::json;

use super::runtime::RuntimeExit;
use crate::{
    cli::{LaunchProfile, TokenSource},
    lib::errors::{
        FailureOrigin, ToolErrorDescriptor, AUTH_TOKEN_MISMATCH_ERROR, MCP_CLIENT_REQUIRED_ERROR,
        MCP_TOKEN_REQUIRED_ERROR,
    },
};

/// Authentication status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    /// No `[auth].token` configured; every client is accepted.
    Disabled,
    Matched,
    Missing,
    Mismatch,
}

/// Context for comparing client-provided tokens against configuration.
#[derive(Debug, Clone)]
pub struct ClientAuthContext {
    expected_token: Option<String>,
    provided_token: Option<String>,
    token_source: TokenSource,
}

impl ClientAuthContext {
    pub fn new(
        expected_token: Option<String>,
        provided_token: Option<String>,
        token_source: TokenSource,
    ) -> Self {
        Self {
            expected_token,
            provided_token,
            token_source,
        }
    }

    pub fn status(&self) -> AuthStatus {
        match (&self.expected_token, &self.provided_token) {
            (None, _) => AuthStatus::Disabled,
            (Some(expected), Some(provided)) if provided == expected => AuthStatus::Matched,
            (Some(_), Some(_)) => AuthStatus::Mismatch,
            (Some(_), None) => AuthStatus::Missing,
        }
    }

    /// Compare tokens and return a `RuntimeExit` on failure.
    pub fn ensure_authorized(&self) -> Result<(), RuntimeExit> {
        let details = json!({ "token_source": format!("{:?}", self.token_source) });
        match self.status() {
            AuthStatus::Disabled | AuthStatus::Matched => Ok(()),
            AuthStatus::Missing => Err(build_launch_exit(
                &MCP_TOKEN_REQUIRED_ERROR,
                43,
                true,
                details,
            )),
            AuthStatus::Mismatch => Err(build_launch_exit(
                &AUTH_TOKEN_MISMATCH_ERROR,
                42,
                false,
                details,
            )),
        }
    }
}

pub fn ensure_invoked_via_mcp_client(profile: &LaunchProfile) -> Result<(), RuntimeExit> {
    use std::io::IsTerminal;
    let stdin_tty = std::io::stdin().is_terminal();
    let stdout_tty = std::io::stdout().is_terminal();
    if stdin_tty || stdout_tty {
        return Err(build_launch_exit(
            &MCP_CLIENT_REQUIRED_ERROR,
            44,
            true,
            json!({
                "transport": profile.transport.as_str(),
                "stdin_is_tty": stdin_tty,
                "stdout_is_tty": stdout_tty
            }),
        ));
    }
    Ok(())
}

fn build_launch_exit(
    descriptor: &'static ToolErrorDescriptor,
    exit_code: u8,
    retryable: bool,
    details: serde_json::Value,
) -> RuntimeExit {
    let built = descriptor
        .builder()
        .retryable(retryable)
        .origin(FailureOrigin::Launch)
        .details(details)
        .with_exit_code_value(exit_code)
        .build();
    match built {
        Ok(data) => RuntimeExit::structured(data, ExitCode::from(exit_code)),
        Err(err) => RuntimeExit::from_error(err),
    }
}
