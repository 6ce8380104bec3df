use std::path::Path;

use serde::Deserialize;

use crate::lib::errors::ConfigError;

pub const MIN_TOKEN_LENGTH: usize = 16;
pub const MAX_TOKEN_LENGTH: usize = 128;

/// Authentication settings. A missing `[auth]` section disables the token check.
#[derive(Debug, Clone, Default)]
pub struct AuthSection {
    pub token: Option<String>,
}

impl AuthSection {
    pub fn is_enabled(&self) -> bool {
        self.token.is_some()
    }
}

#[derive(Debug, Deserialize)]
pub struct RawAuthSection {
    pub token: Option<String>,
}

pub fn parse_auth_section(
    raw: Option<RawAuthSection>,
    path: &Path,
) -> Result<AuthSection, ConfigError> {
    let Some(auth_raw) = raw else {
        return Ok(AuthSection::default());
    };
    let token = auth_raw
        .token
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::MissingField {
            path: path.to_path_buf(),
            field: "auth.token",
        })?;

    if !(MIN_TOKEN_LENGTH..=MAX_TOKEN_LENGTH).contains(&token.len()) {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "auth.token",
            message: format!(
                "token must be {MIN_TOKEN_LENGTH}-{MAX_TOKEN_LENGTH} characters long"
            ),
        });
    }

    Ok(AuthSection { token: Some(token) })
}
