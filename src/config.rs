//! Process configuration, read from the environment on startup.
//!
//! A `.env` file in the working directory is loaded first if present;
//! variables already set in the process take precedence over it.

use std::num::ParseIntError;

use thiserror::Error;

pub const MONGO_URI_VAR: &str = "MONGO_URI";
pub const PORT_VAR: &str = "PORT";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /// Connection string of the document store holding the scores.
    pub mongo_uri: String,
    pub port: u16,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable `{var}` is not set")]
    Missing { var: &'static str },

    #[error("environment variable `{var}` cannot be empty")]
    Empty { var: &'static str },

    #[error("failed to parse environment variable `{var}`: {source}")]
    Parse {
        var: &'static str,
        source: ParseIntError,
    },
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_vars(|var| dotenv::var(var).ok())
    }

    /// Same as [`Settings::from_env`], but reads variables through `lookup`.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mongo_uri = lookup(MONGO_URI_VAR).ok_or(ConfigError::Missing { var: MONGO_URI_VAR })?;
        if mongo_uri.trim().is_empty() {
            return Err(ConfigError::Empty { var: MONGO_URI_VAR });
        }

        let port = match lookup(PORT_VAR) {
            None => DEFAULT_PORT,
            Some(port) => port
                .trim()
                .parse()
                .map_err(|source| ConfigError::Parse {
                    var: PORT_VAR,
                    source,
                })?,
        };

        Ok(Self { mongo_uri, port })
    }
}
