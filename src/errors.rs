use std::fmt;
use thiserror::Error;

/// Configuration rejected before any browser session is opened.
///
/// These fail the `run` call itself; no session resource is acquired.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Target URL is malformed or not HTTP(S)
    #[error("invalid target URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    /// The check list is empty
    #[error("check list is empty")]
    NoChecks,
    /// A check declares no assertions
    #[error("check '{0}' has no assertions")]
    EmptyCheck(String),
    /// A check depends on a transient UI state, which is explicitly
    /// unsupported rather than polled or retried
    #[error(
        "check '{name}' asserts transient state '{description}', which is not deterministically checkable"
    )]
    TransientAssertion { name: String, description: String },
    /// A CLI option value could not be parsed
    #[error("invalid value for {option}: {reason}")]
    InvalidOption { option: String, reason: String },
}

/// Custom error type that includes exit codes
#[derive(Debug)]
pub enum PagecheckError {
    /// Suite rejected before a session was opened (exit code 3)
    Config(ConfigError),
    /// Check suite file unreadable or not valid JSON (exit code 4)
    Suite(String),
    /// Generic error (exit code 1)
    Other(anyhow::Error),
}

impl PagecheckError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            PagecheckError::Config(_) => 3,
            PagecheckError::Suite(_) => 4,
            PagecheckError::Other(_) => 1,
        }
    }
}

impl fmt::Display for PagecheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PagecheckError::Config(err) => write!(f, "{}", err),
            PagecheckError::Suite(msg) => {
                write!(f, "failed to load check suite: {}", msg)
            }
            PagecheckError::Other(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for PagecheckError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PagecheckError::Config(err) => Some(err),
            PagecheckError::Other(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<ConfigError> for PagecheckError {
    fn from(err: ConfigError) -> Self {
        PagecheckError::Config(err)
    }
}

impl From<anyhow::Error> for PagecheckError {
    fn from(err: anyhow::Error) -> Self {
        PagecheckError::Other(err)
    }
}

#[cfg(test)]
#[path = "errors_test.rs"]
mod errors_test;
