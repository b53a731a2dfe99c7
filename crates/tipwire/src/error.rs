#![forbid(unsafe_code)]

//! Error type for controller installation and host failures.
//!
//! Steady-state event handling never fails: bad inputs are silent no-ops.
//! Errors only come from installing the controller (bad config, a host that
//! cannot create the surface or start observing) and from hosts reporting
//! failures of their own.

use core::fmt;

use tipwire_core::ConfigError;

/// Errors surfaced by the tooltip controller and its hosts.
#[derive(Debug)]
pub enum TooltipError {
    /// The host could not perform a document operation.
    Host(String),
    /// The configuration failed to load or validate.
    Config(ConfigError),
}

impl TooltipError {
    /// Convenience constructor for host failures.
    pub fn host(message: impl Into<String>) -> Self {
        Self::Host(message.into())
    }
}

impl fmt::Display for TooltipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Host(msg) => write!(f, "host error: {msg}"),
            Self::Config(e) => write!(f, "invalid tooltip config: {e}"),
        }
    }
}

impl std::error::Error for TooltipError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Host(_) => None,
            Self::Config(e) => Some(e),
        }
    }
}

impl From<ConfigError> for TooltipError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}
