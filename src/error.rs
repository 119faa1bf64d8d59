//! Error types shared by every generator.

pub type Result<T> = std::result::Result<T, VegError>;

#[derive(Debug, thiserror::Error)]
pub enum VegError {
    /// Unknown method selector or a parameter the selected method needs is missing.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Annual vector of the wrong length, or empty table data.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Breakpoint ordering, layer geometry or rooting depth out of range.
    #[error("Domain error: {0}")]
    Domain(String),

    #[error("Configuration text could not be parsed: {0}")]
    Toml(#[from] toml::de::Error),
}

impl VegError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        VegError::Configuration(msg.into())
    }

    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        VegError::Validation(msg.into())
    }

    pub(crate) fn domain(msg: impl Into<String>) -> Self {
        VegError::Domain(msg.into())
    }
}
