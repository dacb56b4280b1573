//! # Validation Error
//!
//! The error value raised when a chart descriptor breaks a domain rule,
//! as opposed to failing to be read or parsed. Rendered text is always
//! `validation: ` followed by the message.

use thiserror::Error;

/// A chart data validation failure.
#[derive(Error, Debug, Clone, PartialEq, Eq, Hash)]
#[error("validation: {0}")]
pub struct ValidationError(String);

impl ValidationError {
    /// Wrap a message. The `validation: ` prefix is added on display only.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// The message without the prefix.
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl From<String> for ValidationError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

impl From<&str> for ValidationError {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}

/// Build a [`ValidationError`] from a format string and arguments.
///
/// ```
/// use chartkit_core::validation_errorf;
///
/// let err = validation_errorf!("bad {}", "name");
/// assert_eq!(err.to_string(), "validation: bad name");
/// ```
#[macro_export]
macro_rules! validation_errorf {
    ($($arg:tt)*) => {
        $crate::ValidationError::new(::std::format!($($arg)*))
    };
}
