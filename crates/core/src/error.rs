//! Error taxonomy shared by every entity operation.

use thiserror::Error;

/// Failure outcome of a core operation.
///
/// Every variant is recoverable: the operation that produced it left the
/// entity it was called on unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A keyed lookup (menu item name, order item, order handle) missed.
    #[error("{kind} not found: {key}")]
    NotFound {
        /// What kind of thing was looked up.
        kind: &'static str,
        /// The key that was not present.
        key: String,
    },

    /// Out-of-range or malformed input (negative price, zero quantity, an
    /// item the restaurant does not offer).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Create a not found error for the given kind and key.
    pub fn not_found(kind: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            key: key.into(),
        }
    }

    /// Create an invalid argument error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Returns `true` for [`Error::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` for [`Error::InvalidArgument`].
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
