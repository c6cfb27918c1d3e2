//! Centralized error handling for qsenc.
//!
//! The encoder reports exactly two kinds of failure, and never a mix of
//! failure and partial output:
//!
//! - **Invalid Input** ([`QsError::InvalidInput`]): the value handed to
//!   [`Encoder::values`](crate::Encoder::values) or
//!   [`Encoder::encode`](crate::Encoder::encode) is not a record once every
//!   `Option`/`Box`/`Arc`/`dyn` layer has been peeled off.
//! - **Custom Formatter Failure** ([`QsError::Custom`]): a user formatter
//!   (an [`EncodeParam`](crate::EncodeParam) impl or a formatter registered
//!   with [`EncoderBuilder::custom_type`](crate::EncoderBuilder::custom_type))
//!   failed. The user error is kept untouched and exposed through
//!   [`std::error::Error::source`].
//!
//! Unsupported field types are not errors; they are skipped.
//!
//! ## Usage
//!
//! ```rust
//! use qsenc::{Encoder, QsError};
//!
//! let encoder = Encoder::new();
//! match encoder.values(&"not a record".to_string()) {
//!     Err(QsError::InvalidInput { kind }) => assert_eq!(kind, "string"),
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

use std::fmt;
use std::sync::Arc;

/// Boxed error type returned by user formatters.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A specialized `Result` type for qsenc operations.
pub type Result<T> = std::result::Result<T, QsError>;

/// The error enum covering every failure the encoder can report.
///
/// This type is `Clone`; the user error carried by [`QsError::Custom`] is
/// wrapped in an `Arc` for that purpose.
#[derive(Debug, Clone)]
pub enum QsError {
    /// The top-level value is not a record after dereferencing.
    ///
    /// `kind` names what was found instead (`"string"`, `"int"`, `"nil"`,
    /// ...).
    InvalidInput {
        /// Kind of the value that was passed.
        kind: &'static str,
    },

    /// A user-supplied formatter failed while encoding the field `key`.
    Custom {
        /// Output key of the field whose formatter failed.
        key: String,
        /// The error returned by the formatter, unaltered.
        source: Arc<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl QsError {
    pub(crate) fn invalid_input(kind: &'static str) -> Self {
        Self::InvalidInput { kind }
    }

    pub(crate) fn custom(key: &str, source: BoxError) -> Self {
        Self::Custom {
            key: key.to_owned(),
            source: Arc::from(source),
        }
    }
}

impl fmt::Display for QsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput { kind } => write!(f, "expects struct input, got {kind}"),
            Self::Custom { key, source } => {
                write!(f, "custom formatter failed for field `{key}`: {source}")
            }
        }
    }
}

impl std::error::Error for QsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Custom { source, .. } => Some(source.as_ref()),
            Self::InvalidInput { .. } => None,
        }
    }
}
