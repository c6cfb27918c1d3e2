//! Extension points for types that format themselves.
//!
//! There are two ways to take over the formatting of a type:
//!
//! * implement [`EncodeParam`] and `#[derive(QueryParam)]` on the type, or
//! * register a formatter for the type with
//!   [`EncoderBuilder::custom_type`](crate::EncoderBuilder::custom_type).
//!
//! Both are consulted ahead of the built-in classification, registered
//! formatters first.

use std::any::Any;
use std::sync::Arc;

use crate::error::BoxError;

/// A type that encodes itself into a single query parameter value.
///
/// ```rust
/// use qsenc::{EncodeParam, Encoder, QueryParam, QueryRecord};
///
/// #[derive(QueryParam)]
/// struct FullName {
///     first: String,
///     last: String,
/// }
///
/// impl EncodeParam for FullName {
///     fn encode_param(&self) -> Result<String, qsenc::BoxError> {
///         Ok(format!("{} {}", self.first, self.last))
///     }
///
///     fn is_zero(&self) -> bool {
///         self.first.is_empty() && self.last.is_empty()
///     }
/// }
///
/// #[derive(QueryRecord)]
/// struct Query {
///     #[qs("user")]
///     pub user: FullName,
///     #[qs("admin,omitempty")]
///     pub admin: FullName,
/// }
///
/// let query = Query {
///     user: FullName { first: "son".into(), last: "huynh".into() },
///     admin: FullName { first: String::new(), last: String::new() },
/// };
/// let values = Encoder::new().values(&query)?;
/// assert_eq!(values.get("user"), Some("son huynh"));
/// assert!(!values.contains_key("admin"));
/// # Ok::<(), qsenc::QsError>(())
/// ```
pub trait EncodeParam {
    /// Formats the value. A failure aborts the whole encode call.
    fn encode_param(&self) -> Result<String, BoxError>;

    /// Whether the value is logically empty.
    ///
    /// Empty values are encoded as `""`, or omitted under `omitempty`,
    /// without calling [`encode_param`](Self::encode_param).
    fn is_zero(&self) -> bool {
        false
    }
}

/// Type-erased registered formatter.
///
/// Receives the value, the field's option tokens (verbatim) and an emitter
/// for the values to record under the field's key.
pub(crate) type ErasedFormatter = Arc<
    dyn Fn(&dyn Any, &[String], &mut dyn FnMut(String)) -> Result<(), BoxError> + Send + Sync,
>;

/// Wraps a typed formatter into an [`ErasedFormatter`].
pub(crate) fn erase<T, F>(formatter: F) -> ErasedFormatter
where
    T: Any,
    F: Fn(&T, &[String], &mut dyn FnMut(String)) -> Result<(), BoxError> + Send + Sync + 'static,
{
    Arc::new(move |value, options, emit| match value.downcast_ref::<T>() {
        Some(typed) => formatter(typed, options, emit),
        None => Ok(()),
    })
}
