//! # Qsenc
//!
//! Encodes Rust structs into URL query parameters.
//!
//! ## Overview
//!
//! Annotate a struct once, derive [`QueryRecord`], and get a [`Values`]
//! mapping (key to ordered list of values) ready to be rendered as a query
//! string. The field names, nesting, list layout and omission rules all come
//! from the annotations; there is no per-field encoding code to write.
//!
//! ### Key Features
//!
//! *   **Inspect Once:** the fields of a record type are classified on first
//!     use and the resulting descriptors are cached per type, so later encodes
//!     only walk values.
//! *   **Lock-Free Reads:** the descriptor cache is read without locking and
//!     published copy-on-write; an [`Encoder`] can be shared across threads.
//! *   **Nested Records:** nested structs emit bracketed keys, `user[name]`.
//! *   **Lists and Maps:** four list layouts (`repeat`, `bracket`, `comma`,
//!     `index`) and maps emitted as `key[entry]`.
//! *   **Extensible:** types format themselves through [`EncodeParam`], or an
//!     encoder can be given per-type formatters with
//!     [`EncoderBuilder::custom_type`].
//!
//! ## Annotations
//!
//! ```text
//! #[qs("name")]                 rename
//! #[qs("name,omitempty")]       skip zero values
//! #[qs(",omitempty")]           keep the declared name, add options
//! #[qs("-")]                    ignore the field
//! #[qs(form = "name,opts")]     annotation for the alias `form`
//! #[qs(embed)]                  consider a private field
//! #[qs(skip)]                   ignore the field at compile time
//! ```
//!
//! | option      | applies to | effect                                   |
//! |-------------|------------|------------------------------------------|
//! | `omitempty` | any        | omit zero, empty or absent values        |
//! | `int`       | `bool`     | `1`/`0` instead of `true`/`false`        |
//! | `second`    | time       | Unix seconds instead of RFC 3339         |
//! | `millis`    | time       | Unix milliseconds instead of RFC 3339    |
//! | `comma`     | lists      | `key=a,b`                                |
//! | `bracket`   | lists      | `key[]=a&key[]=b`                        |
//! | `index`     | lists      | `key[0]=a&key[1]=b`                      |
//!
//! Only fields with an explicit visibility (`pub`, `pub(crate)`, ...) are
//! encoded, unless marked `#[qs(embed)]`.
//!
//! ## Usage
//!
//! ```rust
//! use qsenc::QueryRecord;
//!
//! #[derive(QueryRecord)]
//! struct User {
//!     #[qs("name")]
//!     pub name: String,
//!     #[qs("verified,int")]
//!     pub verified: bool,
//! }
//!
//! #[derive(QueryRecord)]
//! struct Query {
//!     #[qs("user")]
//!     pub user: User,
//!     #[qs("ids,index")]
//!     pub ids: Vec<u32>,
//!     #[qs("cursor,omitempty")]
//!     pub cursor: Option<String>,
//! }
//!
//! let query = Query {
//!     user: User { name: "ana".into(), verified: true },
//!     ids: vec![7, 9],
//!     cursor: None,
//! };
//!
//! let values = qsenc::to_values(&query)?;
//! assert_eq!(values.get("user[name]"), Some("ana"));
//! assert_eq!(values.get("user[verified]"), Some("1"));
//! assert_eq!(values.get("ids[1]"), Some("9"));
//! assert!(!values.contains_key("cursor"));
//! # Ok::<(), qsenc::QsError>(())
//! ```
//!
//! ## Diagnostics
//!
//! The library emits `tracing` events (descriptor publication, skipped
//! fields) and never installs a subscriber.
//!
//! ### Safety and Error Handling
//!
//! * **No Unsafe:** the crate forbids `unsafe` code.
//! * **No Panics:** No `unwrap()` or `panic!()` calls in the library (enforced by clippy lints).
//! * **Comprehensive Errors:** All failures correspond to a [`QsError`] type.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![warn(missing_docs)]

// Lets the derive output (`qsenc::...` paths) resolve inside this crate.
extern crate self as qsenc;

// --- PUBLIC API MODULES ---
pub mod api;
pub mod custom;
pub mod error;
pub mod inspector;
pub mod reflect;
pub mod tag;
pub mod values;

// Private modules
mod builder;
mod cache;
mod descriptor;
mod reflect_impls;

// --- MACRO SUPPORT MODULES ---

/// Runtime utilities used by the derived code.
#[doc(hidden)]
pub mod rt;

// --- RE-EXPORTS ---

pub use api::{Encoder, EncoderBuilder, to_query_string, to_values};
pub use custom::EncodeParam;
pub use error::{BoxError, QsError, Result};
pub use inspector::{DescriptorReport, FieldReport};
pub use reflect::{FieldInfo, Kind, Mapping, Record, Reflect, Sequence, Shape, ValueRef};
pub use tag::DEFAULT_ALIAS as DEFAULT_TAG_ALIAS;
pub use values::Values;

// Re-export the derive macros so they are accessible as `qsenc::QueryRecord`
pub use qsenc_derive::{QueryParam, QueryRecord};

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(QueryRecord)]
    struct Inner {
        #[qs("id")]
        pub id: u8,
    }

    #[derive(QueryRecord)]
    struct Outer {
        #[qs("in")]
        pub inner: Inner,
        #[qs("-")]
        pub ignored: String,
        hidden: u8,
    }

    #[test]
    fn derive_works_inside_the_crate() -> Result<()> {
        let value = Outer {
            inner: Inner { id: 3 },
            ignored: "x".into(),
            hidden: 1,
        };
        assert_eq!(value.hidden, 1);
        let values = Encoder::new().values(&value)?;
        assert_eq!(values.get("in[id]"), Some("3"));
        assert_eq!(values.len(), 1);
        Ok(())
    }
}
