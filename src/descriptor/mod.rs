// src/descriptor/mod.rs

//! Field descriptors: precomputed instructions for formatting one field.
//!
//! A descriptor is built once per field of a record type (see
//! [`crate::builder`]) and then reused for every value of that type. Each
//! variant knows its output key, already qualified with the enclosing
//! record's scope, and emits `(key, value)` pairs through a callback.
//!
//! Nested descriptors that are built without a key (list elements, map
//! values) emit sub-keys relative to their container, which the container
//! re-scopes with [`wrap`].

mod collection;
mod dynamic;
mod record;
mod scalar;

pub(crate) use collection::{ArrayFormat, ListField, MapField};
pub(crate) use dynamic::{CustomField, CustomSource, PolymorphicField};
pub(crate) use record::{RecordField, walk};
pub(crate) use scalar::{BoolField, ScalarField, ScalarKind, TimeField, TimeFormat};

use crate::builder::Settings;
use crate::error::Result;
use crate::reflect::Reflect;

/// Sink for emitted pairs.
pub(crate) type Emit<'a> = dyn FnMut(&str, String) + 'a;

/// How one field is named and serialized.
pub(crate) enum Descriptor {
    /// The field produces nothing: ignored, private or unsupported.
    Absent,
    /// String and numeric values.
    Scalar(ScalarField),
    /// Booleans.
    Bool(BoolField),
    /// Timestamps.
    Time(TimeField),
    /// Nested records.
    Record(RecordField),
    /// Sequences.
    List(ListField),
    /// Associative maps.
    Map(MapField),
    /// Trait objects, classified per concrete type.
    Polymorphic(PolymorphicField),
    /// Types with a user formatter.
    Custom(CustomField),
}

impl Descriptor {
    /// Formats `value` and emits its pairs into `out`.
    ///
    /// `value` is the field exactly as stored in its parent, so it may still
    /// be wrapped in `Option`/`Box`/`Arc` layers.
    pub(crate) fn format(&self, ctx: &Settings, value: &dyn Reflect, out: &mut Emit<'_>) -> Result<()> {
        match self {
            Self::Absent => Ok(()),
            Self::Scalar(field) => {
                field.format(value, out);
                Ok(())
            }
            Self::Bool(field) => {
                field.format(value, out);
                Ok(())
            }
            Self::Time(field) => {
                field.format(value, out);
                Ok(())
            }
            Self::Record(field) => field.format(ctx, value, out),
            Self::List(field) => field.format(ctx, value, out),
            Self::Map(field) => field.format(ctx, value, out),
            Self::Polymorphic(field) => field.format(ctx, value, out),
            Self::Custom(field) => field.format(value, out),
        }
    }

    /// Returns `true` for [`Descriptor::Absent`].
    pub(crate) fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// Emits the value of an absent or nil field: `""` unless omitted.
pub(crate) fn emit_absent(key: &str, omit: bool, out: &mut Emit<'_>) {
    if !omit {
        out(key, String::new());
    }
}

/// Re-scopes `sub`, a key produced by a nested descriptor, under `prefix`.
///
/// `a[b]` under `p` becomes `p[a][b]`, `[0]` becomes `p[0]`, and an empty
/// sub-key is the prefix itself.
pub(crate) fn wrap(prefix: &str, sub: &str) -> String {
    if sub.is_empty() {
        return prefix.to_owned();
    }
    if prefix.is_empty() {
        return sub.to_owned();
    }
    if sub.starts_with('[') {
        return format!("{prefix}{sub}");
    }
    match sub.find('[') {
        Some(pos) => format!("{prefix}[{}]{}", &sub[..pos], &sub[pos..]),
        None => format!("{prefix}[{sub}]"),
    }
}

/// Qualifies `key` with `scope` using bracket notation.
pub(crate) fn scoped(scope: &str, key: &str) -> String {
    if scope.is_empty() {
        key.to_owned()
    } else {
        format!("{scope}[{key}]")
    }
}
