// src/rt.rs

//! Runtime utilities for generated code (Macros).
//! Do not use directly.

use crate::reflect::{FieldInfo, Kind, Record, Reflect, Shape, ShapeFn};

/// Shape of a type deriving `QueryRecord`.
pub fn record_shape<T: Record>() -> Shape {
    Shape::of::<T>(Kind::Record(T::fields))
}

/// Shape of a type deriving `QueryParam`.
pub fn param_shape<T: 'static>() -> Shape {
    Shape::of::<T>(Kind::Custom)
}

/// Shape recorded for fields marked `#[qs(skip)]`.
pub fn skipped_shape() -> Shape {
    <() as Reflect>::shape()
}

/// Builds one entry of a derived field table.
pub const fn field(
    name: &'static str,
    tags: &'static [(&'static str, &'static str)],
    exported: bool,
    embedded: bool,
    shape: ShapeFn,
) -> FieldInfo {
    FieldInfo {
        name,
        tags,
        exported,
        embedded,
        shape,
    }
}
