//! Defines the `Reflect` family of traits.
//!
//! These traits let a type describe its own structure to the encoder: a
//! static [`Shape`] used once, when descriptors are built, and a borrowed
//! [`ValueRef`] view used on every encode.
//!
//! Records get their impls from `#[derive(QueryRecord)]`; leaf types
//! (strings, numbers, time, collections, smart pointers) are covered in
//! `reflect_impls`.

use std::any::{Any, TypeId};
use std::fmt;

use chrono::{DateTime, FixedOffset};
use num_complex::Complex;

use crate::custom::EncodeParam;

/// Lazily evaluated shape of a nested type.
///
/// Nested shapes are function pointers so that describing a recursive type
/// does not recurse.
pub type ShapeFn = fn() -> Shape;

/// Lazily evaluated field table of a record type.
pub type FieldsFn = fn() -> Vec<FieldInfo>;

/// Static description of a type: its identity and its kind.
#[derive(Clone, Copy)]
pub struct Shape {
    type_id: TypeId,
    type_name: &'static str,
    kind: Kind,
}

impl Shape {
    /// Creates the shape of `T` with the given kind.
    pub fn of<T: ?Sized + 'static>(kind: Kind) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            kind,
        }
    }

    /// Identity of the described type.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Readable name of the described type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Kind of the described type.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Follows every `Indirect` layer down to the pointed-to shape.
    pub fn target(self) -> Shape {
        let mut shape = self;
        while let Kind::Indirect(inner) = shape.kind {
            shape = inner();
        }
        shape
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shape")
            .field("type_name", &self.type_name)
            .field("kind", &self.kind)
            .finish()
    }
}

/// The kind of a type, as far as query encoding is concerned.
#[derive(Clone, Copy)]
pub enum Kind {
    /// Any string type, and `char`.
    Str,
    /// `bool`.
    Bool,
    /// Signed integers.
    Int,
    /// Unsigned integers.
    Uint,
    /// `f32`.
    Float32,
    /// `f64`.
    Float64,
    /// `Complex<f32>`.
    Complex64,
    /// `Complex<f64>`.
    Complex128,
    /// A timestamp.
    Time,
    /// A record with named fields.
    Record(FieldsFn),
    /// A sequence of elements of the given shape.
    Seq(ShapeFn),
    /// An associative map.
    Map {
        /// Shape of the keys.
        key: ShapeFn,
        /// Shape of the values.
        value: ShapeFn,
    },
    /// An optional value or pointer to a value of the given shape.
    Indirect(ShapeFn),
    /// A trait object whose concrete type is only known per value.
    Dynamic,
    /// A type implementing [`EncodeParam`].
    Custom,
    /// Anything the encoder cannot represent (functions, channels, ...).
    Unsupported,
}

impl Kind {
    /// Short lowercase name of the kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Str => "string",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Complex64 => "complex64",
            Self::Complex128 => "complex128",
            Self::Time => "time",
            Self::Record(_) => "struct",
            Self::Seq(_) => "slice",
            Self::Map { .. } => "map",
            Self::Indirect(_) => "ptr",
            Self::Dynamic => "interface",
            Self::Custom => "custom",
            Self::Unsupported => "unsupported",
        }
    }
}

impl fmt::Debug for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One declared field of a record type, as generated by the derive.
#[derive(Debug, Clone, Copy)]
pub struct FieldInfo {
    /// Declared name (`r#` stripped; tuple fields use their index).
    pub name: &'static str,
    /// Raw annotations as `(alias, annotation)` pairs.
    pub tags: &'static [(&'static str, &'static str)],
    /// The field has an explicit visibility.
    pub exported: bool,
    /// The field is marked `#[qs(embed)]`.
    pub embedded: bool,
    /// Shape of the field type.
    pub shape: ShapeFn,
}

impl FieldInfo {
    /// Annotation registered for `alias`, if any.
    pub fn tag(&self, alias: &str) -> Option<&'static str> {
        self.tags
            .iter()
            .find(|(name, _)| *name == alias)
            .map(|(_, value)| *value)
    }
}

/// A borrowed view of a value.
#[derive(Clone, Copy)]
pub enum ValueRef<'a> {
    /// An absent optional value.
    Null,
    /// A string.
    Str(&'a str),
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i128),
    /// An unsigned integer.
    Uint(u128),
    /// A single character, formatted like a string.
    Char(char),
    /// A 32-bit float.
    Float32(f32),
    /// A 64-bit float.
    Float64(f64),
    /// A complex number with 32-bit parts.
    Complex64(Complex<f32>),
    /// A complex number with 64-bit parts.
    Complex128(Complex<f64>),
    /// A timestamp.
    Time(DateTime<FixedOffset>),
    /// A record.
    Record(&'a dyn Record),
    /// A sequence.
    Seq(&'a dyn Sequence),
    /// An associative map.
    Map(&'a dyn Mapping),
    /// A present optional value or a pointer.
    Indirect(&'a dyn Reflect),
    /// A trait object, `None` when it holds nothing.
    Dynamic(Option<&'a dyn Reflect>),
    /// A type with its own formatter.
    Custom(&'a dyn EncodeParam),
    /// A value the encoder cannot represent.
    Opaque,
}

impl ValueRef<'_> {
    /// Short lowercase name of the value kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "nil",
            Self::Str(_) | Self::Char(_) => "string",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Uint(_) => "uint",
            Self::Float32(_) => "float32",
            Self::Float64(_) => "float64",
            Self::Complex64(_) => "complex64",
            Self::Complex128(_) => "complex128",
            Self::Time(_) => "time",
            Self::Record(_) => "struct",
            Self::Seq(_) => "slice",
            Self::Map(_) => "map",
            Self::Indirect(_) => "ptr",
            Self::Dynamic(_) => "interface",
            Self::Custom(_) => "custom",
            Self::Opaque => "unsupported",
        }
    }
}

/// A type that can describe its own structure to the encoder.
///
/// This is distinct from `serde::Serialize`: instead of driving a
/// serializer, a type hands out a [`Shape`] once and a [`ValueRef`] per
/// value, and the encoder does the walking.
pub trait Reflect: Any {
    /// Static shape of the implementing type.
    fn shape() -> Shape
    where
        Self: Sized;

    /// Shape of the concrete type behind `self`, usable on trait objects.
    fn dyn_shape(&self) -> Shape;

    /// Borrowed view of the value.
    fn reflect(&self) -> ValueRef<'_>;

    /// Upcast used to hand the value to a registered formatter.
    fn as_any(&self) -> &dyn Any;
}

/// A record: a type with declared fields, usually derived.
pub trait Record: Reflect {
    /// Declared fields, in declaration order.
    fn fields() -> Vec<FieldInfo>
    where
        Self: Sized;

    /// Value of the field at `index`; `None` for skipped fields.
    fn field(&self, index: usize) -> Option<&dyn Reflect>;
}

/// A sequence of reflectable elements.
pub trait Sequence {
    /// Number of elements.
    fn len(&self) -> usize;

    /// Returns `true` if there are no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Elements in order.
    fn items(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_>;
}

/// An associative container of reflectable keys and values.
pub trait Mapping {
    /// Number of entries.
    fn len(&self) -> usize;

    /// Returns `true` if there are no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries in the container's own iteration order.
    fn entries(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_>;
}

/// Peels `Indirect` layers off `value`.
///
/// Returns the innermost value with its view, or `None` when an optional
/// layer is absent.
pub(crate) fn deref(value: &dyn Reflect) -> Option<(&dyn Reflect, ValueRef<'_>)> {
    let mut current = value;
    loop {
        match current.reflect() {
            ValueRef::Null => return None,
            ValueRef::Indirect(inner) => current = inner,
            view => return Some((current, view)),
        }
    }
}

/// Like [`deref`], but also looks through trait objects.
pub(crate) fn deref_dynamic(value: &dyn Reflect) -> Option<(&dyn Reflect, ValueRef<'_>)> {
    let mut current = value;
    loop {
        match current.reflect() {
            ValueRef::Null | ValueRef::Dynamic(None) => return None,
            ValueRef::Indirect(inner) | ValueRef::Dynamic(Some(inner)) => current = inner,
            view => return Some((current, view)),
        }
    }
}
