//! Descriptor construction.
//!
//! Turns the static [`Shape`] of a record into one [`Descriptor`] per
//! declared field, in declaration order. Fields that produce nothing are
//! kept as [`Descriptor::Absent`] so that descriptor index and field index
//! always agree.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use crate::cache::TypeHasher;
use crate::custom::ErasedFormatter;
use crate::descriptor::{
    ArrayFormat, BoolField, CustomField, CustomSource, Descriptor, ListField, MapField,
    PolymorphicField, RecordField, ScalarField, ScalarKind, TimeField, TimeFormat, scoped,
};
use crate::reflect::{FieldInfo, FieldsFn, Kind, Shape};
use crate::tag::{self, OMIT_EMPTY};

/// Encoder-wide settings consulted while building descriptors.
pub(crate) struct Settings {
    /// Annotation alias read from each field.
    pub(crate) tag_alias: String,
    /// Registered formatters, keyed by the formatted type.
    pub(crate) formatters: HashMap<TypeId, ErasedFormatter, TypeHasher>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tag_alias: tag::DEFAULT_ALIAS.to_owned(),
            formatters: HashMap::default(),
        }
    }
}

/// Builds the descriptor list of a top-level record type.
///
/// Returns `None` if `shape` is not a record.
pub(crate) fn build_record(ctx: &Settings, shape: Shape) -> Option<Arc<[Descriptor]>> {
    let Kind::Record(fields) = shape.kind() else {
        return None;
    };
    let mut stack = vec![shape.type_id()];
    Some(record_fields(ctx, fields, "", &mut stack))
}

/// Builds a standalone descriptor for a value of `shape` emitted under `key`.
pub(crate) fn build_field(ctx: &Settings, shape: Shape, key: String, options: &[String]) -> Descriptor {
    let mut stack = Vec::new();
    classify(ctx, shape, key, options, &mut stack)
}

fn record_fields(
    ctx: &Settings,
    fields: FieldsFn,
    scope: &str,
    stack: &mut Vec<TypeId>,
) -> Arc<[Descriptor]> {
    fields()
        .iter()
        .map(|info| field_descriptor(ctx, info, scope, stack))
        .collect()
}

fn field_descriptor(
    ctx: &Settings,
    info: &FieldInfo,
    scope: &str,
    stack: &mut Vec<TypeId>,
) -> Descriptor {
    if !info.exported && !info.embedded {
        return Descriptor::Absent;
    }
    let Some(tag) = tag::parse(info.name, info.tag(&ctx.tag_alias)) else {
        return Descriptor::Absent;
    };

    let key = scoped(scope, &tag.name);
    classify(ctx, (info.shape)(), key, &tag.options, stack)
}

/// Picks the descriptor variant for a field of `shape`.
///
/// `stack` holds the record types on the current path and cuts cycles.
fn classify(
    ctx: &Settings,
    shape: Shape,
    key: String,
    options: &[String],
    stack: &mut Vec<TypeId>,
) -> Descriptor {
    let shape = shape.target();
    let omit = tag::has_option(options, OMIT_EMPTY);

    if let Some(formatter) = ctx.formatters.get(&shape.type_id()) {
        return Descriptor::Custom(CustomField {
            key,
            omit,
            options: options.to_vec(),
            source: CustomSource::Registered(Arc::clone(formatter)),
        });
    }

    if let Some(kind) = scalar_kind(shape.kind()) {
        return Descriptor::Scalar(ScalarField { key, omit, kind });
    }

    match shape.kind() {
        Kind::Custom => Descriptor::Custom(CustomField {
            key,
            omit,
            options: options.to_vec(),
            source: CustomSource::Param,
        }),
        Kind::Time => Descriptor::Time(TimeField {
            key,
            omit,
            format: TimeFormat::from_options(options),
        }),
        Kind::Record(fields) => {
            if stack.contains(&shape.type_id()) {
                tracing::debug!(
                    key = %key,
                    record = shape.type_name(),
                    "self-referential record field skipped"
                );
                return Descriptor::Absent;
            }
            stack.push(shape.type_id());
            let fields = record_fields(ctx, fields, &key, stack);
            stack.pop();
            Descriptor::Record(RecordField { key, omit, fields })
        }
        Kind::Seq(elem) => {
            let format = ArrayFormat::from_options(options);
            let elem_options = tag::without_omit_empty(options);
            let elem = classify(ctx, elem(), String::new(), &elem_options, stack);
            Descriptor::List(ListField {
                key: format.list_key(&key),
                format,
                elem: Box::new(elem),
            })
        }
        Kind::Map { key: key_shape, value } => {
            let key_elem = classify(ctx, key_shape(), String::new(), &[], stack);
            let value_elem = classify(ctx, value(), String::new(), &[], stack);
            Descriptor::Map(MapField {
                key,
                key_elem: Box::new(key_elem),
                value_elem: Box::new(value_elem),
            })
        }
        Kind::Dynamic => Descriptor::Polymorphic(PolymorphicField::new(key, options.to_vec())),
        Kind::Bool => Descriptor::Bool(BoolField {
            key,
            omit,
            as_int: tag::has_option(options, "int"),
        }),
        _ => {
            tracing::trace!(key = %key, ty = shape.type_name(), "unsupported field type skipped");
            Descriptor::Absent
        }
    }
}

fn scalar_kind(kind: Kind) -> Option<ScalarKind> {
    Some(match kind {
        Kind::Str => ScalarKind::Str,
        Kind::Int => ScalarKind::Int,
        Kind::Uint => ScalarKind::Uint,
        Kind::Float32 => ScalarKind::Float32,
        Kind::Float64 => ScalarKind::Float64,
        Kind::Complex64 => ScalarKind::Complex64,
        Kind::Complex128 => ScalarKind::Complex128,
        _ => return None,
    })
}
