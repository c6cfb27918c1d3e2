//! Nested record descriptors.

use std::sync::Arc;

use super::{Descriptor, Emit, emit_absent};
use crate::builder::Settings;
use crate::error::Result;
use crate::reflect::{Record, Reflect, ValueRef, deref};

/// A nested record; its field descriptors carry fully scoped keys.
pub(crate) struct RecordField {
    pub(crate) key: String,
    pub(crate) omit: bool,
    pub(crate) fields: Arc<[Descriptor]>,
}

impl RecordField {
    pub(crate) fn format(&self, ctx: &Settings, value: &dyn Reflect, out: &mut Emit<'_>) -> Result<()> {
        match deref(value) {
            None => {
                emit_absent(&self.key, self.omit, out);
                Ok(())
            }
            Some((_, ValueRef::Record(record))) => walk(ctx, &self.fields, record, out),
            Some(_) => Ok(()),
        }
    }
}

/// Formats every field of `record` against its descriptor, in order.
pub(crate) fn walk(
    ctx: &Settings,
    descriptors: &[Descriptor],
    record: &dyn Record,
    out: &mut Emit<'_>,
) -> Result<()> {
    for (index, descriptor) in descriptors.iter().enumerate() {
        if descriptor.is_absent() {
            continue;
        }
        if let Some(field) = record.field(index) {
            descriptor.format(ctx, field, out)?;
        }
    }
    Ok(())
}
