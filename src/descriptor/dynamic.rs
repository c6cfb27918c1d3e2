//! Descriptors resolved against the value rather than the declared type:
//! trait-object fields and types with user formatters.

use std::sync::Arc;

use super::{Descriptor, Emit, emit_absent};
use crate::builder::{self, Settings};
use crate::cache::TypeCache;
use crate::custom::ErasedFormatter;
use crate::error::{QsError, Result};
use crate::reflect::{Reflect, ValueRef, deref, deref_dynamic};
use crate::tag;

/// A trait-object field.
///
/// The concrete type is classified on first sight and remembered in a
/// private cache, so each concrete type is inspected once per field.
pub(crate) struct PolymorphicField {
    pub(crate) key: String,
    pub(crate) options: Vec<String>,
    pub(crate) concrete: TypeCache<Arc<Descriptor>>,
}

impl PolymorphicField {
    pub(crate) fn new(key: String, options: Vec<String>) -> Self {
        Self {
            key,
            options,
            concrete: TypeCache::new(),
        }
    }

    pub(crate) fn format(&self, ctx: &Settings, value: &dyn Reflect, out: &mut Emit<'_>) -> Result<()> {
        let Some((inner, _)) = deref_dynamic(value) else {
            emit_absent(&self.key, tag::has_option(&self.options, tag::OMIT_EMPTY), out);
            return Ok(());
        };

        let shape = inner.dyn_shape();
        let descriptor = match self.concrete.retrieve(shape.type_id()) {
            Some(descriptor) => descriptor,
            None => {
                tracing::trace!(
                    key = %self.key,
                    concrete = shape.type_name(),
                    "classifying trait object field"
                );
                let built = builder::build_field(ctx, shape, self.key.clone(), &self.options);
                self.concrete.store(shape.type_id(), Arc::new(built))
            }
        };
        descriptor.format(ctx, inner, out)
    }
}

/// Where a [`CustomField`] gets its text from.
pub(crate) enum CustomSource {
    /// The value's own [`EncodeParam`](crate::EncodeParam) impl.
    Param,
    /// A formatter registered on the encoder for the field's type.
    Registered(ErasedFormatter),
}

/// A field formatted by user code.
pub(crate) struct CustomField {
    pub(crate) key: String,
    pub(crate) omit: bool,
    /// Field options, handed verbatim to registered formatters.
    pub(crate) options: Vec<String>,
    pub(crate) source: CustomSource,
}

impl CustomField {
    pub(crate) fn format(&self, value: &dyn Reflect, out: &mut Emit<'_>) -> Result<()> {
        let Some((inner, view)) = deref(value) else {
            emit_absent(&self.key, self.omit, out);
            return Ok(());
        };

        match &self.source {
            CustomSource::Param => {
                let ValueRef::Custom(param) = view else {
                    return Ok(());
                };
                if param.is_zero() {
                    emit_absent(&self.key, self.omit, out);
                    return Ok(());
                }
                let text = param
                    .encode_param()
                    .map_err(|e| QsError::custom(&self.key, e))?;
                out(&self.key, text);
                Ok(())
            }
            CustomSource::Registered(formatter) => {
                let key = self.key.as_str();
                formatter(inner.as_any(), &self.options, &mut |text| out(key, text))
                    .map_err(|e| QsError::custom(key, e))
            }
        }
    }
}
