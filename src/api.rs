//! Public entry points: [`Encoder`], its builder, and the free functions
//! backed by a process-wide default encoder.

use std::any::Any;
use std::fmt;
use std::sync::{Arc, OnceLock};

use rayon::prelude::*;

use crate::builder::{self, Settings};
use crate::cache::TypeCache;
use crate::custom;
use crate::descriptor::{self, Descriptor};
use crate::error::{BoxError, QsError, Result};
use crate::inspector::DescriptorReport;
use crate::reflect::{Reflect, Shape, ValueRef, deref_dynamic};
use crate::values::Values;

/// Encodes records into [`Values`].
///
/// An encoder owns a descriptor cache: the first encode of a record type
/// inspects its fields, later encodes reuse the result. The encoder is
/// `Send + Sync` and meant to be shared.
///
/// # Examples
///
/// ```rust
/// use qsenc::{Encoder, QueryRecord};
///
/// #[derive(QueryRecord)]
/// struct Search {
///     #[qs("q")]
///     pub query: String,
///     #[qs("page,omitempty")]
///     pub page: u32,
///     #[qs("tags,comma")]
///     pub tags: Vec<String>,
/// }
///
/// let encoder = Encoder::new();
/// let values = encoder.values(&Search {
///     query: "rust".into(),
///     page: 0,
///     tags: vec!["web".into(), "cli".into()],
/// })?;
///
/// assert_eq!(values.encode(), "q=rust&tags=web%2Ccli");
/// # Ok::<(), qsenc::QsError>(())
/// ```
pub struct Encoder {
    settings: Settings,
    cache: TypeCache<Arc<[Descriptor]>>,
}

impl Encoder {
    /// Creates an encoder with the default settings: alias `qs`, no
    /// registered formatters.
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    /// Starts configuring an encoder.
    pub fn builder() -> EncoderBuilder {
        EncoderBuilder::default()
    }

    fn with_settings(settings: Settings) -> Self {
        Self {
            settings,
            cache: TypeCache::new(),
        }
    }

    /// The annotation alias this encoder reads.
    pub fn tag_alias(&self) -> &str {
        &self.settings.tag_alias
    }

    /// Number of record types whose descriptors are cached.
    pub fn cached_types(&self) -> usize {
        self.cache.len()
    }

    /// Encodes `value` into a fresh mapping.
    ///
    /// `value` may be wrapped in `Option`, `Box`, `Arc`, `Rc` or a trait
    /// object; what is left after unwrapping must be a record.
    ///
    /// # Errors
    ///
    /// [`QsError::InvalidInput`] if `value` is not a record,
    /// [`QsError::Custom`] if a user formatter fails.
    pub fn values<T: Reflect>(&self, value: &T) -> Result<Values> {
        let mut out = Values::new();
        self.write(value, &mut out)?;
        Ok(out)
    }

    /// Encodes `value` and appends the result to `out`.
    ///
    /// On error `out` is left untouched.
    ///
    /// # Errors
    ///
    /// Same as [`Encoder::values`].
    pub fn encode<T: Reflect>(&self, value: &T, out: &mut Values) -> Result<()> {
        let scratch = self.values(value)?;
        out.merge(scratch);
        Ok(())
    }

    /// Encodes many records in parallel, preserving order.
    ///
    /// All workers share this encoder's cache. The first error aborts the
    /// batch.
    ///
    /// # Errors
    ///
    /// Same as [`Encoder::values`].
    pub fn values_batch<T: Reflect + Sync>(&self, items: &[T]) -> Result<Vec<Values>> {
        items.par_iter().map(|item| self.values(item)).collect()
    }

    /// Describes how this encoder formats the record type `T`.
    ///
    /// # Errors
    ///
    /// [`QsError::InvalidInput`] if `T` is not a record type.
    pub fn inspect<T: Reflect>(&self) -> Result<DescriptorReport> {
        let shape = T::shape().target();
        let descriptors = self.descriptors(shape)?;
        Ok(DescriptorReport::new(shape, &self.settings.tag_alias, &descriptors))
    }

    fn write(&self, value: &dyn Reflect, out: &mut Values) -> Result<()> {
        let Some((inner, view)) = deref_dynamic(value) else {
            return Err(QsError::invalid_input(ValueRef::Null.kind_name()));
        };
        let ValueRef::Record(fields) = view else {
            return Err(QsError::invalid_input(view.kind_name()));
        };

        let descriptors = self.descriptors(inner.dyn_shape())?;
        descriptor::walk(&self.settings, &descriptors, fields, &mut |key, value| {
            out.add(key, value);
        })
    }

    /// Cached descriptors of a record type, built on first use.
    fn descriptors(&self, shape: Shape) -> Result<Arc<[Descriptor]>> {
        if let Some(hit) = self.cache.retrieve(shape.type_id()) {
            return Ok(hit);
        }

        let built = builder::build_record(&self.settings, shape)
            .ok_or_else(|| QsError::invalid_input(shape.kind().name()))?;
        let stored = self.cache.store(shape.type_id(), Arc::clone(&built));
        if Arc::ptr_eq(&built, &stored) {
            tracing::debug!(
                record = shape.type_name(),
                fields = stored.len(),
                "descriptors published"
            );
        } else {
            tracing::debug!(record = shape.type_name(), "descriptors already published by another caller");
        }
        Ok(stored)
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Encoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encoder")
            .field("tag_alias", &self.settings.tag_alias)
            .field("custom_types", &self.settings.formatters.len())
            .field("cached_types", &self.cache.len())
            .finish()
    }
}

/// Configures an [`Encoder`].
///
/// ```rust
/// use qsenc::{Encoder, QueryRecord};
///
/// #[derive(QueryRecord)]
/// struct Filter {
///     #[qs(form = "min_price")]
///     pub min: u64,
/// }
///
/// let encoder = Encoder::builder()
///     .tag_alias("form")
///     .custom_type::<u64, _>(|cents, _options, emit| {
///         emit(format!("{}.{:02}", cents / 100, cents % 100));
///         Ok(())
///     })
///     .build();
///
/// let values = encoder.values(&Filter { min: 1999 })?;
/// assert_eq!(values.get("min_price"), Some("19.99"));
/// # Ok::<(), qsenc::QsError>(())
/// ```
#[derive(Default)]
pub struct EncoderBuilder {
    settings: Settings,
}

impl EncoderBuilder {
    /// Reads field annotations registered under `alias` instead of `qs`.
    #[must_use]
    pub fn tag_alias(mut self, alias: impl Into<String>) -> Self {
        self.settings.tag_alias = alias.into();
        self
    }

    /// Formats every field of type `T` with `formatter`.
    ///
    /// The formatter receives the value (with `Option`/`Box` layers already
    /// removed), the field's option tokens verbatim and an emitter; each
    /// emitted string becomes one value under the field's key. Registered
    /// formatters take precedence over everything else, including
    /// [`EncodeParam`](crate::EncodeParam). Registering a type twice keeps
    /// the last formatter.
    #[must_use]
    pub fn custom_type<T, F>(mut self, formatter: F) -> Self
    where
        T: Any,
        F: Fn(&T, &[String], &mut dyn FnMut(String)) -> std::result::Result<(), BoxError>
            + Send
            + Sync
            + 'static,
    {
        self.settings
            .formatters
            .insert(std::any::TypeId::of::<T>(), custom::erase(formatter));
        self
    }

    /// Finishes the configuration.
    pub fn build(self) -> Encoder {
        Encoder::with_settings(self.settings)
    }
}

impl fmt::Debug for EncoderBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncoderBuilder")
            .field("tag_alias", &self.settings.tag_alias)
            .field("custom_types", &self.settings.formatters.len())
            .finish()
    }
}

fn default_encoder() -> &'static Encoder {
    static DEFAULT: OnceLock<Encoder> = OnceLock::new();
    DEFAULT.get_or_init(Encoder::new)
}

/// Encodes `value` with the process-wide default encoder.
///
/// # Errors
///
/// Same as [`Encoder::values`].
pub fn to_values<T: Reflect>(value: &T) -> Result<Values> {
    default_encoder().values(value)
}

/// Encodes `value` with the default encoder and renders it as a query
/// string.
///
/// # Errors
///
/// Same as [`Encoder::values`].
pub fn to_query_string<T: Reflect>(value: &T) -> Result<String> {
    to_values(value).map(|values| values.encode())
}
