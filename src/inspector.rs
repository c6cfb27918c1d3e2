// src/inspector.rs

//! Tools for inspecting how a record type is encoded.
//! Useful for checking annotations and the keys they produce.

use serde::Serialize;

use crate::descriptor::{CustomSource, Descriptor};
use crate::reflect::Shape;

/// A structural report of the descriptors of one record type.
#[derive(Debug, Clone, Serialize)]
pub struct DescriptorReport {
    /// Rust type name of the record.
    pub record: String,
    /// Annotation alias the descriptors were built with.
    pub tag_alias: String,
    /// One entry per declared field, in declaration order.
    pub fields: Vec<FieldReport>,
}

/// Description of a single descriptor.
#[derive(Debug, Clone, Serialize)]
pub struct FieldReport {
    /// Output key, scope included. Empty for list elements and map parts.
    pub key: String,
    /// Descriptor variant (e.g. "string", "list", "record", "absent").
    pub kind: String,
    /// Whether zero values are omitted.
    pub omit_empty: bool,
    /// Variant specific detail (e.g. "comma", "millis", "registered").
    pub detail: Option<String>,
    /// Nested descriptors: record fields, list element, map key and value.
    pub children: Vec<FieldReport>,
}

impl DescriptorReport {
    pub(crate) fn new(shape: Shape, tag_alias: &str, descriptors: &[Descriptor]) -> Self {
        Self {
            record: shape.type_name().to_owned(),
            tag_alias: tag_alias.to_owned(),
            fields: descriptors.iter().map(FieldReport::from_descriptor).collect(),
        }
    }

    /// Output keys of every emitting top-level field, in order.
    pub fn keys(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.kind != "absent")
            .map(|f| f.key.as_str())
            .collect()
    }
}

impl FieldReport {
    fn leaf(key: &str, kind: &str, omit_empty: bool, detail: Option<&str>) -> Self {
        Self {
            key: key.to_owned(),
            kind: kind.to_owned(),
            omit_empty,
            detail: detail.map(str::to_owned),
            children: Vec::new(),
        }
    }

    fn from_descriptor(descriptor: &Descriptor) -> Self {
        match descriptor {
            Descriptor::Absent => Self::leaf("", "absent", false, None),
            Descriptor::Scalar(f) => Self::leaf(&f.key, f.kind.name(), f.omit, None),
            Descriptor::Bool(f) => Self::leaf(&f.key, "bool", f.omit, f.as_int.then_some("int")),
            Descriptor::Time(f) => Self::leaf(&f.key, "time", f.omit, Some(f.format.name())),
            Descriptor::Record(f) => Self {
                children: f.fields.iter().map(Self::from_descriptor).collect(),
                ..Self::leaf(&f.key, "record", f.omit, None)
            },
            Descriptor::List(f) => Self {
                children: vec![Self::from_descriptor(&f.elem)],
                ..Self::leaf(&f.key, "list", false, Some(f.format.name()))
            },
            Descriptor::Map(f) => Self {
                children: vec![
                    Self::from_descriptor(&f.key_elem),
                    Self::from_descriptor(&f.value_elem),
                ],
                ..Self::leaf(&f.key, "map", false, None)
            },
            Descriptor::Polymorphic(f) => {
                let seen = format!("{} concrete types seen", f.concrete.len());
                Self::leaf(
                    &f.key,
                    "polymorphic",
                    crate::tag::has_option(&f.options, crate::tag::OMIT_EMPTY),
                    Some(&seen),
                )
            }
            Descriptor::Custom(f) => {
                let source = match f.source {
                    CustomSource::Param => "param",
                    CustomSource::Registered(_) => "registered",
                };
                Self::leaf(&f.key, "custom", f.omit, Some(source))
            }
        }
    }
}

impl std::fmt::Display for DescriptorReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== QSENC DESCRIPTOR REPORT ===")?;
        writeln!(f, "Record:    {}", self.record)?;
        writeln!(f, "Tag alias: {}", self.tag_alias)?;
        writeln!(f, "\n[FIELDS]")?;
        for (i, field) in self.fields.iter().enumerate() {
            field.fmt_recursive(f, "", i + 1 == self.fields.len())?;
        }
        Ok(())
    }
}

impl FieldReport {
    fn fmt_recursive(
        &self,
        f: &mut std::fmt::Formatter<'_>,
        prefix: &str,
        is_last: bool,
    ) -> std::fmt::Result {
        let connector = if is_last { "└── " } else { "├── " };
        let child_prefix = if is_last { "    " } else { "│   " };
        let detail = self
            .detail
            .as_deref()
            .map(|d| format!(" {d}"))
            .unwrap_or_default();
        let omit = if self.omit_empty { " (omitempty)" } else { "" };
        let key = if self.key.is_empty() { "-" } else { &self.key };

        writeln!(f, "{prefix}{connector}[{}{detail}] {key}{omit}", self.kind)?;

        for (i, child) in self.children.iter().enumerate() {
            let is_last_child = i + 1 == self.children.len();
            child.fmt_recursive(f, &format!("{prefix}{child_prefix}"), is_last_child)?;
        }
        Ok(())
    }
}
