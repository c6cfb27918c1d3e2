//! Sequence and map descriptors.

use super::{Descriptor, Emit, wrap};
use crate::builder::Settings;
use crate::error::{QsError, Result};
use crate::reflect::{Reflect, ValueRef, deref};

/// Layout of a list field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ArrayFormat {
    /// `key=a&key=b`
    Repeat,
    /// `key[]=a&key[]=b`
    Bracket,
    /// `key=a,b`
    Comma,
    /// `key[0]=a&key[1]=b`
    Index,
}

impl ArrayFormat {
    /// Picks the format from the field options; the last one present wins.
    pub(crate) fn from_options(options: &[String]) -> Self {
        options
            .iter()
            .rev()
            .find_map(|o| match o.as_str() {
                "comma" => Some(Self::Comma),
                "bracket" => Some(Self::Bracket),
                "index" => Some(Self::Index),
                _ => None,
            })
            .unwrap_or(Self::Repeat)
    }

    /// Key the list is emitted under, before element sub-keys.
    pub(crate) fn list_key(self, key: &str) -> String {
        match self {
            Self::Repeat | Self::Comma => key.to_owned(),
            Self::Bracket => format!("{key}[]"),
            Self::Index => format!("{key}["),
        }
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::Repeat => "repeat",
            Self::Bracket => "bracket",
            Self::Comma => "comma",
            Self::Index => "index",
        }
    }
}

/// Sequence fields.
pub(crate) struct ListField {
    /// Output key, already suffixed according to `format`.
    pub(crate) key: String,
    pub(crate) format: ArrayFormat,
    /// Descriptor of one element, built with an empty key.
    pub(crate) elem: Box<Descriptor>,
}

impl ListField {
    pub(crate) fn format(&self, ctx: &Settings, value: &dyn Reflect, out: &mut Emit<'_>) -> Result<()> {
        if self.elem.is_absent() {
            return Ok(());
        }
        let Some((_, ValueRef::Seq(seq))) = deref(value) else {
            return Ok(());
        };
        if seq.is_empty() {
            return Ok(());
        }

        match self.format {
            ArrayFormat::Repeat | ArrayFormat::Bracket => {
                for item in seq.items().filter(|item| deref(*item).is_some()) {
                    self.elem
                        .format(ctx, item, &mut |sub, v| out(&wrap(&self.key, sub), v))
                        .map_err(|e| rescope(&self.key, e))?;
                }
            }
            ArrayFormat::Comma => {
                let mut parts = Vec::with_capacity(seq.len());
                for item in seq.items().filter(|item| deref(*item).is_some()) {
                    self.elem
                        .format(ctx, item, &mut |_, v| parts.push(v))
                        .map_err(|e| rescope(&self.key, e))?;
                }
                if !parts.is_empty() {
                    out(&self.key, parts.join(","));
                }
            }
            ArrayFormat::Index => {
                // Only elements that emitted something take a position.
                let mut n = 0usize;
                for item in seq.items().filter(|item| deref(*item).is_some()) {
                    let prefix = format!("{}{n}]", self.key);
                    let mut emitted = false;
                    self.elem
                        .format(ctx, item, &mut |sub, v| {
                            emitted = true;
                            out(&wrap(&prefix, sub), v);
                        })
                        .map_err(|e| rescope(&prefix, e))?;
                    if emitted {
                        n += 1;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Associative map fields.
pub(crate) struct MapField {
    pub(crate) key: String,
    /// Formats an entry key to its literal; only the first value is used.
    pub(crate) key_elem: Box<Descriptor>,
    /// Formats an entry value, built with an empty key.
    pub(crate) value_elem: Box<Descriptor>,
}

impl MapField {
    pub(crate) fn format(&self, ctx: &Settings, value: &dyn Reflect, out: &mut Emit<'_>) -> Result<()> {
        if self.key_elem.is_absent() || self.value_elem.is_absent() {
            return Ok(());
        }
        let Some((_, ValueRef::Map(map))) = deref(value) else {
            return Ok(());
        };

        for (k, v) in map.entries() {
            let mut literal = None;
            self.key_elem
                .format(ctx, k, &mut |_, text| {
                    literal.get_or_insert(text);
                })
                .map_err(|e| rescope(&self.key, e))?;
            let Some(literal) = literal else {
                continue;
            };

            let prefix = format!("{}[{literal}]", self.key);
            self.value_elem
                .format(ctx, v, &mut |sub, text| out(&wrap(&prefix, sub), text))
                .map_err(|e| rescope(&prefix, e))?;
        }
        Ok(())
    }
}

/// Qualifies the key of a formatter failure raised by an element, whose
/// descriptor only knows its key relative to the container.
fn rescope(prefix: &str, err: QsError) -> QsError {
    match err {
        QsError::Custom { key, source } => QsError::Custom {
            key: wrap(prefix, &key),
            source,
        },
        other => other,
    }
}
