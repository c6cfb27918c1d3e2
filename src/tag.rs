//! Field annotation parsing.
//!
//! An annotation is the string attached to a field for a given tag alias,
//! e.g. `#[qs("tags,comma,omitempty")]`. Its grammar is
//! `name` | `name,opt1,opt2,...` | `,opt1` | `-`.

/// Annotation alias read when none is configured: `#[qs("...")]`.
pub const DEFAULT_ALIAS: &str = "qs";

/// Option that suppresses emission of zero/empty values.
pub const OMIT_EMPTY: &str = "omitempty";

/// Name that marks a field as ignored.
pub const IGNORE: &str = "-";

/// A parsed annotation: the output name and the option tokens, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Output key for the field (before scoping).
    pub name: String,
    /// Option tokens after the name, verbatim and order-preserving.
    pub options: Vec<String>,
}

impl Tag {
    /// Returns `true` if `option` appears among the options.
    pub fn has(&self, option: &str) -> bool {
        has_option(&self.options, option)
    }
}

/// Parses the annotation of a field declared as `declared_name`.
///
/// Returns `None` when the field is ignored (`-`).
pub fn parse(declared_name: &str, raw: Option<&str>) -> Option<Tag> {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => {
            return Some(Tag {
                name: declared_name.to_owned(),
                options: Vec::new(),
            });
        }
    };

    let mut segments = raw.split(',');
    let name = segments.next().unwrap_or_default();
    if name == IGNORE {
        return None;
    }

    Some(Tag {
        name: if name.is_empty() {
            declared_name.to_owned()
        } else {
            name.to_owned()
        },
        options: segments.map(str::to_owned).collect(),
    })
}

/// Returns `true` if `option` appears among `options`.
pub fn has_option(options: &[String], option: &str) -> bool {
    options.iter().any(|o| o == option)
}

/// Copies `options` without any `omitempty` token.
///
/// `omitempty` is consumed by the field that carries it and never applies to
/// the elements of a list.
pub fn without_omit_empty(options: &[String]) -> Vec<String> {
    options
        .iter()
        .filter(|o| o.as_str() != OMIT_EMPTY)
        .cloned()
        .collect()
}
