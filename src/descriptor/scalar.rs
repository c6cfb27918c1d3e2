//! Leaf descriptors: strings, numbers, booleans and timestamps.

use chrono::{DateTime, FixedOffset, SecondsFormat};
use num_complex::Complex;

use super::{Emit, emit_absent};
use crate::reflect::{Reflect, ValueRef, deref};

/// Which scalar family a [`ScalarField`] formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScalarKind {
    Str,
    Int,
    Uint,
    Float32,
    Float64,
    Complex64,
    Complex128,
}

impl ScalarKind {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::Str => "string",
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Complex64 => "complex64",
            Self::Complex128 => "complex128",
        }
    }
}

/// String and numeric fields.
pub(crate) struct ScalarField {
    pub(crate) key: String,
    pub(crate) omit: bool,
    pub(crate) kind: ScalarKind,
}

impl ScalarField {
    pub(crate) fn format(&self, value: &dyn Reflect, out: &mut Emit<'_>) {
        let Some((_, view)) = deref(value) else {
            emit_absent(&self.key, self.omit, out);
            return;
        };

        let text = match view {
            ValueRef::Str(s) => (!s.is_empty()).then(|| s.to_owned()),
            ValueRef::Char(c) => (c != '\0').then(|| c.to_string()),
            ValueRef::Int(n) => (n != 0).then(|| n.to_string()),
            ValueRef::Uint(n) => (n != 0).then(|| n.to_string()),
            ValueRef::Float32(n) => (n != 0.0).then(|| format_float(n)),
            ValueRef::Float64(n) => (n != 0.0).then(|| format_float(n)),
            ValueRef::Complex64(c) => (c != Complex::default()).then(|| format_complex(c)),
            ValueRef::Complex128(c) => (c != Complex::default()).then(|| format_complex(c)),
            _ => return,
        };

        match text {
            Some(text) => out(&self.key, text),
            None if self.omit => {}
            None => out(&self.key, zero_text(view)),
        }
    }
}

/// Text of a zero value of the given view's kind.
fn zero_text(view: ValueRef<'_>) -> String {
    match view {
        ValueRef::Str(_) | ValueRef::Char(_) => String::new(),
        ValueRef::Complex64(_) | ValueRef::Complex128(_) => "(0+0i)".to_owned(),
        _ => "0".to_owned(),
    }
}

/// Floats rendered in the shortest decimal form that round-trips, without
/// exponent.
pub(crate) trait FloatText: Copy {
    fn text(self) -> String;
}

macro_rules! impl_float_text {
    ($($t:ty),*) => {
        $(
            impl FloatText for $t {
                fn text(self) -> String {
                    if self.is_nan() {
                        "NaN".to_owned()
                    } else if self.is_infinite() {
                        let inf = if self.is_sign_negative() { "-Inf" } else { "+Inf" };
                        inf.to_owned()
                    } else {
                        self.to_string()
                    }
                }
            }
        )*
    };
}

impl_float_text!(f32, f64);

pub(crate) fn format_float<F: FloatText>(n: F) -> String {
    n.text()
}

/// `(re+imi)`, both parts in [`format_float`] form.
pub(crate) fn format_complex<F: FloatText>(c: Complex<F>) -> String {
    let re = format_float(c.re);
    let im = format_float(c.im);
    let sign = if im.starts_with(['+', '-']) { "" } else { "+" };
    format!("({re}{sign}{im}i)")
}

/// Boolean fields, as `true`/`false` or, with the `int` option, `1`/`0`.
pub(crate) struct BoolField {
    pub(crate) key: String,
    pub(crate) omit: bool,
    pub(crate) as_int: bool,
}

impl BoolField {
    pub(crate) fn format(&self, value: &dyn Reflect, out: &mut Emit<'_>) {
        let b = match deref(value) {
            None => {
                emit_absent(&self.key, self.omit, out);
                return;
            }
            Some((_, ValueRef::Bool(b))) => b,
            Some(_) => return,
        };

        if !b && self.omit {
            return;
        }
        let text = match (self.as_int, b) {
            (true, true) => "1",
            (true, false) => "0",
            (false, true) => "true",
            (false, false) => "false",
        };
        out(&self.key, text.to_owned());
    }
}

/// Timestamp layout selected by the field options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimeFormat {
    /// RFC 3339 with second precision.
    Rfc3339,
    /// Unix seconds.
    Second,
    /// Unix milliseconds.
    Millis,
}

impl TimeFormat {
    pub(crate) fn from_options(options: &[String]) -> Self {
        options
            .iter()
            .rev()
            .find_map(|o| match o.as_str() {
                "second" => Some(Self::Second),
                "millis" => Some(Self::Millis),
                _ => None,
            })
            .unwrap_or(Self::Rfc3339)
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::Rfc3339 => "rfc3339",
            Self::Second => "second",
            Self::Millis => "millis",
        }
    }

    fn render(self, time: &DateTime<FixedOffset>) -> String {
        match self {
            Self::Rfc3339 => time.to_rfc3339_opts(SecondsFormat::Secs, true),
            Self::Second => time.timestamp().to_string(),
            Self::Millis => unix_millis(time).to_string(),
        }
    }
}

/// Milliseconds since the epoch, truncated toward zero.
fn unix_millis(time: &DateTime<FixedOffset>) -> i64 {
    let millis = time.timestamp_millis();
    if millis < 0 && time.timestamp_subsec_nanos() % 1_000_000 != 0 {
        millis + 1
    } else {
        millis
    }
}

/// Timestamp fields.
pub(crate) struct TimeField {
    pub(crate) key: String,
    pub(crate) omit: bool,
    pub(crate) format: TimeFormat,
}

impl TimeField {
    pub(crate) fn format(&self, value: &dyn Reflect, out: &mut Emit<'_>) {
        let time = match deref(value) {
            None => {
                emit_absent(&self.key, self.omit, out);
                return;
            }
            Some((_, ValueRef::Time(time))) => time,
            Some(_) => return,
        };

        // The zero time is the Unix epoch.
        if self.omit && time.timestamp() == 0 && time.timestamp_subsec_nanos() == 0 {
            return;
        }
        out(&self.key, self.format.render(&time));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn run(field: impl Fn(&mut Emit<'_>)) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        field(&mut |k: &str, v: String| pairs.push((k.to_owned(), v)));
        pairs
    }

    fn scalar(kind: ScalarKind, omit: bool) -> ScalarField {
        ScalarField {
            key: "k".into(),
            omit,
            kind,
        }
    }

    #[test]
    fn floats_use_shortest_form() {
        assert_eq!(format_float(0.1234f32), "0.1234");
        assert_eq!(format_float(0.1234f64), "0.1234");
        assert_eq!(format_float(64.0f64), "64");
        assert_eq!(format_float(f64::INFINITY), "+Inf");
    }

    #[test]
    fn complex_shows_sign_of_imaginary_part() {
        assert_eq!(format_complex(Complex::new(64.0f64, 0.0)), "(64+0i)");
        assert_eq!(format_complex(Complex::new(1.5f32, -2.0)), "(1.5-2i)");
    }

    #[test]
    fn zero_scalars_are_emitted_unless_omitted() {
        let field = scalar(ScalarKind::Int, false);
        assert_eq!(run(|out| field.format(&0i32, out)), vec![("k".into(), "0".into())]);

        let field = scalar(ScalarKind::Int, true);
        assert!(run(|out| field.format(&0i32, out)).is_empty());
        assert_eq!(run(|out| field.format(&-3i8, out)), vec![("k".into(), "-3".into())]);
    }

    #[test]
    fn nil_scalars_emit_empty_string() {
        let field = scalar(ScalarKind::Str, false);
        let none: Option<String> = None;
        assert_eq!(run(|out| field.format(&none, out)), vec![("k".into(), String::new())]);

        let field = scalar(ScalarKind::Str, true);
        assert!(run(|out| field.format(&none, out)).is_empty());
    }

    #[test]
    fn bool_int_option() {
        let field = BoolField {
            key: "b".into(),
            omit: false,
            as_int: true,
        };
        assert_eq!(run(|out| field.format(&true, out)), vec![("b".into(), "1".into())]);
        assert_eq!(run(|out| field.format(&false, out)), vec![("b".into(), "0".into())]);
    }

    #[test]
    fn time_formats() {
        let t = Utc.timestamp_opt(600, 0).single().expect("valid timestamp");
        let cases = [
            (TimeFormat::Rfc3339, "1970-01-01T00:10:00Z"),
            (TimeFormat::Second, "600"),
            (TimeFormat::Millis, "600000"),
        ];
        for (format, expected) in cases {
            let field = TimeField {
                key: "t".into(),
                omit: false,
                format,
            };
            assert_eq!(run(|out| field.format(&t, out)), vec![("t".into(), expected.into())]);
        }
    }

    #[test]
    fn millis_truncate_toward_zero_before_epoch() {
        let field = TimeField {
            key: "t".into(),
            omit: false,
            format: TimeFormat::Millis,
        };
        let cases = [
            (Utc.timestamp_opt(-1, 999_500_000), "0"),
            (Utc.timestamp_opt(-2, 500_000), "-1999"),
            (Utc.timestamp_opt(-2, 0), "-2000"),
            (Utc.timestamp_opt(1, 999_999_999), "1999"),
        ];
        for (time, expected) in cases {
            let t = time.single().expect("valid timestamp");
            assert_eq!(run(|out| field.format(&t, out)), vec![("t".into(), expected.into())]);
        }
    }

    #[test]
    fn last_time_option_wins() {
        let options = vec!["millis".to_string(), "second".to_string()];
        assert_eq!(TimeFormat::from_options(&options), TimeFormat::Second);
        assert_eq!(TimeFormat::from_options(&[]), TimeFormat::Rfc3339);
    }
}
