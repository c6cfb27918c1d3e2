// demos/custom.rs
//! Self-formatting types and formatters registered on the encoder.
//! Run: cargo run --example custom

#![allow(missing_docs)]

use qsenc::{BoxError, EncodeParam, Encoder, QsError, QueryParam, QueryRecord};

/// Geographic point, encoded as `lat,lng`.
#[derive(QueryParam, Clone, Copy)]
struct Point {
    lat: f64,
    lng: f64,
}

impl EncodeParam for Point {
    fn encode_param(&self) -> Result<String, BoxError> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(format!("latitude out of range: {}", self.lat).into());
        }
        Ok(format!("{},{}", self.lat, self.lng))
    }
}

/// Amount in cents.
struct Cents(u64);

impl qsenc::Reflect for Cents {
    fn shape() -> qsenc::Shape {
        qsenc::Shape::of::<Self>(qsenc::Kind::Unsupported)
    }

    fn dyn_shape(&self) -> qsenc::Shape {
        Self::shape()
    }

    fn reflect(&self) -> qsenc::ValueRef<'_> {
        qsenc::ValueRef::Opaque
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[derive(QueryRecord)]
struct Nearby {
    #[qs("near")]
    pub near: Point,
    #[qs("max_price,decimal")]
    pub max_price: Cents,
    #[qs("stops,bracket")]
    pub stops: Vec<Point>,
}

fn main() -> qsenc::Result<()> {
    println!("=== QSENC CUSTOM ===");

    let encoder = Encoder::builder()
        .custom_type::<Cents, _>(|cents, options, emit| {
            if options.iter().any(|o| o == "decimal") {
                emit(format!("{}.{:02}", cents.0 / 100, cents.0 % 100));
            } else {
                emit(cents.0.to_string());
            }
            Ok(())
        })
        .build();
    println!("{encoder:?}");

    let query = Nearby {
        near: Point {
            lat: 52.52,
            lng: 13.405,
        },
        max_price: Cents(2550),
        stops: vec![Point { lat: 1.0, lng: 2.0 }],
    };
    let values = encoder.values(&query)?;
    println!("  {values}");
    assert_eq!(values.get("near"), Some("52.52,13.405"));
    assert_eq!(values.get("max_price"), Some("25.50"));
    assert_eq!(values.get("stops[]"), Some("1,2"));

    // Unregistered, `Cents` reflects as unsupported and is skipped.
    let plain = Encoder::new().values(&query)?;
    assert!(!plain.contains_key("max_price"));

    let broken = Nearby {
        near: Point {
            lat: 100.0,
            lng: 0.0,
        },
        ..query
    };
    match encoder.values(&broken) {
        Err(QsError::Custom { key, source }) => println!("  `{key}` failed: {source}"),
        other => println!("  unexpected: {other:?}"),
    }
    println!("\n>> Verified!");
    Ok(())
}
