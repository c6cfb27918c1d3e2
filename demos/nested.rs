// demos/nested.rs
//! Nested records, indexed lists of records, maps and trait-object fields.
//! Run: cargo run --example nested

#![allow(missing_docs)]

use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use qsenc::{Encoder, QueryRecord, Reflect};

#[derive(QueryRecord)]
struct Range {
    #[qs("from,second")]
    pub from: chrono::DateTime<Utc>,
    #[qs("to,second,omitempty")]
    pub to: Option<chrono::DateTime<Utc>>,
}

#[derive(QueryRecord)]
struct Sort {
    #[qs("field")]
    pub field: String,
    #[qs("desc,int")]
    pub desc: bool,
}

#[derive(QueryRecord)]
struct Report {
    #[qs("range")]
    pub range: Range,
    #[qs("sort,index")]
    pub sort: Vec<Sort>,
    #[qs("labels")]
    pub labels: BTreeMap<String, Vec<String>>,
    #[qs("cursor,omitempty")]
    pub cursor: Option<Box<dyn Reflect + Send + Sync>>,
}

fn main() -> qsenc::Result<()> {
    println!("=== QSENC NESTED ===");

    let from = Utc
        .timestamp_opt(1_700_000_000, 0)
        .single()
        .expect("valid timestamp");

    let report = Report {
        range: Range { from, to: None },
        sort: vec![
            Sort {
                field: "created".into(),
                desc: true,
            },
            Sort {
                field: "name".into(),
                desc: false,
            },
        ],
        labels: [("team".to_string(), vec!["core".to_string(), "web".to_string()])]
            .into_iter()
            .collect(),
        cursor: Some(Box::new(42u64)),
    };

    let values = qsenc::to_values(&report)?;
    for (key, list) in &values {
        println!("  {key} = {list:?}");
    }

    assert_eq!(values.get("range[from]"), Some("1700000000"));
    assert_eq!(values.get("sort[1][field]"), Some("name"));
    assert_eq!(values.get_all("labels[team]"), ["core", "web"]);
    assert_eq!(values.get("cursor"), Some("42"));
    println!("\n>> Verified!");

    println!("\n{}", Encoder::new().inspect::<Report>()?);
    Ok(())
}
