// demos/basic.rs
//! Flat record with the common options.
//! Run: cargo run --example basic

#![allow(missing_docs)]

use qsenc::{Encoder, QueryRecord};

#[derive(QueryRecord)]
struct ListRepos {
    #[qs("q")]
    pub query: String,
    #[qs("page,omitempty")]
    pub page: u32,
    #[qs("per_page,omitempty")]
    pub per_page: Option<u32>,
    #[qs("archived,int")]
    pub archived: bool,
    #[qs("topics,comma")]
    pub topics: Vec<String>,
    #[qs("owners,bracket")]
    pub owners: Vec<String>,
    #[qs("-")]
    pub token: String,
}

fn main() -> qsenc::Result<()> {
    println!("=== QSENC BASIC ===");

    let request = ListRepos {
        query: "query encoder".into(),
        page: 0,
        per_page: Some(30),
        archived: false,
        topics: vec!["rust".into(), "url".into()],
        owners: vec!["ana".into(), "bo".into()],
        token: "secret".into(),
    };

    let encoder = Encoder::new();
    let values = encoder.values(&request)?;

    println!("\n[Values]");
    for (key, list) in &values {
        println!("  {key} = {list:?}");
    }

    println!("\n[Query string]");
    println!("  {}", values.encode());

    assert!(!values.contains_key("page"));
    assert!(!values.contains_key("token"));
    assert_eq!(values.get("archived"), Some("0"));
    assert_eq!(values.get_all("owners[]"), ["ana", "bo"]);
    println!("\n>> Verified!");

    println!("\n{}", encoder.inspect::<ListRepos>()?);
    Ok(())
}
