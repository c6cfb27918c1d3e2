#![allow(missing_docs)]

use std::marker::PhantomData;

use qsenc::{Encoder, QueryRecord, Record, Reflect, ValueRef};

#[derive(QueryRecord, Default)]
struct Annotated {
    #[qs("renamed")]
    pub first: String,
    #[qs(",omitempty")]
    pub second: u8,
    pub third: bool,
    #[qs(form = "form_name")]
    pub fourth: i32,
    #[qs(skip)]
    pub fifth: PhantomData<fn()>,
    hidden: u8,
    #[qs(embed)]
    embedded: u8,
    pub r#type: String,
}

#[test]
fn test_field_table() {
    let fields = Annotated::fields();
    let names: Vec<&str> = fields.iter().map(|f| f.name).collect();
    assert_eq!(
        names,
        ["first", "second", "third", "fourth", "fifth", "hidden", "embedded", "type"]
    );

    assert_eq!(fields[0].tag("qs"), Some("renamed"));
    assert_eq!(fields[1].tag("qs"), Some(",omitempty"));
    assert_eq!(fields[2].tag("qs"), None);
    assert_eq!(fields[3].tag("form"), Some("form_name"));
    assert_eq!(fields[3].tag("qs"), None);

    assert!(fields[0].exported);
    assert!(!fields[5].exported && !fields[5].embedded);
    assert!(!fields[6].exported && fields[6].embedded);
}

#[test]
fn test_skipped_fields_have_no_accessor() {
    let value = Annotated::default();
    assert!(value.field(0).is_some());
    assert!(value.field(4).is_none());
    assert!(value.field(99).is_none());
    assert!(matches!(value.reflect(), ValueRef::Record(_)));
    assert_eq!(value.dyn_shape().type_id(), std::any::TypeId::of::<Annotated>());
}

#[test]
fn test_annotations_drive_keys() -> qsenc::Result<()> {
    let value = Annotated {
        first: "a".into(),
        second: 0,
        third: true,
        fourth: 4,
        fifth: PhantomData,
        hidden: 1,
        embedded: 2,
        r#type: "t".into(),
    };
    assert_eq!(value.hidden, 1);

    let values = Encoder::new().values(&value)?;
    let keys: Vec<&String> = values.keys().collect();
    assert_eq!(keys, ["embedded", "fourth", "renamed", "third", "type"]);
    assert_eq!(values.get("embedded"), Some("2"));

    let form = Encoder::builder().tag_alias("form").build().values(&value)?;
    assert_eq!(form.get("form_name"), Some("4"));
    assert_eq!(form.get("first"), Some("a"));
    assert_eq!(form.get("second"), Some("0"));
    Ok(())
}

#[test]
fn test_later_annotation_replaces_earlier() -> qsenc::Result<()> {
    #[derive(QueryRecord)]
    struct Twice {
        #[qs("old")]
        #[qs("new,omitempty")]
        pub value: u8,
    }

    assert_eq!(Twice::fields()[0].tag("qs"), Some("new,omitempty"));
    let values = Encoder::new().values(&Twice { value: 3 })?;
    assert_eq!(values.get("new"), Some("3"));
    assert!(Encoder::new().values(&Twice { value: 0 })?.is_empty());
    Ok(())
}

#[test]
fn test_tuple_structs_use_indices() -> qsenc::Result<()> {
    #[derive(QueryRecord)]
    struct Pair(pub String, #[qs("second")] pub u8);

    let values = Encoder::new().values(&Pair("x".into(), 2))?;
    assert_eq!(values.get("0"), Some("x"));
    assert_eq!(values.get("second"), Some("2"));
    Ok(())
}

#[test]
fn test_generic_records() -> qsenc::Result<()> {
    #[derive(QueryRecord)]
    struct Page<T> {
        #[qs("items,comma")]
        pub items: Vec<T>,
        #[qs("next,omitempty")]
        pub next: Option<T>,
    }

    let encoder = Encoder::new();
    let numbers = encoder.values(&Page {
        items: vec![1u8, 2],
        next: Some(3u8),
    })?;
    assert_eq!(numbers.get("items"), Some("1,2"));
    assert_eq!(numbers.get("next"), Some("3"));

    let words = encoder.values(&Page::<String> {
        items: vec!["a".into()],
        next: None,
    })?;
    assert_eq!(words.get("items"), Some("a"));
    assert!(!words.contains_key("next"));

    // Each instantiation is its own record type.
    assert_eq!(encoder.cached_types(), 2);
    Ok(())
}

#[test]
fn test_unit_struct_encodes_nothing() -> qsenc::Result<()> {
    #[derive(QueryRecord)]
    struct Unit;

    assert!(Unit::fields().is_empty());
    assert!(Encoder::new().values(&Unit)?.is_empty());
    Ok(())
}
