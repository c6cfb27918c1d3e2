#![allow(missing_docs)]

use proptest::prelude::*;
use qsenc::{Encoder, QueryRecord};

#[derive(QueryRecord, Debug, Clone)]
struct Flat {
    #[qs("s")]
    pub s: String,
    #[qs("n")]
    pub n: i64,
    #[qs("u")]
    pub u: u32,
    #[qs("b,int")]
    pub b: bool,
    #[qs("o")]
    pub o: Option<i16>,
}

#[derive(QueryRecord, Debug, Clone)]
struct Layouts {
    #[qs("repeat")]
    pub repeat: Vec<String>,
    #[qs("comma,comma")]
    pub comma: Vec<String>,
    #[qs("bracket,bracket")]
    pub bracket: Vec<u16>,
    #[qs("index,index")]
    pub index: Vec<Option<u16>>,
}

fn flat() -> impl Strategy<Value = Flat> {
    (
        ".*",
        any::<i64>(),
        any::<u32>(),
        any::<bool>(),
        proptest::option::of(any::<i16>()),
    )
        .prop_map(|(s, n, u, b, o)| Flat { s, n, u, b, o })
}

fn layouts() -> impl Strategy<Value = Layouts> {
    (
        proptest::collection::vec("[a-z]{0,4}", 0..6),
        proptest::collection::vec("[a-z]{1,4}", 0..6),
        proptest::collection::vec(any::<u16>(), 0..6),
        proptest::collection::vec(proptest::option::of(any::<u16>()), 0..6),
    )
        .prop_map(|(repeat, comma, bracket, index)| Layouts {
            repeat,
            comma,
            bracket,
            index,
        })
}

proptest! {
    #[test]
    fn prop_encoding_is_deterministic(value in flat()) {
        let encoder = Encoder::new();
        let first = encoder.values(&value).expect("record input");
        let second = encoder.values(&value).expect("record input");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_key_set_does_not_depend_on_values(a in flat(), b in flat()) {
        let encoder = Encoder::new();
        let a = encoder.values(&a).expect("record input");
        let b = encoder.values(&b).expect("record input");
        prop_assert_eq!(a.keys().collect::<Vec<_>>(), b.keys().collect::<Vec<_>>());
        prop_assert_eq!(a.len(), 5);
    }

    #[test]
    fn prop_list_layouts(value in layouts()) {
        let values = Encoder::new().values(&value).expect("record input");

        prop_assert_eq!(values.get_all("repeat"), value.repeat.as_slice());

        if value.comma.is_empty() {
            prop_assert!(!values.contains_key("comma"));
        } else {
            prop_assert_eq!(values.get_all("comma"), [value.comma.join(",")]);
        }

        let bracket: Vec<String> = value.bracket.iter().map(u16::to_string).collect();
        prop_assert_eq!(values.get_all("bracket[]"), bracket.as_slice());

        let present: Vec<u16> = value.index.iter().flatten().copied().collect();
        for (n, item) in present.iter().enumerate() {
            let key = format!("index[{n}]");
            let text = item.to_string();
            prop_assert_eq!(values.get(&key), Some(text.as_str()));
        }
        let index_keys = values.keys().filter(|k| k.starts_with("index[")).count();
        prop_assert_eq!(index_keys, present.len());
    }

    #[test]
    fn prop_query_string_round_trips_through_form_decoding(value in flat()) {
        let values = Encoder::new().values(&value).expect("record input");
        let decoded: Vec<(String, String)> = url::form_urlencoded::parse(values.encode().as_bytes())
            .into_owned()
            .collect();
        let flattened: Vec<(String, String)> = values
            .iter()
            .flat_map(|(k, vs)| vs.iter().map(move |v| (k.clone(), v.clone())))
            .collect();
        prop_assert_eq!(decoded, flattened);
    }
}
