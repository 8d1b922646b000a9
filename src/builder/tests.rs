//! Tests for the recursive document builder

use std::collections::{BTreeMap, HashMap};

use bson::{Bson, DateTime, doc, oid::ObjectId};
use serde_json::json;

use super::*;
use crate::error::MongodocError;
use crate::reflect::ValueKind;

crate::record! {
    #[derive(Debug, Clone, Default)]
    struct Account {
        id: String => "id",
        name: String => "name",
        active: bool => "active",
        publish: bool => "publish",
        count: i32 => "count",
        amount: f64 => "amount",
        list: [&'static str; 2] => "list",
        meta: HashMap<String, String> => "meta",
    }

    #[derive(Debug, Clone)]
    struct Note {
        content: String => "content",
        created_at: DateTime => "createdAt",
    }

    #[derive(Debug, Clone)]
    struct Post {
        id: String => "id",
        created_at: DateTime => "createdAt",
        deleted_at: Option<DateTime> => "deletedAt",
        notes: Vec<Note> => "notes",
    }

    #[derive(Debug, Clone, Default)]
    struct Status {
        status: String => "status",
    }

    #[derive(Debug, Default)]
    struct Secretive {
        public: String => "public",
        internal: String,
        counter: u64,
    }
}

fn builder() -> DocumentBuilder {
    DocumentBuilder::default()
}

fn epoch() -> DateTime {
    DateTime::from_millis(0)
}

fn note(content: &str) -> Note {
    Note {
        content: content.to_string(),
        created_at: epoch(),
    }
}

fn post(id: &str) -> Post {
    Post {
        id: id.to_string(),
        created_at: epoch(),
        deleted_at: None,
        notes: Vec::new(),
    }
}

// ===== Root kind gate =====

#[test]
fn test_scalar_root_rejected() {
    let err = builder().build(&100).unwrap_err();
    assert!(matches!(err, MongodocError::InvalidInput(ValueKind::Scalar)));
}

#[test]
fn test_other_roots_rejected() {
    assert!(matches!(
        builder().build(&vec![1, 2]),
        Err(MongodocError::InvalidInput(ValueKind::Sequence))
    ));
    assert!(matches!(
        builder().build(&DateTime::now()),
        Err(MongodocError::InvalidInput(ValueKind::Opaque))
    ));
    assert!(matches!(
        builder().build(&None::<Status>),
        Err(MongodocError::InvalidInput(ValueKind::Invalid))
    ));
    assert!(matches!(
        builder().build(&()),
        Err(MongodocError::InvalidInput(ValueKind::Unsupported))
    ));
}

#[test]
fn test_optional_root_unwrapped() {
    let status = Some(Status {
        status: "ok".to_string(),
    });
    assert_eq!(builder().build(&status).unwrap(), doc! { "status": "ok" });
}

// ===== Records =====

#[test]
fn test_record_zero_fields_omitted() {
    let account = Account {
        id: "abc".to_string(),
        name: "ABC".to_string(),
        active: false,
        publish: true,
        count: 10,
        amount: 2.5,
        ..Default::default()
    };

    let doc = builder().build(&account).unwrap();
    assert_eq!(
        doc,
        doc! {
            "id": "abc",
            "name": "ABC",
            "publish": true,
            "count": 10,
            "amount": 2.5,
        }
    );
    assert!(!doc.contains_key("active"));
}

#[test]
fn test_record_with_array_and_map() {
    let account = Account {
        id: "abc".to_string(),
        name: "ABC".to_string(),
        active: false,
        publish: true,
        count: 10,
        amount: 2.5,
        list: ["l1", "l2"],
        meta: HashMap::from([("type".to_string(), "test".to_string())]),
    };

    let doc = builder().build(&account).unwrap();
    assert_eq!(
        doc,
        doc! {
            "id": "abc",
            "name": "ABC",
            "publish": true,
            "count": 10,
            "amount": 2.5,
            "list": ["l1", "l2"],
            "meta": { "type": "test" },
        }
    );
}

#[test]
fn test_record_field_order_follows_declaration() {
    let account = Account {
        id: "abc".to_string(),
        publish: true,
        count: 1,
        ..Default::default()
    };

    let doc = builder().build(&account).unwrap();
    let keys: Vec<_> = doc.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["id", "publish", "count"]);
}

#[test]
fn test_zero_record_builds_empty_document() {
    let doc = builder().build(&Account::default()).unwrap();
    assert!(doc.is_empty());
}

#[test]
fn test_unannotated_fields_excluded() {
    let secretive = Secretive {
        public: "yes".to_string(),
        internal: "hidden".to_string(),
        counter: 42,
    };

    let doc = builder().build(&secretive).unwrap();
    assert_eq!(doc, doc! { "public": "yes" });
}

#[test]
fn test_unannotated_fields_excluded_when_nested() {
    let items = vec![Secretive {
        public: String::new(),
        internal: "hidden".to_string(),
        counter: 1,
    }];
    let input = BTreeMap::from([("items", items)]);

    // the element is not zero, but nothing in it is annotated and set
    let doc = builder().build(&input).unwrap();
    assert_eq!(doc, doc! { "items": [{}] });
}

#[test]
fn test_dash_annotation_is_a_key() {
    crate::record! {
        struct Dashed {
            value: i32 => "-",
            other: i32 => "-,omitempty",
        }
    }

    let doc = builder().build(&Dashed { value: 7, other: 0 }).unwrap();
    assert_eq!(doc, doc! { "-": 7 });
}

#[test]
fn test_duplicate_field_keys_last_write_wins() {
    crate::record! {
        struct Duplicated {
            first: String => "k",
            second: String => "k",
        }
    }

    let dup = Duplicated {
        first: "first".to_string(),
        second: "second".to_string(),
    };
    assert_eq!(builder().build(&dup).unwrap(), doc! { "k": "second" });

    // a zero later field is omitted and leaves the earlier value in place
    let kept = Duplicated {
        first: "first".to_string(),
        second: String::new(),
    };
    assert_eq!(builder().build(&kept).unwrap(), doc! { "k": "first" });
}

#[test]
fn test_colliding_map_keys_last_write_wins() {
    #[derive(PartialEq, Eq, PartialOrd, Ord)]
    struct Code(u8, &'static str);

    impl std::fmt::Display for Code {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    let input = BTreeMap::from([(Code(1, "a"), "first"), (Code(1, "b"), "second")]);
    assert_eq!(builder().build(&input).unwrap(), doc! { "1": "second" });
}

// ===== Opaque leaves =====

#[test]
fn test_nested_records_and_timestamps() {
    let now = DateTime::now();
    let post = Post {
        id: "abc".to_string(),
        created_at: now,
        deleted_at: Some(now),
        notes: vec![Note {
            content: "test content".to_string(),
            created_at: now,
        }],
    };

    let doc = builder().build(&post).unwrap();
    assert_eq!(
        doc,
        doc! {
            "id": "abc",
            "createdAt": now,
            "deletedAt": now,
            "notes": [
                { "content": "test content", "createdAt": now },
            ],
        }
    );
}

#[test]
fn test_zero_timestamp_omitted() {
    let doc = builder().build(&post("abc")).unwrap();
    assert_eq!(doc, doc! { "id": "abc" });
}

#[test]
fn test_set_option_to_zero_timestamp_kept() {
    let deleted = Post {
        deleted_at: Some(epoch()),
        ..post("abc")
    };

    let doc = builder().build(&deleted).unwrap();
    assert_eq!(doc, doc! { "id": "abc", "deletedAt": epoch() });
}

#[test]
fn test_object_id_kept_whole() {
    crate::record! {
        struct Keyed {
            id: ObjectId => "_id",
            parent: ObjectId => "parent",
        }
    }

    let oid = ObjectId::new();
    let keyed = Keyed {
        id: oid,
        parent: ObjectId::from_bytes([0; 12]),
    };

    let doc = builder().build(&keyed).unwrap();
    assert_eq!(doc, doc! { "_id": oid });
    assert!(matches!(doc.get("_id"), Some(Bson::ObjectId(_))));
}

#[test]
fn test_chrono_timestamp_stored_as_datetime() {
    let now = chrono::Utc::now();
    let input = BTreeMap::from([("at", now)]);

    let doc = builder().build(&input).unwrap();
    assert_eq!(doc, doc! { "at": DateTime::from_chrono(now) });
}

// ===== Sequences =====

#[test]
fn test_sequence_order_preserved() {
    let annotated = Post {
        notes: vec![note("first"), note("second"), note("third")],
        ..post("p")
    };

    let doc = builder().build(&annotated).unwrap();
    assert_eq!(
        doc.get_array("notes").unwrap(),
        &vec![
            Bson::Document(doc! { "content": "first" }),
            Bson::Document(doc! { "content": "second" }),
            Bson::Document(doc! { "content": "third" }),
        ]
    );
}

#[test]
fn test_sequence_elements_never_omitted() {
    let input = BTreeMap::from([("values", vec![0, 1, 0])]);
    let doc = builder().build(&input).unwrap();
    assert_eq!(doc, doc! { "values": [0, 1, 0] });
}

#[test]
fn test_unset_sequence_elements_become_null() {
    let input = BTreeMap::from([("values", vec![Some("a"), None, Some("c")])]);
    let doc = builder().build(&input).unwrap();
    assert_eq!(doc, doc! { "values": ["a", Bson::Null, "c"] });
}

#[test]
fn test_nested_sequences() {
    let input = BTreeMap::from([("grid", vec![vec![1, 2], vec![], vec![3]])]);
    let doc = builder().build(&input).unwrap();
    assert_eq!(doc, doc! { "grid": [[1, 2], [], [3]] });
}

// ===== Mappings =====

#[test]
fn test_mapping_keeps_zero_values() {
    let mut input: HashMap<String, Box<dyn Reflect>> = HashMap::new();
    input.insert("active".to_string(), Box::new(false));
    input.insert("type".to_string(), Box::new("test"));

    let doc = builder().build(&input).unwrap();
    assert_eq!(doc, doc! { "active": false, "type": "test" });
}

#[test]
fn test_nested_mapping_keeps_zero_values() {
    let now = DateTime::now();
    let mut meta: HashMap<String, Box<dyn Reflect>> = HashMap::new();
    meta.insert("name".to_string(), Box::new(""));
    meta.insert("time".to_string(), Box::new(now));

    let mut input: HashMap<String, Box<dyn Reflect>> = HashMap::new();
    input.insert("active".to_string(), Box::new(false));
    input.insert("type".to_string(), Box::new("test"));
    input.insert("list".to_string(), Box::new(vec!["l1", "l2"]));
    input.insert("meta".to_string(), Box::new(meta));

    let doc = builder().build(&input).unwrap();
    assert_eq!(
        doc,
        doc! {
            "active": false,
            "type": "test",
            "list": ["l1", "l2"],
            "meta": { "name": "", "time": now },
        }
    );
}

#[test]
fn test_mapping_containing_record() {
    let mut input: HashMap<String, Box<dyn Reflect>> = HashMap::new();
    input.insert("active".to_string(), Box::new(false));
    input.insert(
        "meta".to_string(),
        Box::new(Status {
            status: "test".to_string(),
        }),
    );

    let doc = builder().build(&input).unwrap();
    assert_eq!(
        doc,
        doc! {
            "active": false,
            "meta": { "status": "test" },
        }
    );
}

#[test]
fn test_mapping_entry_with_empty_record_kept() {
    let input = BTreeMap::from([("meta", Status::default())]);
    let doc = builder().build(&input).unwrap();
    assert_eq!(doc, doc! { "meta": {} });
}

#[test]
fn test_mapping_unset_entry_skipped() {
    let input = BTreeMap::from([("a", Some(1)), ("b", None)]);
    let doc = builder().build(&input).unwrap();
    assert_eq!(doc, doc! { "a": 1 });
}

#[test]
fn test_mapping_non_string_keys() {
    let input = BTreeMap::from([(1, "one"), (2, "two")]);
    let doc = builder().build(&input).unwrap();
    assert_eq!(doc, doc! { "1": "one", "2": "two" });
}

#[test]
fn test_unsupported_values_skipped() {
    let mut input: HashMap<String, Box<dyn Reflect>> = HashMap::new();
    input.insert("kept".to_string(), Box::new(1));
    input.insert("unit".to_string(), Box::new(()));

    let doc = builder().build(&input).unwrap();
    assert_eq!(doc, doc! { "kept": 1 });
}

// ===== Generic values =====

#[test]
fn test_document_rebuilds_to_itself() {
    let oid = ObjectId::new();
    let now = DateTime::now();
    let input = doc! {
        "_id": oid,
        "name": "",
        "count": 0,
        "big": 5_000_000_000i64,
        "ratio": 0.5,
        "at": now,
        "tags": ["a", "b"],
        "nested": { "flag": false, "items": [{ "x": 1 }, { "x": 2 }] },
    };

    let doc = builder().build(&input).unwrap();
    assert_eq!(doc, input);
}

#[test]
fn test_bson_value_root() {
    let input = Bson::Document(doc! { "a": [1, { "b": true }] });
    let doc = builder().build(&input).unwrap();
    assert_eq!(doc, doc! { "a": [1, { "b": true }] });
}

#[test]
fn test_json_value_root() {
    let input = json!({
        "active": false,
        "type": "test",
        "count": 3,
        "list": ["l1", "l2"],
        "meta": { "name": "", "missing": null },
    });

    let doc = builder().build(&input).unwrap();
    assert_eq!(
        doc,
        doc! {
            "active": false,
            "type": "test",
            "count": 3,
            "list": ["l1", "l2"],
            "meta": { "name": "" },
        }
    );
}

#[test]
fn test_json_scalar_root_rejected() {
    assert!(builder().build(&json!("text")).is_err());
    assert!(builder().build(&json!([1, 2])).is_err());
}

// ===== Options =====

#[test]
fn test_keep_zero_fields_option() {
    let options = BuildOptions {
        omit_zero_fields: false,
        ..Default::default()
    };
    let status = Status::default();

    let doc = DocumentBuilder::new(options).build(&status).unwrap();
    assert_eq!(doc, doc! { "status": "" });
}

#[test]
fn test_keep_zero_fields_still_skips_unset_options() {
    let options = BuildOptions {
        omit_zero_fields: false,
        ..Default::default()
    };
    let doc = DocumentBuilder::new(options).build(&post("")).unwrap();
    assert_eq!(
        doc,
        doc! {
            "id": "",
            "createdAt": epoch(),
            "notes": [],
        }
    );
}

#[test]
fn test_max_depth_cuts_deeper_values() {
    let options = BuildOptions {
        max_depth: Some(1),
        ..Default::default()
    };
    let input = doc! {
        "top": 1,
        "nested": { "inner": 2 },
        "list": [1, 2],
    };

    // depth 1 containers are kept, their children are not
    let doc = DocumentBuilder::new(options).build(&input).unwrap();
    assert_eq!(
        doc,
        doc! {
            "top": 1,
            "nested": {},
            "list": [Bson::Null, Bson::Null],
        }
    );
}

#[test]
fn test_default_options() {
    let options = BuildOptions::default();
    assert!(options.omit_zero_fields);
    assert_eq!(options.max_depth, None);
    assert_eq!(DocumentBuilder::new(options).build(&Status::default()).unwrap(), doc! {});
}

#[test]
fn test_independent_calls_share_nothing() {
    let shared = builder();
    let first = shared.build(&doc! { "a": 1 }).unwrap();
    let second = shared.build(&doc! { "b": 2 }).unwrap();
    assert_eq!(first, doc! { "a": 1 });
    assert_eq!(second, doc! { "b": 2 });
}

#[test]
fn test_builder_shared_across_threads() {
    let shared = std::sync::Arc::new(builder());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let shared = shared.clone();
            std::thread::spawn(move || shared.build(&doc! { "n": i }).unwrap())
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), doc! { "n": i as i32 });
    }
}
