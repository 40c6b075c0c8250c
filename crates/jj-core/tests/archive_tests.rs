use std::collections::BTreeMap;

use chrono_tz::Tz;
use jj_core::{
    ArchiveError, ArchiveValue, Decodable, Encodable, KeyedArchiver, KeyedUnarchiver,
    parse_rfc3339_date, wrap, wrap_decoder, wrap_encoder,
};
use tempfile::tempdir;
use url::Url;

fn sample_archive() -> KeyedUnarchiver {
    let mut archiver = KeyedArchiver::new();
    {
        let mut enc = wrap_encoder(&mut archiver);
        enc.put("Title", "title");
        enc.put("Nice", "text");
        let mut obj = BTreeMap::new();
        obj.insert("key".to_string(), "value".to_string());
        enc.put(&obj, "obj");
        enc.put(
            parse_rfc3339_date("2016-06-10T00:00:00.000Z").unwrap(),
            "date",
        );
        enc.put(false, "boolValue");
        enc.put(13, "number");
        enc.put(1.1f64, "double");
        enc.put(10f32, "float");
        enc.put(None::<f32>, "optionalFloat");
        enc.put(Url::parse("http://anjlab.com").unwrap(), "url");
        enc.put(Tz::Europe__Moscow, "zone");
    }
    assert_eq!(archiver.len(), 11);
    KeyedUnarchiver::from_bytes(&archiver.finish()).unwrap()
}

#[test]
fn encode_then_decode() {
    let archive = sample_archive();
    let dec = wrap_decoder(&archive);

    assert_eq!(dec.key("text").string().unwrap(), "Nice");
    assert_eq!(dec.key("unknownKey").as_string(), None);
    assert_eq!(dec.key("unknownKey").to_string("x"), "x");
    assert_eq!(dec.key("number").int().unwrap(), 13);
    assert_eq!(dec.key("number").to_int(0), 13);
    assert_eq!(dec.key("float").float().unwrap(), 10.0);
    assert_eq!(dec.key("double").double().unwrap(), 1.1);
    assert_eq!(dec.key("optionalFloat").as_float(), None);
    assert_eq!(dec.key("unknownKey").as_int(), None);
    assert_eq!(dec.key("unknownKey").as_date(), None);
    assert_eq!(dec.key("unknownKey").as_url(), None);
    assert_eq!(dec.key("unknownKey").as_time_zone(), None);

    let date = parse_rfc3339_date("2016-06-10T00:00:00.000Z").unwrap();
    assert_eq!(dec.key("date").date().unwrap(), date);
    assert_eq!(dec.key("date").as_date(), Some(date));
    assert_eq!(
        dec.key("url").url().unwrap(),
        Url::parse("http://anjlab.com").unwrap()
    );
    assert_eq!(dec.key("zone").time_zone().unwrap(), Tz::Europe__Moscow);

    assert!(!dec.key("boolValue").bool().unwrap());
    assert!(!dec.key("boolValue").to_bool(true));
    assert_eq!(dec.key("boolValue").key(), "boolValue");
    assert!(std::ptr::eq(dec.key("boolValue").decoder(), &archive));
    assert!(std::ptr::eq(dec.decoder(), &archive));

    assert_eq!(dec.key("title").decode::<String>().unwrap(), "Title");
    let obj: BTreeMap<String, String> = dec.key("obj").decode_as().unwrap();
    assert_eq!(obj.get("key").map(String::as_str), Some("value"));
}

#[test]
fn decode_error_messages() {
    let archive = sample_archive();
    let dec = wrap_decoder(&archive);

    assert_eq!(
        dec.key("unknownKey").date().unwrap_err().to_string(),
        "WrongType: Can't convert nil at path: 'unknownKey' to type 'Date'"
    );
    assert_eq!(
        dec.key("unknownKey").string().unwrap_err().to_string(),
        "WrongType: Can't convert nil at path: 'unknownKey' to type 'String'"
    );
    assert_eq!(
        dec.key("unknownKey").decode::<f64>().unwrap_err().to_string(),
        "WrongType: Can't convert nil at path: 'unknownKey' to type 'T'"
    );
    assert_eq!(
        dec.key("optionalFloat").float().unwrap_err().to_string(),
        "WrongType: Can't convert null at path: 'optionalFloat' to type 'Float'"
    );
    assert_eq!(
        dec.key("text").int().unwrap_err().to_string(),
        "WrongType: Can't convert \"Nice\" at path: 'text' to type 'Int'"
    );
}

#[test]
fn stored_width_must_match() {
    let archive = sample_archive();
    let dec = wrap_decoder(&archive);

    assert_eq!(dec.key("double").as_float(), None);
    assert_eq!(
        dec.key("double").float().unwrap_err().to_string(),
        "WrongType: Can't convert 1.1 at path: 'double' to type 'Float'"
    );
    assert_eq!(dec.key("float").as_double(), None);
    assert_eq!(dec.key("number").as_double(), None);
    assert_eq!(dec.key("number").as_bool(), None);
    assert_eq!(dec.key("boolValue").as_int(), None);
}

#[test]
fn integers_are_stored_as_32_bits() {
    let mut archiver = KeyedArchiver::new();
    {
        let mut enc = wrap_encoder(&mut archiver);
        enc.put((1i64 << 32) | 5, "big");
        enc.put(u32::MAX, "max");
        enc.put(-7i64, "neg");
        enc.put(1u8, "k");
        enc.put(2usize, "k");
    }
    let archive = KeyedUnarchiver::from_bytes(&archiver.finish()).unwrap();
    let dec = wrap_decoder(&archive);
    assert_eq!(dec.key("big").int().unwrap(), 5);
    assert_eq!(dec.key("max").int().unwrap(), -1);
    assert_eq!(dec.key("neg").int().unwrap(), -7);
    // last write wins
    assert_eq!(dec.key("k").int().unwrap(), 2);
    assert_eq!(archive.len(), 4);
    assert_eq!(archive.keys(), vec!["big", "k", "max", "neg"]);
}

#[test]
fn archive_file_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.archive");

    let mut archiver = KeyedArchiver::default();
    {
        let mut enc = wrap_encoder(&mut archiver);
        enc.put(vec![1, 2, 3], "list");
        enc.put("hello", "greeting");
        enc.archiver().encode_bool("raw", true);
    }
    archiver.write_to_file(&path).unwrap();

    let archive = KeyedUnarchiver::open(&path).unwrap();
    let dec = wrap_decoder(&archive);
    assert_eq!(dec.key("list").decode::<Vec<i32>>().unwrap(), vec![1, 2, 3]);
    assert_eq!(dec.key("greeting").string().unwrap(), "hello");
    assert!(dec.key("raw").bool().unwrap());
    assert!(archive.contains_key("list"));
    assert!(!archive.contains_key("missing"));

    assert!(matches!(
        KeyedUnarchiver::open(&dir.path().join("missing.archive")),
        Err(ArchiveError::Io(_))
    ));
}

#[test]
fn archive_inspection_as_tree() {
    let archive = sample_archive();
    let node = archive.to_node();
    let root = wrap(&node);

    assert_eq!(root.at("number").int().unwrap(), 13);
    assert_eq!(root.at("float").float().unwrap(), 10.0);
    assert_eq!(root.at("double").double().unwrap(), 1.1);
    assert_eq!(
        root.at("date").date().unwrap(),
        parse_rfc3339_date("2016-06-10T00:00:00.000Z").unwrap()
    );
    assert_eq!(root.at("zone").string().unwrap(), "Europe/Moscow");
    assert_eq!(root.at("obj").at("key").string().unwrap(), "value");
    assert!(root.at("optionalFloat").is_null());
    assert_eq!(root.obj().unwrap().keys().next(), Some("boolValue"));
}

#[test]
fn malformed_bytes_are_rejected() {
    assert!(matches!(
        KeyedUnarchiver::from_bytes(&[]),
        Err(ArchiveError::Eof { pos: 0 })
    ));
    assert!(matches!(
        KeyedUnarchiver::from_bytes(&[5]),
        Err(ArchiveError::BadHeader { found: 5 })
    ));
    assert!(matches!(
        KeyedUnarchiver::from_bytes(&[0, 2, 0, 0, 0, 0, 0, 0, 0, 11]),
        Err(ArchiveError::UnsupportedVersion { major: 2, minor: 0 })
    ));
    assert!(matches!(
        KeyedUnarchiver::from_bytes(&[0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 1, b'k', 99]),
        Err(ArchiveError::UnknownValueType { code: 99, pos: 12 })
    ));
    assert!(matches!(
        KeyedUnarchiver::from_bytes(&[0, 1, 0, 0, 0, 0, 0, 0, 0, 7]),
        Err(ArchiveError::UnknownRecord { code: 7, pos: 9 })
    ));

    let mut archiver = KeyedArchiver::new();
    wrap_encoder(&mut archiver).put("value", "key");
    let bytes = archiver.finish();
    assert!(matches!(
        KeyedUnarchiver::from_bytes(&bytes[..bytes.len() - 1]),
        Err(ArchiveError::Eof { .. })
    ));

    let mut padded = bytes.clone();
    padded.push(0);
    assert!(matches!(
        KeyedUnarchiver::from_bytes(&padded),
        Err(ArchiveError::TrailingData { pos }) if pos == bytes.len()
    ));

    let empty = KeyedUnarchiver::from_bytes(&KeyedArchiver::new().finish()).unwrap();
    assert!(empty.is_empty());
}

fn nested_arrays(depth: usize) -> Vec<u8> {
    let mut bytes = vec![0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 1, b'k'];
    for _ in 0..depth {
        bytes.extend_from_slice(&[40, 1, 0, 0, 0]);
    }
    bytes.push(17);
    bytes.push(11);
    bytes
}

#[test]
fn deep_nesting_is_rejected() {
    assert!(matches!(
        KeyedUnarchiver::from_bytes(&nested_arrays(200_000)),
        Err(ArchiveError::TooDeep { .. })
    ));
    assert!(matches!(
        KeyedUnarchiver::from_bytes(&nested_arrays(200)),
        Err(ArchiveError::TooDeep { pos: 657 })
    ));

    let archive = KeyedUnarchiver::from_bytes(&nested_arrays(100)).unwrap();
    let mut v = wrap_decoder(&archive).key("k").raw().unwrap();
    let mut levels = 0;
    while let ArchiveValue::Array(items) = v {
        v = &items[0];
        levels += 1;
    }
    assert_eq!(levels, 100);
    assert_eq!(v, &ArchiveValue::Null);
}

#[derive(Debug, PartialEq)]
struct Owner {
    name: String,
    stars: i32,
}

impl Encodable for Owner {
    fn encode(&self) -> ArchiveValue {
        ArchiveValue::Map(vec![
            ("name".to_string(), self.name.encode()),
            ("stars".to_string(), self.stars.encode()),
        ])
    }
}

impl Decodable for Owner {
    const TYPE_LABEL: &'static str = "Owner";

    fn decode(value: &ArchiveValue) -> Option<Self> {
        let ArchiveValue::Map(members) = value else {
            return None;
        };
        let field = |k: &str| members.iter().find(|(name, _)| name == k).map(|(_, v)| v);
        Some(Owner {
            name: String::decode(field("name")?)?,
            stars: i32::decode(field("stars")?)?,
        })
    }
}

#[test]
fn custom_types_use_their_own_label() {
    let owner = Owner {
        name: "anjlab".to_string(),
        stars: 42,
    };
    let mut archiver = KeyedArchiver::new();
    {
        let mut enc = wrap_encoder(&mut archiver);
        enc.put(&owner, "owner");
        enc.put("nope", "other");
    }
    let archive = KeyedUnarchiver::from_bytes(&archiver.finish()).unwrap();
    let dec = wrap_decoder(&archive);
    assert_eq!(dec.key("owner").decode::<Owner>().unwrap(), owner);
    assert_eq!(
        dec.key("other").decode::<Owner>().unwrap_err().to_string(),
        "WrongType: Can't convert \"nope\" at path: 'other' to type 'Owner'"
    );
}
