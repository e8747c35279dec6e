//! Canonical JSON encoding for registered documents.
//!
//! Documents are opaque [`Value`]s. Canonical output is compact UTF-8 with
//! object keys in sorted order, so encoding the parse of an encoding yields
//! the same bytes again. No HTML escaping is applied: `<`, `>`, `&` and `=`
//! are written as-is.

use bytes::Bytes;
use serde_json::{Map, Value};

/// Encode `document` as compact canonical JSON.
pub fn canonicalize(document: &Value) -> Bytes {
    // Serializing a `Value` into a Vec cannot fail: keys are always strings.
    Bytes::from(serde_json::to_vec(document).unwrap_or_default())
}

/// Encode `document` with two-space indentation.
pub fn pretty(document: &Value) -> Bytes {
    Bytes::from(serde_json::to_vec_pretty(document).unwrap_or_default())
}

/// Parse bytes as a JSON value, ignoring a leading UTF-8 BOM.
pub fn parse(bytes: &[u8]) -> serde_json::Result<Value> {
    let bytes = bytes.strip_prefix(b"\xef\xbb\xbf").unwrap_or(bytes);
    serde_json::from_slice(bytes)
}

/// Parse bytes, keeping the result only if it is a JSON object.
pub fn parse_object(bytes: &[u8]) -> serde_json::Result<Option<Map<String, Value>>> {
    Ok(match parse(bytes)? {
        Value::Object(map) => Some(map),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compact_output() {
        let doc = json!({ "b": [1, 2, { "c": null }], "a": "x y" });
        let bytes = canonicalize(&doc);
        assert_eq!(&bytes[..], br#"{"a":"x y","b":[1,2,{"c":null}]}"#);
    }

    #[test]
    fn test_idempotent() {
        let doc = json!({
            "type": "minecraft:random_spread",
            "spacing": 32,
            "salt": 14357620,
            "weight": 0.1,
            "nested": { "z": true, "a": [ -1.5e-7, "ü" ] }
        });
        let once = canonicalize(&doc);
        let twice = canonicalize(&parse(&once).unwrap());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_no_html_escaping() {
        let doc = json!({ "text": "<a href='x'>&=</a>" });
        let bytes = canonicalize(&doc);
        let text = std::str::from_utf8(&bytes).unwrap();
        assert!(text.contains("<a href='x'>&=</a>"));
    }

    #[test]
    fn test_pretty_is_indented() {
        let bytes = pretty(&json!({ "a": 1 }));
        assert_eq!(&bytes[..], b"{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_parse_strips_bom() {
        let mut bytes = vec![0xef, 0xbb, 0xbf];
        bytes.extend_from_slice(b"{\"a\":1}");
        assert_eq!(parse(&bytes).unwrap(), json!({ "a": 1 }));
    }

    #[test]
    fn test_parse_object_rejects_arrays() {
        assert!(parse_object(b"[1,2]").unwrap().is_none());
        assert!(parse_object(b"{}").unwrap().is_some());
        assert!(parse_object(b"{").is_err());
    }
}
