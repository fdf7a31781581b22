//! JSON body validation at the request boundary.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Outcome of reading a request body as a typed JSON document.
#[derive(Debug)]
pub enum Payload<T> {
    /// No JSON object was produced: the content type is not JSON, the body
    /// is empty or unparseable, or the document is `null`.
    Absent,
    /// Well-formed JSON that does not deserialize into `T`.
    Invalid(serde_json::Error),
    Valid(T),
}

pub(crate) fn parse<T: DeserializeOwned>(content_type: Option<&str>, body: &[u8]) -> Payload<T> {
    if !content_type.is_some_and(is_json) {
        return Payload::Absent;
    }

    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(_) => return Payload::Absent,
    };
    if value.is_null() {
        return Payload::Absent;
    }

    match serde_json::from_value(value) {
        Ok(parsed) => Payload::Valid(parsed),
        Err(e) => Payload::Invalid(e),
    }
}

/// `application/json` or any `application/*+json` type, parameters ignored.
fn is_json(content_type: &str) -> bool {
    let mime = content_type.split(';').next().unwrap_or_default().trim();
    let Some((kind, subtype)) = mime.split_once('/') else {
        return false;
    };
    if !kind.eq_ignore_ascii_case("application") {
        return false;
    }
    let subtype = subtype.to_ascii_lowercase();
    subtype == "json" || subtype.ends_with("+json")
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Counter {
        name: String,
        count: i64,
    }

    fn read_body(content_type: Option<&str>, body: &str) -> Payload<Counter> {
        parse(content_type, body.as_bytes())
    }

    #[test]
    fn accepts_json_media_types() {
        assert!(is_json("application/json"));
        assert!(is_json("Application/JSON; charset=utf-8"));
        assert!(is_json("application/merge-patch+json"));
        assert!(!is_json("application/x-www-form-urlencoded"));
        assert!(!is_json("text/json"));
        assert!(!is_json("json"));
    }

    #[test]
    fn absent_without_json_content_type() {
        assert!(matches!(read_body(None, r#"{"name":"a","count":1}"#), Payload::Absent));
        assert!(matches!(
            read_body(Some("text/plain"), r#"{"name":"a","count":1}"#),
            Payload::Absent
        ));
    }

    #[test]
    fn absent_for_empty_garbled_or_null_body() {
        for body in ["", "   ", "{not json", "null"] {
            assert!(
                matches!(read_body(Some("application/json"), body), Payload::Absent),
                "body {body:?} should be absent"
            );
        }
    }

    #[test]
    fn invalid_when_shape_does_not_fit() {
        for body in [r#"{"name":"a"}"#, r#"{"name":"a","count":"1"}"#, "[1,2]", "7"] {
            assert!(
                matches!(read_body(Some("application/json"), body), Payload::Invalid(_)),
                "body {body:?} should be invalid"
            );
        }
    }

    #[test]
    fn valid_document_ignores_extra_keys() {
        let parsed = read_body(Some("application/json"), r#"{"name":"a","count":3,"extra":true}"#);
        match parsed {
            Payload::Valid(p) => assert_eq!(p, Counter { name: "a".into(), count: 3 }),
            other => panic!("expected valid payload, got {other:?}"),
        }
    }
}
