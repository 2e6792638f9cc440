//! Turning fetched page and API bodies into record sets.

use scraper::{Html, Selector};
use serde_json::{Map, Value as JsonValue};
use tracing::debug;

use crate::config::HeadingMode;
use crate::error::{Error, Result};
use crate::record::{RecordSet, Value};

pub const HEADING_COLUMN: &str = "heading";

/// Extracts `h1` text from an HTML document into a one-column record set.
/// A page without any `h1` gives zero rows.
pub fn parse_html(html: &str, mode: HeadingMode) -> Result<RecordSet> {
    let document = Html::parse_document(html);
    let selector =
        Selector::parse("h1").map_err(|e| Error::parse(format!("bad selector: {e:?}")))?;

    let mut set = RecordSet::new(vec![HEADING_COLUMN.to_string()]);
    for element in document.select(&selector) {
        let text = element.text().collect::<String>();
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        set.push_row(vec![Value::Text(text)])?;
        if mode == HeadingMode::First {
            break;
        }
    }
    debug!(headings = set.len(), "parsed html");
    Ok(set)
}

/// Top-level layout of a JSON document we can tabulate.
#[derive(Debug)]
pub enum JsonShape {
    Object(Map<String, JsonValue>),
    ArrayOfObjects(Vec<Map<String, JsonValue>>),
}

impl JsonShape {
    pub fn resolve(value: JsonValue) -> Result<Self> {
        match value {
            JsonValue::Object(map) => Ok(JsonShape::Object(map)),
            JsonValue::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| match item {
                    JsonValue::Object(map) => Ok(map),
                    other => Err(Error::parse(format!(
                        "array element {i} is {}, expected an object",
                        kind_name(&other)
                    ))),
                })
                .collect::<Result<Vec<_>>>()
                .map(JsonShape::ArrayOfObjects),
            other => Err(Error::parse(format!(
                "expected an object or an array of objects, got {}",
                kind_name(&other)
            ))),
        }
    }

    /// Columns are the first object's keys followed by keys first seen later;
    /// rows missing a column hold null.
    pub fn into_record_set(self) -> Result<RecordSet> {
        let objects = match self {
            JsonShape::Object(map) => vec![map],
            JsonShape::ArrayOfObjects(items) => items,
        };

        let mut columns: Vec<String> = Vec::new();
        for object in &objects {
            for key in object.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }

        let mut set = RecordSet::new(columns);
        for object in &objects {
            let row = set
                .columns()
                .iter()
                .map(|c| object.get(c).map(Value::from).unwrap_or(Value::Null))
                .collect();
            set.push_row(row)?;
        }
        Ok(set)
    }
}

fn kind_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

/// Tabulates an already decoded JSON value, optionally narrowed by an
/// RFC 6901 pointer first.
pub fn tabulate_json(value: JsonValue, pointer: Option<&str>) -> Result<RecordSet> {
    let value = match pointer {
        Some(p) => {
            let mut value = value;
            value
                .pointer_mut(p)
                .map(JsonValue::take)
                .ok_or_else(|| Error::parse(format!("JSON pointer {p:?} matched nothing")))?
        }
        None => value,
    };
    let set = JsonShape::resolve(value)?.into_record_set()?;
    debug!(rows = set.len(), columns = set.columns().len(), "parsed json");
    Ok(set)
}

/// Decodes a JSON body and tabulates it.
pub fn parse_json(text: &str, pointer: Option<&str>) -> Result<RecordSet> {
    let value: JsonValue = serde_json::from_str(text)?;
    tabulate_json(value, pointer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_h1_gives_one_row() {
        let set = parse_html("<html><body><h1>Hello</h1></body></html>", HeadingMode::First)
            .unwrap();
        assert_eq!(set.columns(), ["heading"]);
        assert_eq!(set.rows(), [vec![Value::Text("Hello".into())]]);
    }

    #[test]
    fn missing_h1_is_empty_not_error() {
        let set = parse_html("<html><h2>Sub</h2><p>text</p></html>", HeadingMode::First).unwrap();
        assert_eq!(set.columns(), ["heading"]);
        assert!(set.is_empty());
    }

    #[test]
    fn heading_text_is_trimmed_and_flattened() {
        let html = "<h1>\n   Big <span>News</span>\n today </h1><h1>Second</h1>";
        let set = parse_html(html, HeadingMode::First).unwrap();
        assert_eq!(set.get(0, "heading"), Some(&Value::Text("Big News today".into())));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn all_headings_mode_keeps_document_order() {
        let html = "<h1>One</h1><div><h1>Two</h1></div><h1>Three</h1>";
        let set = parse_html(html, HeadingMode::All).unwrap();
        let texts: Vec<_> = set.rows().iter().map(|r| r[0].to_string()).collect();
        assert_eq!(texts, ["One", "Two", "Three"]);
    }

    #[test]
    fn object_becomes_one_row() {
        let set = parse_json(r#"{"a":1,"b":"x"}"#, None).unwrap();
        assert_eq!(set.columns(), ["a", "b"]);
        assert_eq!(set.rows(), [vec![Value::Integer(1), Value::Text("x".into())]]);
    }

    #[test]
    fn array_of_objects_becomes_rows() {
        let set = parse_json(r#"[{"a":1},{"a":2}]"#, None).unwrap();
        assert_eq!(set.columns(), ["a"]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(1, "a"), Some(&Value::Integer(2)));
    }

    #[test]
    fn key_order_follows_document() {
        let set = parse_json(r#"{"zeta":1,"alpha":2,"mid":3}"#, None).unwrap();
        assert_eq!(set.columns(), ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn heterogeneous_keys_union_with_nulls() {
        let set = parse_json(r#"[{"a":1,"b":2},{"b":3,"c":true}]"#, None).unwrap();
        assert_eq!(set.columns(), ["a", "b", "c"]);
        assert_eq!(
            set.rows(),
            [
                vec![Value::Integer(1), Value::Integer(2), Value::Null],
                vec![Value::Null, Value::Integer(3), Value::Bool(true)],
            ]
        );
    }

    #[test]
    fn empty_array_is_empty_set() {
        let set = parse_json("[]", None).unwrap();
        assert!(set.columns().is_empty());
        assert!(set.is_empty());
    }

    #[test]
    fn pointer_selects_nested_items() {
        let body = r#"{"count":2,"items":[{"name":"x","value":1},{"name":"y","value":2}]}"#;
        let set = parse_json(body, Some("/items")).unwrap();
        assert_eq!(set.columns(), ["name", "value"]);
        assert_eq!(set.len(), 2);

        let err = parse_json(body, Some("/nope")).unwrap_err();
        assert!(err.to_string().contains("/nope"));
    }

    #[test]
    fn rejects_malformed_and_scalar_documents() {
        assert!(parse_json("{not json", None).is_err());
        let err = parse_json("42", None).unwrap_err();
        assert!(err.to_string().contains("a number"));
        let err = parse_json(r#"[{"a":1}, 5]"#, None).unwrap_err();
        assert!(err.to_string().contains("array element 1"));
    }
}
