mod tests;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fields consulted by [`merge_data`] when no explicit list is given.
///
/// Later entries win on key conflicts, so `data` outranks `locals`.
pub const DATA_FIELDS: &[&str] = &["locals", "data"];

/// Normalized unit threaded through a parser stack
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    /// Pristine input, seeded on first normalization and never overwritten
    pub original: Option<String>,
    /// Current working payload, rewritten by each parser in the stack
    pub content: String,
    /// Metadata extracted by parsers (e.g. front-matter fields)
    pub data: Map<String, Value>,
    /// Caller-supplied configuration that is neither content nor data
    pub options: Map<String, Value>,
}

/// Accepted inputs to normalization, tagged once at the boundary
#[derive(Debug, Clone)]
pub enum RecordInput {
    /// Bare text, treated as the record's content
    Content(String),
    /// An already-shaped record
    Record(ContentRecord),
    /// A loose JSON value (string, object, or scalar)
    Value(Value),
}

impl From<&str> for RecordInput {
    fn from(s: &str) -> Self {
        RecordInput::Content(s.to_string())
    }
}

impl From<String> for RecordInput {
    fn from(s: String) -> Self {
        RecordInput::Content(s)
    }
}

impl From<ContentRecord> for RecordInput {
    fn from(record: ContentRecord) -> Self {
        RecordInput::Record(record)
    }
}

impl From<Value> for RecordInput {
    fn from(value: Value) -> Self {
        RecordInput::Value(value)
    }
}

impl ContentRecord {
    /// Create a record from bare content, seeding `original` with it
    pub fn from_content(content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            original: Some(content.clone()),
            content,
            data: Map::new(),
            options: Map::new(),
        }
    }

    /// Normalize an arbitrary input into a canonical record
    ///
    /// String inputs become `content` and seed `original`. Record and
    /// object inputs keep an already-present `original` untouched; an
    /// absent `original` is seeded from the current content, so a second
    /// normalization pass observes the same `original` even when a parser
    /// has rewritten `content` in between.
    ///
    /// Supplied `opts` merge into the record's options without overwriting
    /// keys the record already carries. `data` is re-derived via
    /// [`merge_data`] over [`DATA_FIELDS`].
    pub fn normalize(input: impl Into<RecordInput>, opts: Option<&Map<String, Value>>) -> Self {
        let mut record = match input.into() {
            RecordInput::Content(s) => Self::from_content(s),
            RecordInput::Record(record) => record,
            RecordInput::Value(value) => Self::from_value(value),
        };

        if let Some(opts) = opts {
            for (key, value) in opts {
                record.options.entry(key.clone()).or_insert_with(|| value.clone());
            }
        }

        if record.original.is_none() {
            record.original = Some(record.content.clone());
        }

        record.data = merge_data(&record, DATA_FIELDS, None);
        record
    }

    /// Build a record from a loose JSON value
    ///
    /// Objects map their recognized fields onto the record; every other
    /// property is moved into `options` rather than dropped. Non-object,
    /// non-string scalars are rendered as content.
    fn from_value(value: Value) -> Self {
        let map = match value {
            Value::String(s) => return Self::from_content(s),
            Value::Object(map) => map,
            Value::Null => return Self::from_content(""),
            other => return Self::from_content(other.to_string()),
        };

        let mut record = Self::default();
        for (key, value) in map {
            match key.as_str() {
                "content" => {
                    if let Value::String(s) = value {
                        record.content = s;
                    }
                }
                "original" | "orig" => {
                    if let Value::String(s) = value {
                        record.original.get_or_insert(s);
                    }
                }
                "data" => {
                    if let Value::Object(data) = value {
                        record.data = data;
                    }
                }
                "options" => {
                    if let Value::Object(options) = value {
                        for (k, v) in options {
                            record.options.insert(k, v);
                        }
                    }
                }
                // Unrecognized fields (including `locals`) land in options
                _ => {
                    record.options.insert(key, value);
                }
            }
        }
        record
    }
}

/// Merge metadata fields out of a record into a single mapping
///
/// Fields are consulted left-to-right in the order listed, so a
/// later-listed field's keys win on conflict. `"data"` reads the record's
/// own data map; any other name reads an object stored under that key in
/// the record's options (e.g. `"locals"`). An explicit `overrides` mapping
/// outranks every listed field.
pub fn merge_data(
    record: &ContentRecord,
    fields: &[&str],
    overrides: Option<&Map<String, Value>>,
) -> Map<String, Value> {
    let mut merged = Map::new();

    for &field in fields {
        let source = if field == "data" {
            Some(&record.data)
        } else {
            record.options.get(field).and_then(Value::as_object)
        };
        if let Some(source) = source {
            for (key, value) in source {
                merged.insert(key.clone(), value.clone());
            }
        }
    }

    if let Some(overrides) = overrides {
        for (key, value) in overrides {
            merged.insert(key.clone(), value.clone());
        }
    }

    merged
}
