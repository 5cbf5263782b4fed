//! Candidate records returned by the search service

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One unranked search result
///
/// Only `id`, `title`, `authors` and `abstract` are interpreted. Everything
/// else the service sends (category, dates, counts) is carried in `extra`
/// and written back out untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(alias = "_id", deserialize_with = "identifier")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    /// Comma-joined when the service sends a list
    #[serde(default, deserialize_with = "author_list")]
    pub authors: String,
    #[serde(rename = "abstract", default, deserialize_with = "lenient_text")]
    pub abstract_text: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
impl Candidate {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        authors: impl Into<String>,
        abstract_text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            authors: authors.into(),
            abstract_text: abstract_text.into(),
            extra: Map::new(),
        }
    }

    /// Attach a passthrough field
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// A candidate together with its relevance count
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub relevance: usize,
}

fn identifier<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) if !s.is_empty() => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "identifier must be a non-empty string or a number, got {}",
            other
        ))),
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_text(&Value::deserialize(deserializer)?))
}

fn author_list<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Array(items) => Ok(items
            .iter()
            .map(|item| match item {
                // {"name": "..."} entries are common in author lists
                Value::Object(obj) => obj.get("name").map(value_text).unwrap_or_default(),
                other => value_text(other),
            })
            .filter(|name| !name.is_empty())
            .collect::<Vec<_>>()
            .join(", ")),
        other => Ok(value_text(&other)),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}
