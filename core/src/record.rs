use serde::{Deserialize, Serialize};
use serde_json::Value;

pub type RecordId = i64;

/// One entry of a keyword (or genre) list. Extra fields such as `id` are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordPhrase {
    pub name: String,
}

impl KeywordPhrase {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// The normalized shape every source record is mapped into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub id: RecordId,
    pub name: String,
    pub summary: String,
    pub tags: Vec<String>,
}

/// A movie as exported by the metadata dump. `genres` and `keywords` are either
/// native lists or strings holding a literal-encoded list.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMovie {
    pub id: Value,
    pub title: String,
    pub genres: Value,
    pub keywords: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genre {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
}

/// A game as returned by the games endpoint for `fields name, summary, genres.name`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawGame {
    pub id: RecordId,
    pub name: String,
    pub summary: String,
    #[serde(default)]
    pub genres: Vec<Genre>,
}
