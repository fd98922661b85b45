//! News source records from the sources endpoint.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::article::{null_as_default, wire_datetime};

/// A news publisher indexed by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsSource {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub icon: String,
    /// Priority rank; lower is more prominent
    #[serde(deserialize_with = "null_as_default")]
    pub priority: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub category: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub language: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub country: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub total_article: u64,
    #[serde(with = "wire_datetime")]
    pub last_fetch: Option<NaiveDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_source_decodes() {
        let raw = json!({
            "id": "bbc",
            "name": "BBC",
            "url": "https://www.bbc.co.uk",
            "icon": null,
            "priority": 180,
            "description": "British Broadcasting Corporation",
            "category": ["top", "world"],
            "language": ["english"],
            "country": ["united kingdom"],
            "total_article": 123456,
            "last_fetch": "2024-06-01 08:00:00"
        });

        let source: NewsSource = serde_json::from_value(raw).unwrap();
        assert_eq!(source.id, "bbc");
        assert!(source.icon.is_empty());
        assert_eq!(source.priority, 180);
        assert_eq!(source.category, vec!["top", "world"]);
        assert_eq!(source.total_article, 123456);
        assert!(source.last_fetch.is_some());
    }

    #[test]
    fn test_sparse_source() {
        let source: NewsSource = serde_json::from_value(json!({"id": "x"})).unwrap();
        assert_eq!(source.id, "x");
        assert_eq!(source.last_fetch, None);
    }
}
