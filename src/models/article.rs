//! News article records as returned by the article endpoints.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Overall sentiment label attached to an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Parse a wire label. Unknown labels yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "positive" => Some(Sentiment::Positive),
            "negative" => Some(Sentiment::Negative),
            "neutral" => Some(Sentiment::Neutral),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-label sentiment scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentStats {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

/// A single news article.
///
/// Every wire field is optional. Missing or `null` values decode to the
/// field's empty value. Plan-restricted fields (`ai_tag`, `ai_region`,
/// `ai_org`, `sentiment_stats`) carry a string notice instead of data on
/// lower plans; that notice decodes to the empty value as well.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Article {
    #[serde(alias = "Article_id", deserialize_with = "null_as_default")]
    pub article_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub link: String,
    #[serde(deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub creator: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub video_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(rename = "pubDate", with = "wire_datetime")]
    pub pub_date: Option<NaiveDateTime>,
    #[serde(rename = "pubDateTZ", deserialize_with = "null_as_default")]
    pub pub_date_tz: String,
    #[serde(deserialize_with = "null_as_default")]
    pub image_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub source_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub source_priority: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub source_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub source_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub source_icon: String,
    #[serde(deserialize_with = "null_as_default")]
    pub language: String,
    #[serde(deserialize_with = "null_as_default")]
    pub country: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub category: Vec<String>,
    #[serde(deserialize_with = "restricted_list")]
    pub ai_tag: Vec<String>,
    #[serde(deserialize_with = "known_sentiment")]
    pub sentiment: Option<Sentiment>,
    #[serde(deserialize_with = "restricted_stats")]
    pub sentiment_stats: SentimentStats,
    #[serde(deserialize_with = "restricted_list")]
    pub ai_region: Vec<String>,
    #[serde(deserialize_with = "restricted_list")]
    pub ai_org: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub coin: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub duplicate: bool,
}

impl Article {
    /// Source display name, falling back to the source id.
    pub fn source_label(&self) -> &str {
        if self.source_name.is_empty() {
            &self.source_id
        } else {
            &self.source_name
        }
    }
}

/// Treat `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A list, or anything else (restriction notice, `null`) as empty.
fn restricted_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect()),
        _ => Ok(Vec::new()),
    }
}

fn restricted_stats<'de, D>(deserializer: D) -> Result<SentimentStats, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => {
            serde_json::from_value(value).map_err(serde::de::Error::custom)
        }
        _ => Ok(SentimentStats::default()),
    }
}

fn known_sentiment<'de, D>(deserializer: D) -> Result<Option<Sentiment>, D::Error>
where
    D: Deserializer<'de>,
{
    let label: Option<String> = Option::deserialize(deserializer)?;
    Ok(label.as_deref().and_then(Sentiment::from_label))
}

/// `YYYY-MM-DD HH:MM:SS` timestamps; `null` and `""` are absent.
pub(crate) mod wire_datetime {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => NaiveDateTime::parse_from_str(s, FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
