//! Response envelopes and decoding.

use serde::{Deserialize, Serialize};

use super::article::null_as_default;
use super::{Article, NewsSource};
use crate::api::NewsDataError;

/// Status value of a successful response.
pub const STATUS_SUCCESS: &str = "success";

/// One decoded page of an article endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsPage {
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(rename = "totalResults", deserialize_with = "null_as_default")]
    pub total_results: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub results: Vec<Article>,
    /// Continuation token. Missing, `null` and `""` all decode to `None`.
    #[serde(rename = "nextPage", deserialize_with = "next_page_token")]
    pub next_page: Option<String>,
}

/// The sources listing. It is never paginated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesPage {
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(rename = "totalResults", deserialize_with = "null_as_default")]
    pub total_results: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub results: Vec<NewsSource>,
}

/// Error envelope: `{"status": "error", "results": {"message": .., "code": ..}}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ErrorBody {
    pub status: String,
    pub results: ErrorDetail,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ErrorDetail {
    pub message: String,
    #[serde(deserialize_with = "code_as_string")]
    pub code: Option<String>,
}

/// Error codes arrive as strings or bare numbers.
fn code_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

impl ErrorBody {
    /// Try to read an error envelope from a response body.
    pub fn parse(body: &[u8]) -> Option<Self> {
        serde_json::from_slice::<Self>(body)
            .ok()
            .filter(|b| !b.results.message.is_empty())
    }
}

fn next_page_token<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let token: Option<String> = Option::deserialize(deserializer)?;
    Ok(token.filter(|t| !t.is_empty()))
}

#[derive(Deserialize)]
struct StatusOnly {
    #[serde(default, deserialize_with = "null_as_default")]
    status: String,
}

/// A 2xx body whose status is not `success` is still an API failure; a body
/// without any status is malformed.
/// Checked before the full decode since error bodies reuse `results`.
fn check_status(body: &[u8]) -> Result<(), NewsDataError> {
    let StatusOnly { status } = serde_json::from_slice(body)?;
    if status == STATUS_SUCCESS {
        return Ok(());
    }
    if status.is_empty() {
        return Err(NewsDataError::Decode(
            "response has no status field".to_string(),
        ));
    }
    let (message, code) = match ErrorBody::parse(body) {
        Some(err) => (err.results.message, err.results.code),
        None => (format!("unexpected response status: {:?}", status), None),
    };
    Err(NewsDataError::Api {
        status: 200,
        message,
        code,
    })
}

/// Decode one article page.
pub fn decode_news_page(body: &[u8]) -> Result<NewsPage, NewsDataError> {
    check_status(body)?;
    Ok(serde_json::from_slice(body)?)
}

/// Decode the sources listing.
pub fn decode_sources(body: &[u8]) -> Result<SourcesPage, NewsDataError> {
    check_status(body)?;
    Ok(serde_json::from_slice(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_page() {
        let body = br#"{
            "status": "success",
            "totalResults": 2,
            "results": [{"article_id": "1"}, {"article_id": "2"}],
            "nextPage": "tok-2"
        }"#;
        let page = decode_news_page(body).unwrap();
        assert_eq!(page.total_results, 2);
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[1].article_id, "2");
        assert_eq!(page.next_page.as_deref(), Some("tok-2"));
    }

    #[test]
    fn test_empty_and_missing_tokens() {
        for body in [
            r#"{"status":"success","totalResults":0,"results":[],"nextPage":""}"#,
            r#"{"status":"success","totalResults":0,"results":[],"nextPage":null}"#,
            r#"{"status":"success","totalResults":0,"results":[]}"#,
        ] {
            let page = decode_news_page(body.as_bytes()).unwrap();
            assert_eq!(page.next_page, None, "{body}");
        }
    }

    #[test]
    fn test_malformed_json() {
        let err = decode_news_page(b"<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, NewsDataError::Decode(_)));

        let err = decode_news_page(br#"{"status":"success","results":{}}"#).unwrap_err();
        assert!(matches!(err, NewsDataError::Decode(_)));
    }

    #[test]
    fn test_missing_status_is_decode_error() {
        for body in [
            r#"{"totalResults":3,"results":[],"nextPage":""}"#,
            r#"{"status":"","totalResults":0,"results":[]}"#,
            r#"{"status":null,"results":[]}"#,
        ] {
            let err = decode_news_page(body.as_bytes()).unwrap_err();
            assert!(matches!(err, NewsDataError::Decode(_)), "{body}: {err:?}");
        }
        let err = decode_sources(br#"{"results":[]}"#).unwrap_err();
        assert!(matches!(err, NewsDataError::Decode(_)));
    }

    #[test]
    fn test_error_status_in_success_response() {
        let body = br#"{"status":"error","results":{"message":"quota exceeded","code":"RateLimitExceeded"}}"#;
        let err = decode_news_page(body).unwrap_err();
        match err {
            NewsDataError::Api { message, code, .. } => {
                assert_eq!(message, "quota exceeded");
                assert_eq!(code.as_deref(), Some("RateLimitExceeded"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_decode_sources() {
        let body = br#"{"status":"success","totalResults":1,"results":[{"id":"bbc","name":"BBC"}]}"#;
        let page = decode_sources(body).unwrap();
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].name, "BBC");
    }

    #[test]
    fn test_error_body_parse() {
        let body = br#"{"status":"error","results":{"message":"rate limited","code":"429"}}"#;
        let parsed = ErrorBody::parse(body).unwrap();
        assert_eq!(parsed.results.message, "rate limited");
        assert!(ErrorBody::parse(b"not json").is_none());

        let numeric = br#"{"status":"error","results":{"message":"nope","code":401}}"#;
        let parsed = ErrorBody::parse(numeric).unwrap();
        assert_eq!(parsed.results.code.as_deref(), Some("401"));
    }
}
