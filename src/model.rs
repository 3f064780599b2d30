// ABOUTME: Serde data models for documents and Wiki.js GraphQL responses
// ABOUTME: Tolerant parsing with optional fields and flexible page ids

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A note ready to be published, derived fresh from the active file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    pub path: String,
    pub content: String,
    pub tags: Vec<String>,
}

/// Raw frontmatter `tags` field: either `tags: draft` or `tags: [a, b]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    Many(Vec<Option<TagItem>>),
    One(TagItem),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagItem {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl TagItem {
    fn into_string(self) -> String {
        match self {
            TagItem::Text(s) => s,
            TagItem::Integer(n) => n.to_string(),
            TagItem::Float(x) => x.to_string(),
            TagItem::Boolean(b) => b.to_string(),
        }
    }
}

impl TagValue {
    /// Scalars become a one-element sequence; blank list entries are dropped.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            TagValue::Many(items) => items
                .into_iter()
                .flatten()
                .map(TagItem::into_string)
                .collect(),
            TagValue::One(item) => vec![item.into_string()],
        }
    }
}

pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    tags.iter().map(|tag| tag.trim().to_string()).collect()
}


/// Top-level GraphQL response shape.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    #[serde(default)]
    pub message: String,
}

/// Status block returned by every Wiki.js page mutation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseResult {
    #[serde(default)]
    pub succeeded: Option<bool>,
    #[serde(default)]
    pub error_code: Option<i64>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ResponseResult {
    /// `false` and absent (or null) both count as failure.
    pub fn is_success(&self) -> bool {
        self.succeeded.unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemotePage {
    #[serde(deserialize_with = "page_id")]
    pub id: i64,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    #[serde(deserialize_with = "page_id")]
    pub id: i64,
}

// Wiki.js returns search result ids as strings and page ids as integers.
pub(crate) fn page_id<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(n) => Ok(n),
        RawId::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_with_errors() {
        let json = r#"{"data": null, "errors": [{"message": "first"}, {"message": "second"}]}"#;
        let env: Envelope = serde_json::from_str(json).unwrap();
        assert!(env.data.is_none());
        assert_eq!(env.errors.unwrap()[0].message, "first");
    }

    #[test]
    fn test_envelope_minimal() {
        let env: Envelope = serde_json::from_str("{}").unwrap();
        assert!(env.data.is_none());
        assert!(env.errors.is_none());
    }

    #[test]
    fn test_response_result_defaults() {
        let rr: ResponseResult = serde_json::from_str(r#"{"errorCode": 6002}"#).unwrap();
        assert!(!rr.is_success());
        assert_eq!(rr.error_code, Some(6002));
        assert!(rr.message.is_none());
    }

    #[test]
    fn test_response_result_null_succeeded_keeps_message() {
        let rr: ResponseResult =
            serde_json::from_str(r#"{"succeeded": null, "message": "Page is locked"}"#).unwrap();
        assert!(!rr.is_success());
        assert_eq!(rr.message.as_deref(), Some("Page is locked"));
    }

    #[test]
    fn test_remote_page_deserialize() {
        let json = r#"{"id": 7, "path": "notes/Intro", "title": "Intro", "extra": true}"#;
        let page: RemotePage = serde_json::from_str(json).unwrap();
        assert_eq!(page.id, 7);
        assert_eq!(page.title, "Intro");
    }

    #[test]
    fn test_search_hit_accepts_string_id() {
        let hit: SearchHit = serde_json::from_str(r#"{"id": "42"}"#).unwrap();
        assert_eq!(hit.id, 42);
    }

    #[test]
    fn test_search_hit_rejects_non_numeric_id() {
        assert!(serde_json::from_str::<SearchHit>(r#"{"id": "abc"}"#).is_err());
    }
}
