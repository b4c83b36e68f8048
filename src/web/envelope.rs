//! JSON envelope shared by every API response.

use serde::{Deserialize, Serialize};

use crate::db::PageSummary;

/// `{success, data?, message?, pagination?}` with absent fields omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PageSummary>,
}

impl<T> Envelope<T> {
    #[must_use]
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            pagination: None,
        }
    }

    #[must_use]
    pub fn page(data: T, pagination: PageSummary) -> Self {
        Self {
            pagination: Some(pagination),
            ..Self::data(data)
        }
    }
}

impl Envelope<()> {
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            pagination: None,
        }
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            ..Self::message(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_envelope_omits_data() {
        let json = serde_json::to_value(Envelope::message("done")).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "message": "done"}));
    }

    #[test]
    fn test_page_envelope_has_pagination() {
        let json = serde_json::to_value(Envelope::page(vec![1, 2], PageSummary::new(2, 12))).unwrap();
        assert_eq!(json["pagination"]["totalPages"], 2);
        assert_eq!(json["pagination"]["itemsPerPage"], 10);
        assert!(json.get("message").is_none());
    }

    #[derive(Debug, Deserialize)]
    struct Row {
        id: i64,
    }

    fn decode<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> Envelope<T> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_decode_payload_without_default() {
        let ok: Envelope<Row> = decode(serde_json::json!({"success": true, "data": {"id": 3}}));
        assert_eq!(ok.data.map(|row| row.id), Some(3));

        let failed: Envelope<Row> =
            decode(serde_json::json!({"success": false, "message": "Post not found."}));
        assert!(failed.data.is_none());
        assert_eq!(failed.message.as_deref(), Some("Post not found."));
    }
}
