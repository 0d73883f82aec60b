//! Instant On API payloads

use serde::{Deserialize, Serialize};

/// Response of `/sites/{site_id}/clientSummary`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientSummary {
    #[serde(default)]
    pub elements: Vec<ClientSummaryEntry>,
}

/// A connected client as reported by the access points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSummaryEntry {
    pub id: String, // MAC-like token
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    pub expires_in: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_client_summary() {
        let body = r#"{
            "elements": [
                {"id": "aa:bb", "name": "Phone", "ipAddress": "192.168.1.20"},
                {"id": "cc:dd", "name": "Laptop"}
            ],
            "total": 2
        }"#;

        let summary: ClientSummary = serde_json::from_str(body).unwrap();
        assert_eq!(summary.elements.len(), 2);
        assert_eq!(summary.elements[0].id, "aa:bb");
        assert_eq!(summary.elements[0].name, "Phone");
    }

    #[test]
    fn test_missing_elements_is_empty() {
        let summary: ClientSummary = serde_json::from_str("{}").unwrap();
        assert!(summary.elements.is_empty());
    }

    #[test]
    fn test_entry_without_name_rejected() {
        let result: Result<ClientSummary, _> =
            serde_json::from_str(r#"{"elements":[{"id":"aa:bb"}]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_token_expiry_optional() {
        let token: TokenResponse = serde_json::from_str(r#"{"access_token":"abc"}"#).unwrap();
        assert_eq!(token.access_token, "abc");
        assert!(token.expires_in.is_none());
    }
}
