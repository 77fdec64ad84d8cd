//! Wire types for the study listings API.
//!
//! Listings are kept as opaque JSON records. The poller only ever compares
//! whole listings by value and reads the `id` of the first record, so no
//! richer domain model is parsed out of the payload.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response body of `GET /studies/?current=1`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingsResponse {
    pub results: StudyListing,
}

/// Ordered sequence of opaque study records, compared by value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudyListing(pub Vec<Value>);

impl StudyListing {
    pub fn new(records: Vec<Value>) -> Self {
        StudyListing(records)
    }

    pub fn empty() -> Self {
        StudyListing(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Identifier of the first listed study, if it has one.
    pub fn first_study_id(&self) -> Option<String> {
        self.0.first().and_then(study_id)
    }

    /// Compact JSON rendering used for the activity log.
    pub fn to_log_string(&self) -> String {
        // Serializing a Vec<Value> cannot fail
        serde_json::to_string(&self.0).unwrap_or_default()
    }
}

/// Extract the `id` field of a study record. Numeric ids are rendered as strings.
pub fn study_id(record: &Value) -> Option<String> {
    match record.get("id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Body of the best-effort reservation `POST`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRequest {
    pub study_id: String,
    pub participant_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_listings_response_parses_results() {
        let body = json!({
            "results": [{"id": "A", "name": "Survey"}, {"id": "B"}],
            "meta": {"count": 2}
        });

        let response: ListingsResponse = serde_json::from_value(body).expect("should parse");
        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results.first_study_id(), Some("A".to_string()));
    }

    #[test]
    fn test_missing_results_field_rejected() {
        let result: Result<ListingsResponse, _> = serde_json::from_value(json!({"data": []}));
        assert!(result.is_err());
    }

    #[test]
    fn test_listings_compare_by_value() {
        let a = StudyListing::new(vec![json!({"id": "A", "reward": 100})]);
        let b = StudyListing::new(vec![json!({"reward": 100, "id": "A"})]);
        let c = StudyListing::new(vec![json!({"id": "A", "reward": 150})]);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, StudyListing::empty());
    }

    #[test]
    fn test_study_id_variants() {
        assert_eq!(study_id(&json!({"id": "S1"})), Some("S1".to_string()));
        assert_eq!(study_id(&json!({"id": 42})), Some("42".to_string()));
        assert_eq!(study_id(&json!({"id": ""})), None);
        assert_eq!(study_id(&json!({"id": null})), None);
        assert_eq!(study_id(&json!({"name": "no id"})), None);
        assert_eq!(StudyListing::empty().first_study_id(), None);
    }

    #[test]
    fn test_log_string_is_compact_json() {
        assert_eq!(StudyListing::empty().to_log_string(), "[]");
        assert_eq!(
            StudyListing::new(vec![json!({"id": "A"})]).to_log_string(),
            r#"[{"id":"A"}]"#
        );
    }

    #[test]
    fn test_reservation_request_field_names() {
        let request = ReservationRequest {
            study_id: "S1".to_string(),
            participant_id: "P1".to_string(),
        };
        let value = serde_json::to_value(&request).expect("should serialize");
        assert_eq!(value, json!({"study_id": "S1", "participant_id": "P1"}));
    }
}
