//! Response records and the ingestion boundary.
//!
//! Upstream services hand over a service-type tag plus an open view-data
//! bag. Only four tags matter to the panel, and only one of them carries
//! data the panel reads, so ingestion narrows each raw response into a
//! closed [`ResponseRecord`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

pub const REQUEST_STATUS_TAG: &str = "bd_request_status";
pub const REQUEST_PROMPT_TAG: &str = "bd_request_prompt";
pub const LINK_TO_SEARCH_TAG: &str = "bd_link_to_search";
pub const NOT_AVAILABLE_TAG: &str = "bd_not_available";

pub const RECOGNIZED_TAGS: [&str; 4] = [
    REQUEST_STATUS_TAG,
    REQUEST_PROMPT_TAG,
    LINK_TO_SEARCH_TAG,
    NOT_AVAILABLE_TAG,
];

const STATUS_FIELD: &str = "status";
const ERROR_MESSAGE_FIELDS: [&str; 2] = ["error_user_message", "errorUserMessage"];

/// Outcome of a request submission, as reported by `bd_request_status`.
///
/// Tokens are compared for equality only; there is no ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    InProgress,
    Successful,
    Error,
    ValidationError,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::InProgress,
        Status::Successful,
        Status::Error,
        Status::ValidationError,
    ];

    /// Wire token written by the upstream adaptor.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Successful => "successful",
            Self::Error => "error",
            Self::ValidationError => "validation_error",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" | "InProgress" => Ok(Self::InProgress),
            "successful" | "Successful" => Ok(Self::Successful),
            "error" | "Error" => Ok(Self::Error),
            "validation_error" | "ValidationError" => Ok(Self::ValidationError),
            _ => Err(format!("unrecognized request status: {s}")),
        }
    }
}

/// The fields of a `bd_request_status` response the panel reads.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusView {
    /// `None` when the status token is missing or not one of [`Status::ALL`].
    pub status: Option<Status>,
    pub error_user_message: Option<String>,
    /// The raw token when it did not parse; kept for diagnostics only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unrecognized_status: Option<String>,
}

impl StatusView {
    pub fn new(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.error_user_message = Some(message.into());
        self
    }

    fn from_view_data(view_data: &Map<String, Value>) -> Self {
        let (status, unrecognized_status) = match first_field(view_data, &[STATUS_FIELD]) {
            None => (None, None),
            Some((_, Value::String(token))) => match token.parse::<Status>() {
                Ok(status) => (Some(status), None),
                Err(_) => {
                    warn!(
                        token = %token,
                        "unrecognized request status; no status branch will match"
                    );
                    (None, Some(token.clone()))
                }
            },
            Some((_, other)) => {
                warn!(
                    found = json_type_name(other),
                    value = %other,
                    "non-string request status; no status branch will match"
                );
                (None, Some(other.to_string()))
            }
        };

        let error_user_message = match first_field(view_data, &ERROR_MESSAGE_FIELDS) {
            None => None,
            Some((_, Value::String(message))) => Some(message.clone()),
            Some((field, other)) => {
                warn!(
                    field,
                    found = json_type_name(other),
                    "non-string error message ignored"
                );
                None
            }
        };

        Self {
            status,
            error_user_message,
            unrecognized_status,
        }
    }
}

/// A response narrowed to what the panel needs.
///
/// Presence alone is the signal for the prompt, link, and not-available
/// tags. Tags the panel does not recognize are kept as [`Self::Other`] so
/// the snapshot stays complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponseRecord {
    RequestStatus(StatusView),
    RequestPrompt,
    LinkToSearch,
    NotAvailable,
    Other {
        #[serde(rename = "serviceType")]
        service_type: String,
    },
}

impl ResponseRecord {
    pub fn status(status: Status) -> Self {
        Self::RequestStatus(StatusView::new(status))
    }

    pub fn status_with_message(status: Status, message: impl Into<String>) -> Self {
        Self::RequestStatus(StatusView::new(status).with_message(message))
    }

    pub fn service_type(&self) -> &str {
        match self {
            Self::RequestStatus(_) => REQUEST_STATUS_TAG,
            Self::RequestPrompt => REQUEST_PROMPT_TAG,
            Self::LinkToSearch => LINK_TO_SEARCH_TAG,
            Self::NotAvailable => NOT_AVAILABLE_TAG,
            Self::Other { service_type } => service_type,
        }
    }

    pub fn status_view(&self) -> Option<&StatusView> {
        match self {
            Self::RequestStatus(view) => Some(view),
            _ => None,
        }
    }
}

/// One upstream response as the service layer produces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawResponse {
    pub service_type_value_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub view_data: Map<String, Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

impl RawResponse {
    pub fn new(service_type: impl Into<String>) -> Self {
        Self {
            service_type_value_name: service_type.into(),
            view_data: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.view_data.insert(key.into(), value.into());
        self
    }

    /// Adapt this response into a closed record.
    ///
    /// Never fails: an unknown or non-string status ingests as a status
    /// record with no known status, and an unusable message as no message.
    pub fn ingest(&self) -> ResponseRecord {
        let tag = self.service_type_value_name.as_str();
        let record = match tag {
            REQUEST_STATUS_TAG => {
                ResponseRecord::RequestStatus(StatusView::from_view_data(&self.view_data))
            }
            REQUEST_PROMPT_TAG => ResponseRecord::RequestPrompt,
            LINK_TO_SEARCH_TAG => ResponseRecord::LinkToSearch,
            NOT_AVAILABLE_TAG => ResponseRecord::NotAvailable,
            other => ResponseRecord::Other {
                service_type: other.to_string(),
            },
        };
        debug!(service_type = tag, "ingested response record");
        record
    }
}

/// Ingest a whole response list, preserving order.
pub fn ingest_all(raw: &[RawResponse]) -> Vec<ResponseRecord> {
    raw.iter().map(RawResponse::ingest).collect()
}

/// First of `keys` present with a non-null value.
fn first_field<'v>(
    view_data: &'v Map<String, Value>,
    keys: &[&'static str],
) -> Option<(&'static str, &'v Value)> {
    keys.iter().find_map(|&key| match view_data.get(key) {
        None | Some(Value::Null) => None,
        Some(value) => Some((key, value)),
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_parse_accepts_wire_and_camel_tokens() {
        for status in Status::ALL {
            assert_eq!(status.as_str().parse::<Status>(), Ok(status));
        }
        assert_eq!("InProgress".parse::<Status>(), Ok(Status::InProgress));
        assert_eq!(
            "ValidationError".parse::<Status>(),
            Ok(Status::ValidationError)
        );
        assert!("cancelled".parse::<Status>().is_err());
    }

    #[test]
    fn status_response_ingests_status_and_message() {
        let raw = RawResponse::new(REQUEST_STATUS_TAG)
            .with_field("status", "validation_error")
            .with_field("error_user_message", "Invalid barcode");
        let record = raw.ingest();
        assert_eq!(
            record,
            ResponseRecord::status_with_message(Status::ValidationError, "Invalid barcode")
        );
    }

    #[test]
    fn camel_case_message_key_is_accepted() {
        let raw = RawResponse::new(REQUEST_STATUS_TAG)
            .with_field("status", "error")
            .with_field("errorUserMessage", "Service unavailable");
        let view = raw.ingest().status_view().cloned();
        assert_eq!(
            view.and_then(|v| v.error_user_message).as_deref(),
            Some("Service unavailable")
        );
    }

    #[test]
    fn unrecognized_status_degrades_to_no_status() {
        let raw = RawResponse::new(REQUEST_STATUS_TAG).with_field("status", "cancelled");
        let record = raw.ingest();
        let view = record.status_view().expect("record is still a status record");
        assert_eq!(view.status, None);
        assert_eq!(view.unrecognized_status.as_deref(), Some("cancelled"));
    }

    #[test]
    fn non_string_status_degrades_to_no_status() {
        for value in [json!(3), json!(true), json!({"code": 1})] {
            let raw = RawResponse::new(REQUEST_STATUS_TAG).with_field("status", value.clone());
            let view = raw
                .ingest()
                .status_view()
                .cloned()
                .expect("record is still a status record");
            assert_eq!(view.status, None);
            assert_eq!(view.unrecognized_status, Some(value.to_string()));
        }
    }

    #[test]
    fn non_string_message_counts_as_absent() {
        let raw = RawResponse::new(REQUEST_STATUS_TAG)
            .with_field("status", "error")
            .with_field("error_user_message", json!(["Service unavailable"]));
        assert_eq!(raw.ingest(), ResponseRecord::status(Status::Error));
    }

    #[test]
    fn null_view_data_parses_as_empty() {
        let raw: Vec<RawResponse> = serde_json::from_value(json!([
            { "serviceTypeValueName": REQUEST_PROMPT_TAG, "viewData": null },
            { "serviceTypeValueName": REQUEST_STATUS_TAG, "viewData": null },
        ]))
        .expect("null view data should parse");
        assert!(raw.iter().all(|r| r.view_data.is_empty()));
        assert_eq!(
            ingest_all(&raw),
            vec![
                ResponseRecord::RequestPrompt,
                ResponseRecord::RequestStatus(StatusView::default()),
            ]
        );
    }

    #[test]
    fn null_message_counts_as_absent() {
        let raw = RawResponse::new(REQUEST_STATUS_TAG)
            .with_field("status", "error")
            .with_field("error_user_message", Value::Null);
        let record = raw.ingest();
        assert_eq!(record, ResponseRecord::status(Status::Error));
    }

    #[test]
    fn marker_and_unknown_tags_ingest_by_presence() {
        let raw = vec![
            RawResponse::new(REQUEST_PROMPT_TAG).with_field("url", "https://example.org/form"),
            RawResponse::new(LINK_TO_SEARCH_TAG),
            RawResponse::new(NOT_AVAILABLE_TAG),
            RawResponse::new("holding"),
        ];
        let records = ingest_all(&raw);
        assert_eq!(
            records,
            vec![
                ResponseRecord::RequestPrompt,
                ResponseRecord::LinkToSearch,
                ResponseRecord::NotAvailable,
                ResponseRecord::Other {
                    service_type: "holding".to_string()
                },
            ]
        );
        let tags: Vec<&str> = records.iter().map(ResponseRecord::service_type).collect();
        assert_eq!(
            tags,
            vec![
                REQUEST_PROMPT_TAG,
                LINK_TO_SEARCH_TAG,
                NOT_AVAILABLE_TAG,
                "holding"
            ]
        );
    }

    #[test]
    fn record_serializes_with_kind_tag() {
        let value = serde_json::to_value(ResponseRecord::status_with_message(
            Status::Error,
            "Service unavailable",
        ))
        .expect("serialization should succeed");
        assert_eq!(value["kind"], "request_status");
        assert_eq!(value["status"], "error");
        assert_eq!(value["errorUserMessage"], "Service unavailable");
        assert!(value.get("unrecognizedStatus").is_none());
    }
}
