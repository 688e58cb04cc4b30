//! The uniform structured error payload.
//!
//! Every failed route renders `{"error": VendorError}`. Vendors that send
//! their own structured error keep their code and messages untouched; the
//! constructors below cover the cases where the platform has to supply the
//! text itself.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::messages::{self, Localized};

/// Classification carried in the `type` field of the error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Request rejected before any vendor call.
    ValidationError,
    /// Vendor answered with its own structured error.
    VendorError,
    /// Vendor answered without a structured body, or the platform failed.
    ServerError,
    /// Vendor reported failure while the task was being polled.
    TaskFailed,
    /// Attempt ceiling exhausted without a terminal vendor state.
    Timeout,
    /// The requested local record does not exist.
    NotFound,
}

/// Structured failure payload with a numeric code and localized messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("vendor error {err_code}: {message}")]
pub struct VendorError {
    pub err_code: i64,
    pub message: String,
    pub message_cn: String,
    pub message_en: String,
    pub message_ja: String,
    #[serde(rename = "type")]
    pub kind: ErrorType,
    /// HTTP status the API layer responds with. Not part of the body.
    #[serde(skip, default = "default_http_status")]
    pub http_status: u16,
}

fn default_http_status() -> u16 {
    500
}

impl VendorError {
    /// Build an error whose text comes from a [`Localized`] message.
    pub fn localized(err_code: i64, text: Localized, kind: ErrorType, http_status: u16) -> Self {
        Self {
            err_code,
            message: text.en.to_string(),
            message_cn: text.cn.to_string(),
            message_en: text.en.to_string(),
            message_ja: text.ja.to_string(),
            kind,
            http_status,
        }
    }

    /// Build an error carrying a vendor-supplied reason in every language slot.
    pub fn verbatim(err_code: i64, reason: &str, kind: ErrorType, http_status: u16) -> Self {
        Self {
            err_code,
            message: reason.to_string(),
            message_cn: reason.to_string(),
            message_en: reason.to_string(),
            message_ja: reason.to_string(),
            kind,
            http_status,
        }
    }

    /// Missing or malformed request parameters.
    pub fn validation(detail: &str) -> Self {
        let mut err = Self::localized(400, messages::MISSING_PARAMETERS, ErrorType::ValidationError, 400);
        if !detail.is_empty() {
            err.message = detail.to_string();
        }
        err
    }

    /// Non-2xx vendor response without a recognizable error body.
    ///
    /// The vendor's HTTP status becomes the code; the response is always 500.
    pub fn unstructured(vendor_status: u16, text: Localized) -> Self {
        Self::localized(i64::from(vendor_status), text, ErrorType::ServerError, 500)
    }

    /// Vendor reported failure while polling. The reason is kept verbatim when present.
    pub fn task_failed(err_code: i64, reason: Option<&str>, fallback: Localized) -> Self {
        match reason.map(str::trim).filter(|r| !r.is_empty()) {
            Some(reason) => Self::verbatim(err_code, reason, ErrorType::TaskFailed, 400),
            None => Self::localized(err_code, fallback, ErrorType::TaskFailed, 400),
        }
    }

    /// Attempt ceiling exhausted.
    pub fn timeout(text: Localized) -> Self {
        Self::localized(504, text, ErrorType::Timeout, 504)
    }

    /// A local record lookup came back empty.
    pub fn not_found(detail: &str) -> Self {
        let mut err = Self::localized(404, messages::NOT_FOUND, ErrorType::NotFound, 404);
        err.message = detail.to_string();
        err
    }

    /// Transient transport failures that outlived their retry budget.
    pub fn network(detail: &str) -> Self {
        let mut err = Self::localized(503, messages::NETWORK_FAILURE, ErrorType::ServerError, 502);
        err.message = format!("{}: {detail}", messages::NETWORK_FAILURE.en);
        err
    }

    /// Recognize a structured error in a vendor response body.
    ///
    /// Accepts either `{"error": {...}}` or a flat object, with the code under
    /// `err_code`, `errCode` or `code` (number or numeric string) and messages
    /// under `message`/`msg` plus optional `message_cn`/`messageCn` style
    /// translations. Returns `None` when no code can be found.
    pub fn from_body(http_status: u16, body: &Value) -> Option<Self> {
        let obj = match body.get("error") {
            Some(inner @ Value::Object(_)) => inner,
            _ => body,
        };
        let obj = obj.as_object()?;

        let err_code = ["err_code", "errCode", "code"]
            .iter()
            .filter_map(|k| obj.get(*k))
            .find_map(code_value)?;

        let text = |keys: &[&str]| {
            keys.iter()
                .filter_map(|k| obj.get(*k))
                .find_map(Value::as_str)
                .map(str::to_string)
        };
        let message = text(&["message", "msg", "err_msg", "detail"]).unwrap_or_default();
        let fallback = message.clone();

        Some(Self {
            err_code,
            message_cn: text(&["message_cn", "messageCn"]).unwrap_or_else(|| fallback.clone()),
            message_en: text(&["message_en", "messageEn"]).unwrap_or_else(|| fallback.clone()),
            message_ja: text(&["message_ja", "messageJa"]).unwrap_or(fallback),
            message,
            kind: ErrorType::VendorError,
            http_status,
        })
    }
}

fn code_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn from_body_reads_nested_error_object() {
        let body = json!({
            "error": {
                "errCode": 40012,
                "message": "quota exceeded",
                "messageCn": "额度不足",
            }
        });
        let err = VendorError::from_body(402, &body).expect("structured");
        assert_eq!(err.err_code, 40012);
        assert_eq!(err.message, "quota exceeded");
        assert_eq!(err.message_cn, "额度不足");
        assert_eq!(err.message_en, "quota exceeded");
        assert_eq!(err.http_status, 402);
        assert_eq!(err.kind, ErrorType::VendorError);
    }

    #[test]
    fn from_body_accepts_flat_envelope_with_string_code() {
        let body = json!({"code": "10001", "msg": "invalid token"});
        let err = VendorError::from_body(401, &body).expect("structured");
        assert_eq!(err.err_code, 10001);
        assert_eq!(err.message_ja, "invalid token");
    }

    #[test]
    fn from_body_without_code_is_unstructured() {
        assert!(VendorError::from_body(500, &json!({"detail": "boom"})).is_none());
        assert!(VendorError::from_body(500, &json!("plain text")).is_none());
    }

    #[test]
    fn task_failed_keeps_vendor_reason_verbatim() {
        let fallback = messages::task_failed(crate::job::JobKind::AudioSynthesis);
        let err = VendorError::task_failed(4, Some("too short"), fallback);
        assert_eq!(err.message, "too short");
        assert_eq!(err.message_cn, "too short");
        assert_eq!(err.http_status, 400);

        let err = VendorError::task_failed(4, Some("  "), fallback);
        assert_eq!(err.message, fallback.en);
    }

    #[test]
    fn serialized_body_uses_type_field_and_hides_status() {
        let err = VendorError::timeout(messages::timed_out(crate::job::JobKind::VideoGeneration));
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["type"], "timeout");
        assert_eq!(value["err_code"], 504);
        assert!(value.get("http_status").is_none());
    }
}
