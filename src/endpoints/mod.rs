//! Endpoint resolution
//!
//! Maps logical operation names to webhook URLs under `api.webhookBaseUrl`
//! and builds the header set every request carries. Resolution is a pure
//! function of the document and the operation; nothing is cached.

use crate::config::document::ConfigDocument;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Header every resolved request carries unless the document overrides it
pub const CONTENT_TYPE: (&str, &str) = ("Content-Type", "application/json");

/// Every logical operation the portal can call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
    Login,
    ListVacantHouses,
    PaymentHistory,
    SubmitComplaint,
    ListComplaints,
    Announcements,
    Broadcasts,
    CreateBroadcast,
    ActiveShops,
    CustomerConversations,
    InquiryResponses,
    MarkResponseRead,
    Chat,
    SubmitOpinion,
    Notices,
    PaymentInitiate,
    PaymentStatus,
    RecordPayment,
}

impl Operation {
    pub const ALL: [Self; 18] = [
        Self::Login,
        Self::ListVacantHouses,
        Self::PaymentHistory,
        Self::SubmitComplaint,
        Self::ListComplaints,
        Self::Announcements,
        Self::Broadcasts,
        Self::CreateBroadcast,
        Self::ActiveShops,
        Self::CustomerConversations,
        Self::InquiryResponses,
        Self::MarkResponseRead,
        Self::Chat,
        Self::SubmitOpinion,
        Self::Notices,
        Self::PaymentInitiate,
        Self::PaymentStatus,
        Self::RecordPayment,
    ];

    /// Stable logical name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::ListVacantHouses => "list-vacant-houses",
            Self::PaymentHistory => "payment-history",
            Self::SubmitComplaint => "submit-complaint",
            Self::ListComplaints => "list-complaints",
            Self::Announcements => "announcements",
            Self::Broadcasts => "broadcasts",
            Self::CreateBroadcast => "create-broadcast",
            Self::ActiveShops => "active-shops",
            Self::CustomerConversations => "customer-conversations",
            Self::InquiryResponses => "inquiry-responses",
            Self::MarkResponseRead => "mark-response-read",
            Self::Chat => "chat",
            Self::SubmitOpinion => "submit-opinion",
            Self::Notices => "notices",
            Self::PaymentInitiate => "payment-initiate",
            Self::PaymentStatus => "payment-status",
            Self::RecordPayment => "record-payment",
        }
    }

    /// Path segment appended to the webhook base
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Login => "nhc-login",
            Self::ListVacantHouses => "nhc-vacant-houses",
            Self::PaymentHistory => "nhc-payment-history",
            Self::SubmitComplaint => "nhc-submit-complaint",
            Self::ListComplaints => "nhc-complaints",
            Self::Announcements => "nhc-announcements",
            Self::Broadcasts => "nhc-broadcasts",
            Self::CreateBroadcast => "nhc-create-broadcast",
            Self::ActiveShops => "nhc-active-shops",
            Self::CustomerConversations => "nhc-customer-conversations",
            Self::InquiryResponses => "nhc-get-inquiry-responses",
            Self::MarkResponseRead => "nhc-mark-response-read",
            Self::Chat => "nhc-chat",
            Self::SubmitOpinion => "nhc-submit-opinion",
            Self::Notices => "nhc-notices",
            Self::PaymentInitiate => "nhc-stk-push",
            Self::PaymentStatus => "nhc-payment-status",
            Self::RecordPayment => "nhc-record-payment",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for a name outside the operation set
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown operation '{0}'. Known operations: {known}", known = known_operations())]
pub struct UnknownOperation(pub String);

fn known_operations() -> String {
    Operation::ALL.map(Operation::name).join(", ")
}

impl FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| UnknownOperation(s.to_owned()))
    }
}

/// URL for `operation`, or `None` when no base URL is configured
#[must_use]
pub fn resolve_operation(doc: Option<&ConfigDocument>, operation: Operation) -> Option<String> {
    let base = doc?.webhook_base_url()?;
    Some(format!("{base}/{}", operation.suffix()))
}

/// URL for a free-form operation name
///
/// Returns `None` for unknown names, a missing document or a missing base URL.
#[must_use]
pub fn resolve(doc: Option<&ConfigDocument>, name: &str) -> Option<String> {
    let resolved = name
        .parse::<Operation>()
        .ok()
        .and_then(|operation| resolve_operation(doc, operation));
    if resolved.is_none() {
        debug!(operation = name, "Operation is unresolved");
    }
    resolved
}

/// Request headers: the default content type, overlaid with `api.headers`
#[must_use]
pub fn headers(doc: Option<&ConfigDocument>) -> BTreeMap<String, String> {
    let mut merged = BTreeMap::from([(CONTENT_TYPE.0.to_owned(), CONTENT_TYPE.1.to_owned())]);
    if let Some(extra) = doc
        .and_then(|doc| doc.api.as_ref())
        .and_then(|api| api.headers.as_ref())
    {
        merged.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> ConfigDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn no_document_resolves_nothing() {
        for op in Operation::ALL {
            assert_eq!(resolve_operation(None, op), None);
        }
        assert_eq!(resolve(None, "chat"), None);
    }

    #[test]
    fn missing_base_url_resolves_nothing() {
        let document = doc(json!({"api": {"headers": {"X-Key": "k"}}}));
        for op in Operation::ALL {
            assert_eq!(resolve(Some(&document), op.name()), None);
        }
    }

    #[test]
    fn chat_resolves_under_base() {
        let document = doc(json!({"api": {"webhookBaseUrl": "https://x"}}));
        assert_eq!(
            resolve(Some(&document), "chat").as_deref(),
            Some("https://x/nhc-chat")
        );
        assert_eq!(
            resolve_operation(Some(&document), Operation::ListComplaints).as_deref(),
            Some("https://x/nhc-complaints")
        );
    }

    #[test]
    fn unknown_names_are_unresolved() {
        let document = doc(json!({"api": {"webhookBaseUrl": "https://x"}}));
        assert_eq!(resolve(Some(&document), "launch-rockets"), None);
        assert_eq!(resolve(Some(&document), "Chat"), None);
        assert_eq!(resolve(Some(&document), ""), None);
    }

    #[test]
    fn resolution_is_repeatable() {
        let document = doc(json!({"api": {"webhookBaseUrl": "https://x"}}));
        let first = resolve(Some(&document), "notices");
        assert_eq!(resolve(Some(&document), "notices"), first);
    }

    #[test]
    fn names_and_suffixes_are_unique() {
        let mut names: Vec<_> = Operation::ALL.iter().map(|op| op.name()).collect();
        let mut suffixes: Vec<_> = Operation::ALL.iter().map(|op| op.suffix()).collect();
        names.sort_unstable();
        names.dedup();
        suffixes.sort_unstable();
        suffixes.dedup();
        assert_eq!(names.len(), Operation::ALL.len());
        assert_eq!(suffixes.len(), Operation::ALL.len());
        for op in Operation::ALL {
            assert_eq!(op.name().parse::<Operation>(), Ok(op));
        }
    }

    #[test]
    fn unknown_operation_lists_known_names() {
        let err = "teleport".parse::<Operation>().unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Unknown operation 'teleport'. Known operations: login, "));
        assert!(message.ends_with("record-payment"));

        let as_error: &dyn std::error::Error = &err;
        assert!(as_error.source().is_none());
    }

    #[test]
    fn headers_always_carry_content_type() {
        assert_eq!(
            headers(None),
            BTreeMap::from([("Content-Type".to_owned(), "application/json".to_owned())])
        );
        let merged = headers(Some(&doc(json!({"api": {"headers": {"X-Api-Key": "secret"}}}))));
        assert_eq!(merged.get("Content-Type").map(String::as_str), Some("application/json"));
        assert_eq!(merged.get("X-Api-Key").map(String::as_str), Some("secret"));
    }

    #[test]
    fn document_headers_override_default() {
        let merged = headers(Some(&doc(json!({
            "api": {"headers": {"Content-Type": "text/plain"}}
        }))));
        assert_eq!(merged.len(), 1);
        assert_eq!(merged.get("Content-Type").map(String::as_str), Some("text/plain"));
    }
}
