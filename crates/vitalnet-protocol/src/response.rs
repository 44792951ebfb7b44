use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// Field names used in parsed responses.
pub mod keys {
    // Authorization
    pub const RETURNED_ACI: &str = "Returned ACI";
    pub const AUTH_SOURCE_CODE: &str = "Authorization Source Code";
    pub const RESPONSE_CODE: &str = "Response Code";
    pub const APPROVAL_CODE: &str = "Approval Code";
    pub const AUTH_RESPONSE_TEXT: &str = "Auth Response Text";
    pub const AVS_RESULT_CODE: &str = "AVS Result Code";
    pub const AVS_RESULT_TEXT: &str = "AVS Result Text";
    pub const RETRIEVAL_REFERENCE_NUMBER: &str = "Retrieval Reference Number";
    pub const TRANSACTION_IDENTIFIER: &str = "Transaction Identifier";
    pub const VALIDATION_CODE: &str = "Validation Code";
    pub const GROUP_III_VERSION: &str = "Group III Version Number";
    pub const REMAINING: &str = "Remaining";

    // Settlement
    pub const BATCH_RECORD_COUNT: &str = "Batch Record Count";
    pub const BATCH_NET_DEPOSIT: &str = "Batch Net Deposit";
    pub const BATCH_NUMBER: &str = "Batch Number";
    pub const BATCH_RESPONSE_TEXT: &str = "Batch Response Text";
    pub const BATCH_DATE: &str = "Batch Date";

    // Rejected batch
    pub const ERROR_TYPE: &str = "Error Type";
    pub const ERROR_RECORD_SEQUENCE: &str = "Error Record Sequence Number";
    pub const ERROR_RECORD_TYPE: &str = "Error Record Type";
    pub const ERROR_DATA_FIELD: &str = "Error Data Field Number";
    pub const ERROR_DATA: &str = "Error Data";

    // Generic error
    pub const CODE: &str = "Code";
    pub const TEXT: &str = "Text";
}

/// Which response shape matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum ResponseKind {
    /// E-format authorization response
    Authorization,
    /// GB: good batch
    BatchAccepted,
    /// QD: duplicate batch
    BatchDuplicate,
    /// RB: rejected batch
    BatchRejected,
    /// `<code> - <text>` from the gateway
    Error,
}

impl fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResponseKind::Authorization => "authorization",
            ResponseKind::BatchAccepted => "batch accepted",
            ResponseKind::BatchDuplicate => "batch duplicate",
            ResponseKind::BatchRejected => "batch rejected",
            ResponseKind::Error => "error",
        };
        write!(f, "{name}")
    }
}

/// A parsed response: named values in the order they appear on the wire.
///
/// # Example
/// ```
/// use vitalnet_protocol::{Response, ResponseKind};
///
/// let mut response = Response::new(ResponseKind::Error);
/// response.push("Code", "906");
/// response.push("Text", "System error");
///
/// assert_eq!(response.get("Code"), Some("906"));
/// assert_eq!(response.keys().collect::<Vec<_>>(), ["Code", "Text"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    kind: ResponseKind,
    fields: Vec<(String, String)>,
}

impl Response {
    pub fn new(kind: ResponseKind) -> Self {
        Response {
            kind,
            fields: Vec::new(),
        }
    }

    pub fn kind(&self) -> ResponseKind {
        self.kind
    }

    /// Append a field, replacing the value in place if the name exists.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Authorization with response code `00`.
    pub fn is_approved(&self) -> bool {
        self.kind == ResponseKind::Authorization && self.get(keys::RESPONSE_CODE) == Some("00")
    }

    /// Batch accepted by the host.
    pub fn is_accepted(&self) -> bool {
        self.kind == ResponseKind::BatchAccepted
    }
}

/// Serialized as a map so field order survives into JSON.
impl Serialize for Response {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}]", self.kind)?;
        for (name, value) in &self.fields {
            writeln!(f, "{name}: {value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approved() -> Response {
        let mut r = Response::new(ResponseKind::Authorization);
        r.push(keys::RETURNED_ACI, "E");
        r.push(keys::RESPONSE_CODE, "00");
        r.push(keys::APPROVAL_CODE, "123456");
        r
    }

    #[test]
    fn test_insertion_order() {
        let r = approved();
        let keys: Vec<&str> = r.keys().collect();
        assert_eq!(keys, vec!["Returned ACI", "Response Code", "Approval Code"]);
    }

    #[test]
    fn test_push_replaces_in_place() {
        let mut r = approved();
        r.push(keys::RETURNED_ACI, "A");

        assert_eq!(r.len(), 3);
        assert_eq!(r.iter().next(), Some(("Returned ACI", "A")));
    }

    #[test]
    fn test_is_approved() {
        assert!(approved().is_approved());

        let mut declined = approved();
        declined.push(keys::RESPONSE_CODE, "05");
        assert!(!declined.is_approved());

        let mut batch = Response::new(ResponseKind::BatchAccepted);
        batch.push(keys::RESPONSE_CODE, "00");
        assert!(!batch.is_approved());
        assert!(batch.is_accepted());
    }

    #[test]
    fn test_serialize_preserves_order() {
        let json = serde_json::to_string(&approved()).unwrap();
        assert_eq!(
            json,
            r#"{"Returned ACI":"E","Response Code":"00","Approval Code":"123456"}"#
        );
    }

    #[test]
    fn test_display() {
        let text = approved().to_string();
        assert!(text.starts_with("[authorization]\n"));
        assert!(text.contains("Approval Code: 123456\n"));
    }

    #[test]
    fn test_empty() {
        let r = Response::new(ResponseKind::Error);
        assert!(r.is_empty());
        assert!(!r.contains(keys::CODE));
    }
}
