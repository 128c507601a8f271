use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Error information carried by a failed [`Failable`](crate::Failable)
///
/// At minimum a `message`. Structured errors keep their extra fields in
/// `details`, and a wrapped error (for example the panic or `Err` behind a
/// "threw an exception" failure) is kept as `cause`.
///
/// A structured JSON error serializes back to exactly the value it was built
/// from: `message` is only lifted out when it is a non-empty string and
/// `cause` only when it is an object, anything else stays in `details`.
///
/// # Example
///
/// ```
/// use failable::ErrorInfo;
/// use serde_json::json;
///
/// let plain = ErrorInfo::from("oops!");
/// assert_eq!(plain.message, "oops!");
///
/// let structured = ErrorInfo::from(json!({ "message": "bad input", "field": "email" }));
/// assert_eq!(structured.message, "bad input");
/// assert_eq!(structured.details["field"], "email");
/// ```
#[derive(Debug, Clone, Default, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ErrorInfo {
    pub message: String,
    #[source]
    pub cause: Option<Box<ErrorInfo>>,
    pub details: Map<String, Value>,
}

impl ErrorInfo {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
            details: Map::new(),
        }
    }

    /// Attach the error this one wraps
    pub fn with_cause(mut self, cause: ErrorInfo) -> Self {
        self.details.remove("cause");
        self.cause = Some(Box::new(cause));
        self
    }

    /// Attach an extra structured field
    ///
    /// `message` and `cause` are not details: they set the message (a
    /// non-string value is rendered as JSON text) and the wrapped error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        let value = value.into();
        match key.as_str() {
            "message" => {
                self.details.remove("message");
                self.message = match value {
                    Value::String(message) => message,
                    other => other.to_string(),
                };
                self
            }
            "cause" => self.with_cause(ErrorInfo::from(value)),
            _ => {
                self.details.insert(key, value);
                self
            }
        }
    }

    /// Capture any standard error, turning its `source()` chain into nested causes
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        let info = Self::new(err.to_string());
        match err.source() {
            Some(source) => info.with_cause(Self::from_error(source)),
            None => info,
        }
    }

    /// Iterate over this error and every nested cause, outermost first
    pub fn chain(&self) -> impl Iterator<Item = &ErrorInfo> {
        std::iter::successors(Some(self), |info| info.cause.as_deref())
    }
}

impl From<&str> for ErrorInfo {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for ErrorInfo {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

/// Structured values pass through; only a non-empty string `message` and an
/// object `cause` are lifted out
impl From<Value> for ErrorInfo {
    fn from(value: Value) -> Self {
        match value {
            Value::String(message) => Self::new(message),
            Value::Object(mut fields) => {
                let message = match fields.remove("message") {
                    Some(Value::String(message)) if !message.is_empty() => message,
                    Some(raw) => {
                        fields.insert("message".to_string(), raw);
                        String::new()
                    }
                    None => String::new(),
                };
                let cause = match fields.remove("cause") {
                    Some(cause @ Value::Object(_)) => Some(Box::new(ErrorInfo::from(cause))),
                    Some(raw) => {
                        fields.insert("cause".to_string(), raw);
                        None
                    }
                    None => None,
                };
                Self {
                    message,
                    cause,
                    details: fields,
                }
            }
            Value::Null => Self::default(),
            other => Self::new(other.to_string()),
        }
    }
}

/// `message` is written when non-empty and `cause` when set; a raw `details`
/// entry under either key is only written when the field itself is not
impl Serialize for ErrorInfo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if !self.message.is_empty() {
            map.serialize_entry("message", &self.message)?;
        }
        if let Some(cause) = &self.cause {
            map.serialize_entry("cause", cause)?;
        }
        for (key, value) in &self.details {
            let shadowed = match key.as_str() {
                "message" => !self.message.is_empty(),
                "cause" => self.cause.is_some(),
                _ => false,
            };
            if !shadowed {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ErrorInfo {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(ErrorInfo::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::error::Error;

    #[derive(Debug, thiserror::Error)]
    #[error("connection refused")]
    struct Refused;

    #[derive(Debug, thiserror::Error)]
    #[error("could not load profile")]
    struct LoadFailed(#[source] Refused);

    #[test]
    fn string_becomes_message() {
        let info = ErrorInfo::from("oops!");
        assert_eq!(info.message, "oops!");
        assert!(info.cause.is_none());
        assert!(info.details.is_empty());
        assert_eq!(serde_json::to_value(&info).unwrap(), json!({ "message": "oops!" }));
    }

    #[test]
    fn structured_value_passes_through() {
        let raw = json!({ "message": "error 1", "code": 42, "tags": ["a", "b"] });
        let info = ErrorInfo::from(raw.clone());
        assert_eq!(info.message, "error 1");
        assert_eq!(info.details["code"], 42);
        assert_eq!(serde_json::to_value(&info).unwrap(), raw);
    }

    #[test]
    fn nested_cause_is_parsed() {
        let info = ErrorInfo::from(json!({
            "message": "outer",
            "cause": { "message": "inner" }
        }));
        let messages: Vec<_> = info.chain().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, ["outer", "inner"]);
        assert_eq!(info.source().map(|e| e.to_string()), Some("inner".to_string()));
    }

    #[test]
    fn std_error_chain_is_kept() {
        let info = ErrorInfo::from_error(&LoadFailed(Refused));
        assert_eq!(info.to_string(), "could not load profile");
        assert_eq!(info.cause.as_deref().map(|c| c.message.as_str()), Some("connection refused"));
    }

    fn round_trip(raw: Value) -> Value {
        serde_json::to_value(ErrorInfo::from(raw)).unwrap()
    }

    #[test]
    fn missing_message_is_not_invented() {
        let raw = json!({ "code": 3 });
        assert_eq!(round_trip(raw.clone()), raw);
        assert_eq!(ErrorInfo::from(raw).message, "");
    }

    #[test]
    fn non_object_cause_stays_raw() {
        let raw = json!({ "message": "x", "cause": "db down" });
        let info = ErrorInfo::from(raw.clone());
        assert!(info.cause.is_none());
        assert_eq!(info.details["cause"], "db down");
        assert_eq!(round_trip(raw), json!({ "message": "x", "cause": "db down" }));
    }

    #[test]
    fn non_string_message_stays_raw() {
        for raw in [
            json!({ "message": null }),
            json!({ "message": 500 }),
            json!({ "message": "" }),
        ] {
            let info = ErrorInfo::from(raw.clone());
            assert_eq!(info.message, "");
            assert_eq!(round_trip(raw.clone()), raw);
        }
    }

    #[test]
    fn deserialize_keeps_structured_input() {
        let text = r#"{"message":null,"cause":"db down","code":3}"#;
        let info: ErrorInfo = serde_json::from_str(text).unwrap();
        assert_eq!(
            serde_json::to_value(&info).unwrap(),
            serde_json::from_str::<Value>(text).unwrap()
        );
    }

    #[test]
    fn reserved_detail_keys_set_the_real_fields() {
        let info = ErrorInfo::new("a").with_detail("message", "b");
        assert_eq!(info.message, "b");
        assert!(info.details.is_empty());
        assert_eq!(serde_json::to_value(&info).unwrap(), json!({ "message": "b" }));

        let info = ErrorInfo::new("outer").with_detail("cause", "inner");
        assert_eq!(info.cause.as_deref().map(|c| c.message.as_str()), Some("inner"));
        assert!(info.details.is_empty());
        assert_eq!(
            serde_json::to_value(&info).unwrap(),
            json!({ "message": "outer", "cause": { "message": "inner" } })
        );
    }

    #[test]
    fn canonical_fields_win_over_raw_details() {
        let mut info = ErrorInfo::new("real").with_cause(ErrorInfo::new("inner"));
        info.details.insert("message".to_string(), json!("shadow"));
        info.details.insert("cause".to_string(), json!("shadow"));
        assert_eq!(
            serde_json::to_value(&info).unwrap(),
            json!({ "message": "real", "cause": { "message": "inner" } })
        );
    }
}
