use crate::core::error_info::ErrorInfo;
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Outcome of a fallible computation
///
/// Exactly one of two variants. A `Success` may carry no payload at all
/// (an "empty" success), which is distinct from a success carrying a value.
/// `Some(Value::Null)` is treated as absent by [`is_empty`](Self::is_empty)
/// and [`has_payload`](Self::has_payload).
///
/// Serializes to `{"success": true, "payload": ...}` or
/// `{"success": false, "error": {...}}`.
#[derive(Debug, Clone, PartialEq)]
pub enum Failable {
    Success { payload: Option<Value> },
    Failure { error: ErrorInfo },
}

impl Failable {
    /// Success carrying `payload`
    pub fn success(payload: impl Into<Value>) -> Self {
        Failable::Success {
            payload: Some(payload.into()),
        }
    }

    /// Success with no payload
    pub fn empty() -> Self {
        Failable::Success { payload: None }
    }

    /// Failure from a message, a structured JSON error, or an [`ErrorInfo`]
    pub fn failure(error: impl Into<ErrorInfo>) -> Self {
        Failable::Failure {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Failable::Success { .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Failable::Failure { .. })
    }

    /// True for a success whose payload is absent or null
    pub fn is_empty(&self) -> bool {
        matches!(self, Failable::Success { payload: None | Some(Value::Null) })
    }

    /// True for a success whose payload is present and non-null
    ///
    /// Falsy values such as `0`, `""` and `false` count as present.
    pub fn has_payload(&self) -> bool {
        matches!(self, Failable::Success { payload: Some(value) } if !value.is_null())
    }

    pub fn payload(&self) -> Option<&Value> {
        match self {
            Failable::Success { payload } => payload.as_ref(),
            Failable::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        match self {
            Failable::Success { .. } => None,
            Failable::Failure { error } => Some(error),
        }
    }

    pub fn into_payload(self) -> Option<Value> {
        match self {
            Failable::Success { payload } => payload,
            Failable::Failure { .. } => None,
        }
    }

    pub fn into_result(self) -> Result<Option<Value>, ErrorInfo> {
        match self {
            Failable::Success { payload } => Ok(payload),
            Failable::Failure { error } => Err(error),
        }
    }
}

/// Success carrying `payload`
pub fn success(payload: impl Into<Value>) -> Failable {
    Failable::success(payload)
}

/// Success with no payload
pub fn empty() -> Failable {
    Failable::empty()
}

/// Failure from a message, a structured JSON error, or an [`ErrorInfo`]
pub fn failure(error: impl Into<ErrorInfo>) -> Failable {
    Failable::failure(error)
}

/// Structural check for values handed back by untyped stages
///
/// Accepts an object whose `success` key is a boolean. For `success: false`
/// an `error` key, when present, must be null, a string or an object, the
/// same inputs [`failure`] accepts.
pub fn is_failable(value: &Value) -> bool {
    match value.get("success") {
        Some(Value::Bool(true)) => true,
        Some(Value::Bool(false)) => value
            .get("error")
            .is_none_or(|error| error.is_null() || error.is_string() || error.is_object()),
        _ => false,
    }
}

/// A value that does not have the failable shape
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("value does not match the failable shape: {0}")]
pub struct NotFailable(pub Value);

impl TryFrom<Value> for Failable {
    type Error = NotFailable;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        if !is_failable(&value) {
            return Err(NotFailable(value));
        }
        let mut fields = match value {
            Value::Object(fields) => fields,
            other => return Err(NotFailable(other)),
        };
        match fields.remove("success") {
            Some(Value::Bool(true)) => Ok(Failable::Success {
                payload: fields.remove("payload"),
            }),
            _ => Ok(Failable::Failure {
                error: fields.remove("error").map(ErrorInfo::from).unwrap_or_default(),
            }),
        }
    }
}

impl<E: Into<ErrorInfo>> From<Result<Value, E>> for Failable {
    fn from(result: Result<Value, E>) -> Self {
        match result {
            Ok(payload) => Failable::success(payload),
            Err(error) => Failable::failure(error),
        }
    }
}

impl Serialize for Failable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match self {
            Failable::Success { payload } => {
                map.serialize_entry("success", &true)?;
                if let Some(payload) = payload {
                    map.serialize_entry("payload", payload)?;
                }
            }
            Failable::Failure { error } => {
                map.serialize_entry("success", &false)?;
                map.serialize_entry("error", error)?;
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Failable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Failable::try_from(value).map_err(D::Error::custom)
    }
}

impl Default for Failable {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_wraps_payload() {
        let res = success(json!({ "foo": "bar" }));
        assert_eq!(
            serde_json::to_value(&res).unwrap(),
            json!({ "success": true, "payload": { "foo": "bar" } })
        );
    }

    #[test]
    fn failure_wraps_string_message() {
        let res = failure("oops!");
        assert_eq!(
            serde_json::to_value(&res).unwrap(),
            json!({ "success": false, "error": { "message": "oops!" } })
        );
        assert_eq!(res, failure(json!({ "message": "oops!" })));
    }

    #[test]
    fn empty_equals_success_without_payload() {
        assert_eq!(empty(), Failable::Success { payload: None });
        assert_eq!(serde_json::to_value(empty()).unwrap(), json!({ "success": true }));
    }

    #[test]
    fn unit_payload_is_not_an_empty_success() {
        let unit = success(());
        assert!(unit.is_empty());
        assert_ne!(unit, empty());
        assert_eq!(
            serde_json::to_value(&unit).unwrap(),
            json!({ "success": true, "payload": null })
        );
    }

    #[test]
    fn variants_are_exclusive() {
        let ok = success(json!({ "foo": "bar" }));
        let err = failure("some error");
        assert!(ok.is_success() && !ok.is_failure());
        assert!(err.is_failure() && !err.is_success());
    }

    #[test]
    fn is_empty_only_for_absent_or_null_payload() {
        assert!(empty().is_empty());
        assert!(success(Value::Null).is_empty());
        assert!(!success(json!({})).is_empty());
        assert!(!failure("nope").is_empty());
    }

    #[test]
    fn has_payload_treats_falsy_values_as_present() {
        assert!(success(json!({ "foo": 1 })).has_payload());
        assert!(success(json!({})).has_payload());
        assert!(success(0).has_payload());
        assert!(success("").has_payload());
        assert!(success(false).has_payload());
        assert!(!empty().has_payload());
        assert!(!success(Value::Null).has_payload());
        assert!(!failure("nope").has_payload());
    }

    #[test]
    fn is_failable_checks_shape() {
        assert!(is_failable(&serde_json::to_value(success(3)).unwrap()));
        assert!(is_failable(&serde_json::to_value(failure("oops")).unwrap()));
        assert!(is_failable(&json!({ "success": false, "error": "some error" })));
        assert!(!is_failable(&json!("not failable")));
        assert!(!is_failable(&json!(7)));
        assert!(!is_failable(&json!({ "success": "yes" })));
        assert!(!is_failable(&json!({ "success": false, "error": 12 })));
    }

    #[test]
    fn null_error_is_failable() {
        let wire = serde_json::to_value(failure(Value::Null)).unwrap();
        assert!(is_failable(&wire));

        let raw = json!({ "success": false, "error": null });
        assert!(is_failable(&raw));
        assert_eq!(Failable::try_from(raw).unwrap(), failure(Value::Null));
    }

    #[test]
    fn structured_error_keeps_its_wire_shape() {
        for error in [
            json!({ "code": 3 }),
            json!({ "message": "x", "cause": "db down" }),
            json!({ "message": null }),
        ] {
            assert_eq!(
                serde_json::to_value(failure(error.clone())).unwrap(),
                json!({ "success": false, "error": error })
            );
        }
    }

    #[test]
    fn try_from_value_parses_failables() {
        let ok = Failable::try_from(json!({ "success": true, "payload": 8 })).unwrap();
        assert_eq!(ok, success(8));

        let err = Failable::try_from(json!({ "success": false, "error": "some error" })).unwrap();
        assert_eq!(err, failure("some error"));

        let rejected = Failable::try_from(json!(7)).unwrap_err();
        assert_eq!(rejected, NotFailable(json!(7)));
    }

    #[test]
    fn deserialize_round_trips() {
        let original = failure(json!({ "message": "bad", "code": 3 }));
        let text = serde_json::to_string(&original).unwrap();
        let parsed: Failable = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, original);

        assert!(serde_json::from_str::<Failable>("42").is_err());
    }

    #[test]
    fn into_result_splits_variants() {
        assert_eq!(success(1).into_result(), Ok(Some(json!(1))));
        assert_eq!(failure("x").into_result().unwrap_err().message, "x");
        assert_eq!(Failable::from(Err::<Value, _>("boom")), failure("boom"));
    }
}
