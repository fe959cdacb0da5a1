// Response envelopes and the truthiness rules used to detect remote errors

use serde::Deserialize;
use serde_json::Value;

use crate::error::{ConsoleError, Result};

/// Body returned by every per-member call: `{error?, response?}`
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MemberEnvelope {
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub response: Option<Value>,
}

impl MemberEnvelope {
    /// A truthy `error` fails the call with its text; otherwise `response` is the result
    pub fn into_result(self) -> Result<Value> {
        if let Some(message) = self.error.as_ref().and_then(error_text) {
            return Err(ConsoleError::Application(message));
        }
        Ok(self.response.unwrap_or(Value::Null))
    }
}

/// `null`, `false`, `0` and `""` are falsy; everything else is truthy
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn error_text(value: &Value) -> Option<String> {
    if !is_truthy(value) {
        return None;
    }
    match value {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Text of a truthy `error` field in an arbitrary response body, if any
pub fn error_message(body: &Value) -> Option<String> {
    body.get("error").and_then(error_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_error() {
        let envelope: MemberEnvelope =
            serde_json::from_value(json!({"error": "no such key"})).unwrap();
        match envelope.into_result() {
            Err(ConsoleError::Application(message)) => assert_eq!(message, "no such key"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_envelope_falsy_error_is_success() {
        let envelope: MemberEnvelope =
            serde_json::from_value(json!({"error": "", "response": "ok"})).unwrap();
        assert_eq!(envelope.into_result().unwrap(), json!("ok"));

        let envelope: MemberEnvelope =
            serde_json::from_value(json!({"error": null, "response": 5})).unwrap();
        assert_eq!(envelope.into_result().unwrap(), json!(5));
    }

    #[test]
    fn test_envelope_missing_response() {
        let envelope: MemberEnvelope = serde_json::from_value(json!({})).unwrap();
        assert_eq!(envelope.into_result().unwrap(), Value::Null);
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(-1)));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
    }

    #[test]
    fn test_error_message_non_string() {
        assert_eq!(
            error_message(&json!({"error": {"code": 7}})),
            Some("{\"code\":7}".to_string())
        );
        assert_eq!(error_message(&json!({"id": 3})), None);
        assert_eq!(error_message(&json!([1, 2])), None);
    }
}
