//! Session status as reported by the backend.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response body of `GET /api/session`.
///
/// `authenticated` is kept as raw JSON because the backend is loosely typed;
/// use [`SessionStatus::is_authenticated`] to interpret it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionStatus {
    #[serde(default)]
    pub authenticated: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl SessionStatus {
    /// Build a status for a logged-in user.
    #[must_use]
    pub fn authenticated(username: Option<String>) -> Self {
        Self {
            authenticated: Value::Bool(true),
            username,
        }
    }

    /// Build a status for an anonymous visitor.
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            authenticated: Value::Bool(false),
            username: None,
        }
    }

    /// Whether the `authenticated` field is truthy.
    ///
    /// `true`, non-zero numbers, non-empty strings, arrays, and objects count
    /// as authenticated. `false`, `0`, `""`, `null`, and a missing field do not.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        match &self.authenticated {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(body: &str) -> SessionStatus {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_truthiness() {
        assert!(parse(r#"{"authenticated":true}"#).is_authenticated());
        assert!(parse(r#"{"authenticated":1}"#).is_authenticated());
        assert!(parse(r#"{"authenticated":"yes"}"#).is_authenticated());
        assert!(!parse(r#"{"authenticated":false}"#).is_authenticated());
        assert!(!parse(r#"{"authenticated":0}"#).is_authenticated());
        assert!(!parse(r#"{"authenticated":""}"#).is_authenticated());
        assert!(!parse(r#"{"authenticated":null}"#).is_authenticated());
        assert!(!parse("{}").is_authenticated());
    }

    #[test]
    fn test_username_is_optional() {
        let status = parse(r#"{"authenticated":true,"username":"asha"}"#);
        assert_eq!(status.username.as_deref(), Some("asha"));
        assert_eq!(parse(r#"{"authenticated":true}"#).username, None);
    }

    #[test]
    fn test_constructors() {
        assert!(SessionStatus::authenticated(None).is_authenticated());
        assert!(!SessionStatus::anonymous().is_authenticated());
    }
}
