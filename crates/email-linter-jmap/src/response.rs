//! JMAP response envelope, validated at the boundary.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::request::Invocation;

/// Body some servers send instead of a problem document when they cannot
/// parse the request.
const MALFORMED_JSON_BODY: &str = "Malformed JSON";

/// A JMAP API response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// Method responses, in call order.
    pub method_responses: Vec<Invocation>,
    /// Opaque server state token.
    #[serde(default)]
    pub session_state: Option<String>,
}

impl Response {
    /// Parses a raw response body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] for the literal `Malformed JSON` body and
    /// [`Error::Protocol`] for anything else that is not a JMAP response.
    pub fn parse(body: &str) -> Result<Self> {
        if body.trim() == MALFORMED_JSON_BODY {
            return Err(Error::Transport(MALFORMED_JSON_BODY.to_string()));
        }
        Ok(serde_json::from_str(body)?)
    }

    /// Removes and returns the response to the call with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedResponse`] if the call has no response or
    /// answered with a different method.
    pub fn take(&mut self, call_id: &str, method: &str) -> Result<MethodResponse> {
        let index = self
            .method_responses
            .iter()
            .position(|invocation| invocation.call_id() == call_id)
            .ok_or_else(|| {
                Error::UnexpectedResponse(format!("no response for {method} (call {call_id})"))
            })?;
        let Invocation(name, arguments, _) = self.method_responses.remove(index);

        if name == "error" {
            return Ok(MethodResponse::Error(serde_json::from_value(arguments)?));
        }
        if name != method {
            return Err(Error::UnexpectedResponse(format!(
                "expected {method} for call {call_id}, got {name}"
            )));
        }
        Ok(MethodResponse::Success(arguments))
    }
}

/// Outcome of one method call.
#[derive(Debug, Clone, PartialEq)]
pub enum MethodResponse {
    /// The method's result arguments.
    Success(Value),
    /// A method-level error.
    Error(MethodError),
}

impl MethodResponse {
    /// Deserializes a successful result, or hands the method error to `on_error`.
    ///
    /// # Errors
    ///
    /// Returns the error built by `on_error`, or [`Error::Protocol`] if the
    /// arguments do not match `T`.
    pub fn into_result<T, F>(self, on_error: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: FnOnce(MethodError) -> Error,
    {
        match self {
            Self::Success(arguments) => Ok(serde_json::from_value(arguments)?),
            Self::Error(error) => Err(on_error(error)),
        }
    }
}

/// Method-level error (RFC 8620 §3.6.2).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MethodError {
    /// Error type (e.g., `requestTooLarge`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

impl MethodError {
    /// Description, or an empty string.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }
}

/// Arguments of a `Foo/query` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    /// Matching ids, in sort order, for the requested window.
    pub ids: Vec<String>,
    /// Total number of matches, if the server calculated it.
    #[serde(default)]
    pub total: Option<u64>,
    /// Zero-based index of the first returned id.
    #[serde(default)]
    pub position: u64,
}

/// Arguments of a `Foo/get` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetResponse<T> {
    /// Fetched objects.
    pub list: Vec<T>,
    /// Requested ids that do not exist.
    #[serde(default)]
    pub not_found: Vec<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_malformed_json_body() {
        let err = Response::parse("Malformed JSON").unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }

    #[test]
    fn test_parse_not_json() {
        let err = Response::parse("<html>Bad gateway</html>").unwrap_err();
        assert!(matches!(err, Error::Protocol(_)));
    }

    #[test]
    fn test_parse_missing_method_responses() {
        let err = Response::parse(r#"{"sessionState": "s1"}"#).unwrap_err();
        assert!(matches!(err, Error::Protocol(_)));
    }

    #[test]
    fn test_take_success_and_error() {
        let body = r#"{
            "methodResponses": [
                ["Email/query", {"ids": ["e1"], "total": 1}, "0"],
                ["error", {"type": "requestTooLarge"}, "1"]
            ],
            "sessionState": "s1"
        }"#;
        let mut response = Response::parse(body).unwrap();

        let query: QueryResponse = response
            .take("0", "Email/query")
            .unwrap()
            .into_result(|e| Error::query(e.kind, ""))
            .unwrap();
        assert_eq!(query.ids, vec!["e1".to_string()]);
        assert_eq!(query.total, Some(1));

        let MethodResponse::Error(error) = response.take("1", "Email/get").unwrap() else {
            panic!("expected a method error");
        };
        assert_eq!(error.kind, "requestTooLarge");
        assert_eq!(error.description(), "");
    }

    #[test]
    fn test_take_missing_call() {
        let mut response = Response::parse(r#"{"methodResponses": []}"#).unwrap();
        let err = response.take("0", "Email/query").unwrap_err();
        assert!(matches!(err, Error::UnexpectedResponse(_)));
    }

    #[test]
    fn test_take_wrong_method() {
        let body = r#"{"methodResponses": [["Mailbox/get", {"list": []}, "0"]]}"#;
        let mut response = Response::parse(body).unwrap();
        let err = response.take("0", "Email/query").unwrap_err();
        assert!(matches!(err, Error::UnexpectedResponse(_)));
    }
}
