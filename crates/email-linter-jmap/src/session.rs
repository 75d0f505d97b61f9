//! JMAP session resource (RFC 8620 §2).

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::request::MAIL_CAPABILITY;

/// Fastmail's session endpoint.
pub const DEFAULT_SESSION_URL: &str = "https://api.fastmail.com/jmap/session";

/// Body Fastmail returns when the `Authorization` header is unusable.
const BAD_AUTHORIZATION_BODY: &str = "Authorization header not a valid format";

/// The parts of the session resource the linter needs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// URL to POST API requests to.
    pub api_url: String,
    /// Primary account id per capability.
    pub primary_accounts: HashMap<String, String>,
}

impl Session {
    /// Parses a session response body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unauthorized`] if the server rejected the token and
    /// [`Error::Protocol`] if the body is not a session object.
    pub fn parse(body: &str) -> Result<Self> {
        if body.trim().eq_ignore_ascii_case(BAD_AUTHORIZATION_BODY) {
            return Err(Error::Unauthorized);
        }
        Ok(serde_json::from_str(body)?)
    }

    /// Primary account id for mail.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedResponse`] if the session has no mail account.
    pub fn mail_account_id(&self) -> Result<&str> {
        self.primary_accounts
            .get(MAIL_CAPABILITY)
            .map(String::as_str)
            .ok_or_else(|| Error::UnexpectedResponse("session has no primary mail account".into()))
    }
}
