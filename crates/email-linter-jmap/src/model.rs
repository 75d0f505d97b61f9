//! JMAP data records.
//!
//! Only the properties the linter requests are modelled. Address lists that
//! the server omits or sends as `null` deserialize to empty lists.

use serde::{Deserialize, Deserializer, Serialize};

/// One entry of an address header (`to`, `cc`, `bcc`, `from`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
    /// Display name, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The address itself, as sent by the server.
    pub email: String,
}

impl EmailAddress {
    /// Creates an address entry without a display name.
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            name: None,
            email: email.into(),
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Minimal projection of a JMAP `Email` object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    /// Email id (only present when requested).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// `To` recipients.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub to: Vec<EmailAddress>,
    /// `Cc` recipients.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub cc: Vec<EmailAddress>,
    /// `Bcc` recipients.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub bcc: Vec<EmailAddress>,
    /// Senders.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub from: Vec<EmailAddress>,
}

impl Email {
    /// Returns the three recipient lists in header order: to, cc, bcc.
    #[must_use]
    pub fn recipient_lists(&self) -> [&[EmailAddress]; 3] {
        [&self.to, &self.cc, &self.bcc]
    }
}

/// Minimal projection of a JMAP `Mailbox` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mailbox {
    /// Mailbox id.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Standard role (`inbox`, `junk`, ...), if the server assigned one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<EmailAddress>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<EmailAddress>>::deserialize(deserializer)?.unwrap_or_default())
}
