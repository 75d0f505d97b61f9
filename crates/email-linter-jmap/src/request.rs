//! JMAP request building blocks.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Capability URI for the JMAP core.
pub const CORE_CAPABILITY: &str = "urn:ietf:params:jmap:core";

/// Capability URI for JMAP mail.
pub const MAIL_CAPABILITY: &str = "urn:ietf:params:jmap:mail";

/// A JMAP API request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// Capabilities the request relies on.
    pub using: Vec<&'static str>,
    /// Method calls, executed by the server in order.
    pub method_calls: Vec<Invocation>,
}

impl Request {
    /// Creates an empty request using the core and mail capabilities.
    #[must_use]
    pub fn new() -> Self {
        Self {
            using: vec![CORE_CAPABILITY, MAIL_CAPABILITY],
            method_calls: Vec::new(),
        }
    }

    /// Appends a method call.
    #[must_use]
    pub fn call(mut self, name: impl Into<String>, arguments: Value, call_id: impl Into<String>) -> Self {
        self.method_calls
            .push(Invocation(name.into(), arguments, call_id.into()));
        self
    }
}

impl Default for Request {
    fn default() -> Self {
        Self::new()
    }
}

/// A method call or method response: `[name, arguments, callId]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invocation(pub String, pub Value, pub String);

impl Invocation {
    /// Method name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Client-chosen call id.
    #[must_use]
    pub fn call_id(&self) -> &str {
        &self.2
    }
}

/// Reference to a previous call's result (RFC 8620 §3.7).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultReference {
    /// Call id of the referenced method call.
    pub result_of: String,
    /// Name of the referenced method.
    pub name: String,
    /// JSON pointer into the referenced result.
    pub path: String,
}

impl ResultReference {
    /// References the `/ids` of a previous query call.
    #[must_use]
    pub fn ids_of(call_id: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            result_of: call_id.into(),
            name: method.into(),
            path: "/ids".to_string(),
        }
    }
}

/// Object properties the linter ever asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Property {
    /// Object id.
    Id,
    /// Mailbox role.
    Role,
    /// Mailbox name.
    Name,
    /// `To` header.
    To,
    /// `Cc` header.
    Cc,
    /// `Bcc` header.
    Bcc,
    /// `From` header.
    From,
}

/// Logical operator joining filter conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operator {
    /// All conditions must match.
    And,
    /// Any condition must match.
    Or,
}

/// A single filter condition. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Email is in this mailbox.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_mailbox: Option<String>,
    /// Email is in at least one mailbox not in this list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_mailbox_other_than: Option<Vec<String>>,
    /// Mailbox has this role.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Mailbox name contains this text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `To` header contains this text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// `Cc` header contains this text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cc: Option<String>,
    /// `Bcc` header contains this text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bcc: Option<String>,
}

/// A `FilterOperator` or `FilterCondition`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Filter {
    /// Combination of nested filters.
    Operator {
        /// How the conditions combine.
        operator: Operator,
        /// Nested filters.
        conditions: Vec<Filter>,
    },
    /// Leaf condition.
    Condition(Condition),
}

impl Filter {
    /// Emails in the given mailbox.
    #[must_use]
    pub fn in_mailbox(id: impl Into<String>) -> Self {
        Self::Condition(Condition {
            in_mailbox: Some(id.into()),
            ..Condition::default()
        })
    }

    /// Emails that are in some mailbox other than the given ones.
    #[must_use]
    pub fn in_mailbox_other_than<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Condition(Condition {
            in_mailbox_other_than: Some(ids.into_iter().map(Into::into).collect()),
            ..Condition::default()
        })
    }

    /// Mailboxes with the given role.
    #[must_use]
    pub fn role(role: impl Into<String>) -> Self {
        Self::Condition(Condition {
            role: Some(role.into()),
            ..Condition::default()
        })
    }

    /// Mailboxes whose name contains the given text.
    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        Self::Condition(Condition {
            name: Some(name.into()),
            ..Condition::default()
        })
    }

    /// Emails whose `To` header contains the address.
    #[must_use]
    pub fn to(address: impl Into<String>) -> Self {
        Self::Condition(Condition {
            to: Some(address.into()),
            ..Condition::default()
        })
    }

    /// Emails whose `Cc` header contains the address.
    #[must_use]
    pub fn cc(address: impl Into<String>) -> Self {
        Self::Condition(Condition {
            cc: Some(address.into()),
            ..Condition::default()
        })
    }

    /// Emails whose `Bcc` header contains the address.
    #[must_use]
    pub fn bcc(address: impl Into<String>) -> Self {
        Self::Condition(Condition {
            bcc: Some(address.into()),
            ..Condition::default()
        })
    }

    /// All of the given filters.
    #[must_use]
    pub const fn and(conditions: Vec<Self>) -> Self {
        Self::Operator {
            operator: Operator::And,
            conditions,
        }
    }

    /// Any of the given filters.
    #[must_use]
    pub const fn or(conditions: Vec<Self>) -> Self {
        Self::Operator {
            operator: Operator::Or,
            conditions,
        }
    }
}

/// Sort order for a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparator {
    /// Property to sort by.
    pub property: String,
    /// Ascending if true.
    pub is_ascending: bool,
}

impl Comparator {
    /// Most recently received first.
    #[must_use]
    pub fn newest_first() -> Self {
        Self {
            property: "receivedAt".to_string(),
            is_ascending: false,
        }
    }
}
