//! The linting pipeline.
//!
//! ```text
//! ResolveMailboxes -> FetchInboxRecipients -> Classify
//!     -> (empty: NoDisposableFound)
//!     -> FetchNonSpamForDisposable -> Aggregate -> Found(Report)
//! ```
//!
//! Stages run strictly in order; each consumes the previous stage's output.

use email_linter_jmap::{Email, Filter, JmapClient, Property, QueryEnvelope, QueryOptions, Transport};
use tracing::{debug, info};

use crate::aggregate::{DisposableSet, SenderIndex, aggregate};
use crate::classify::classify;
use crate::config::{DomainSet, LinterConfig};
use crate::error::Result;
use crate::mailbox::{MailboxPair, resolve_mailboxes};

const RECIPIENT_PROPERTIES: &[Property] = &[Property::To, Property::Cc, Property::Bcc];
const SENDER_PROPERTIES: &[Property] = &[Property::To, Property::Cc, Property::Bcc, Property::From];

/// A query matched more records than it returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truncation {
    /// Records fetched.
    pub retrieved: u64,
    /// Records matching store-wide.
    pub total: u64,
}

impl Truncation {
    /// Returns the truncation of an envelope, if any.
    #[must_use]
    pub fn of<T>(envelope: &QueryEnvelope<T>) -> Option<Self> {
        envelope.is_truncated().then(|| Self {
            retrieved: envelope.retrieved(),
            total: envelope.total,
        })
    }
}

/// Everything a successful run found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Disposable addresses seen in the inbox.
    pub disposable: DisposableSet,
    /// Senders outside spam per disposable address.
    pub senders: SenderIndex,
    /// Set when the inbox scan did not cover every thread.
    pub inbox_truncation: Option<Truncation>,
    /// Set when the sender search did not cover every match.
    pub search_truncation: Option<Truncation>,
    /// Emails whose recipient list held several distinct disposable addresses.
    pub ambiguous_emails: usize,
}

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No inbox recipient belongs to a protection domain; nothing else was queried.
    NoDisposableFound {
        /// Set when the inbox scan did not cover every thread.
        inbox_truncation: Option<Truncation>,
    },
    /// Disposable addresses were found.
    Found(Report),
}

/// Runs every stage against the account behind `client`.
///
/// # Errors
///
/// Returns the first error of any stage; no partial result is produced.
pub async fn run<T: Transport>(client: &JmapClient<T>, config: &LinterConfig) -> Result<Outcome> {
    let mailboxes = resolve_mailboxes(client).await?;

    let inbox = fetch_inbox_recipients(client, &mailboxes, config.inbox_limit).await?;
    let inbox_truncation = Truncation::of(&inbox);

    let (disposable, ambiguous_emails) = classify_records(&inbox.records, &config.domains);
    if disposable.is_empty() {
        info!("no disposable addresses found in the inbox");
        return Ok(Outcome::NoDisposableFound { inbox_truncation });
    }
    debug!(
        "{} disposable addresses found: {}",
        disposable.len(),
        disposable.iter().collect::<Vec<_>>().join(", ")
    );

    let found = fetch_non_spam(client, &mailboxes, &disposable, config.search_limit).await?;
    let search_truncation = Truncation::of(&found);

    let senders = aggregate(&found.records, &disposable);
    Ok(Outcome::Found(Report {
        disposable,
        senders,
        inbox_truncation,
        search_truncation,
        ambiguous_emails,
    }))
}

/// Fetches the recipient headers of the newest inbox threads.
///
/// # Errors
///
/// Returns an error if the batch fails.
pub async fn fetch_inbox_recipients<T: Transport>(
    client: &JmapClient<T>,
    mailboxes: &MailboxPair,
    limit: u32,
) -> Result<QueryEnvelope<Email>> {
    let options = QueryOptions::emails().with_limit(limit);
    Ok(client
        .query_emails(&Filter::in_mailbox(&mailboxes.inbox), RECIPIENT_PROPERTIES, &options)
        .await?)
}

/// Classifies every recipient list of every record.
///
/// Returns the disposable set and the number of emails with an ambiguous
/// recipient list.
#[must_use]
pub fn classify_records(records: &[Email], domains: &DomainSet) -> (DisposableSet, usize) {
    let mut ambiguous = 0;
    let mut found = Vec::new();

    for email in records {
        let mut email_ambiguous = false;
        for list in email.recipient_lists() {
            let classification = classify(list, domains);
            email_ambiguous |= classification.is_ambiguous();
            found.extend(classification.into_addresses());
        }
        if email_ambiguous {
            ambiguous += 1;
        }
    }

    (found.into_iter().collect(), ambiguous)
}

/// Filter for emails outside spam sent to any of the disposable addresses.
#[must_use]
pub fn sender_filter(spam: &str, disposable: &DisposableSet) -> Filter {
    let recipients = disposable
        .iter()
        .flat_map(|address| [Filter::to(address), Filter::cc(address), Filter::bcc(address)])
        .collect();
    Filter::and(vec![
        Filter::in_mailbox_other_than([spam]),
        Filter::or(recipients),
    ])
}

/// Fetches the recipient and sender headers of non-spam emails to disposable addresses.
///
/// # Errors
///
/// Returns an error if the batch fails.
pub async fn fetch_non_spam<T: Transport>(
    client: &JmapClient<T>,
    mailboxes: &MailboxPair,
    disposable: &DisposableSet,
    limit: u32,
) -> Result<QueryEnvelope<Email>> {
    let options = QueryOptions::emails().with_limit(limit);
    Ok(client
        .query_emails(&sender_filter(&mailboxes.spam, disposable), SENDER_PROPERTIES, &options)
        .await?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use email_linter_jmap::EmailAddress;
    use serde_json::json;

    fn to(addresses: &[&str]) -> Email {
        Email {
            to: addresses.iter().map(|a| EmailAddress::new(*a)).collect(),
            ..Email::default()
        }
    }

    #[test]
    fn test_classify_records_unions_and_counts_ambiguity() {
        let mut cc_only = Email::default();
        cc_only.cc = vec![EmailAddress::new("Y@mozmail.com")];
        let records = vec![
            to(&["x@duck.com"]),
            to(&["x@duck.com", "me@example.com"]),
            to(&["a@duck.com", "b@icloud.com"]),
            cc_only,
        ];
        let (set, ambiguous) = classify_records(&records, &DomainSet::default());
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec!["a@duck.com", "b@icloud.com", "x@duck.com", "y@mozmail.com"]
        );
        assert_eq!(ambiguous, 1);
    }

    #[test]
    fn test_classify_records_empty() {
        let (set, ambiguous) = classify_records(&[to(&["me@example.com"])], &DomainSet::default());
        assert!(set.is_empty());
        assert_eq!(ambiguous, 0);
    }

    #[test]
    fn test_sender_filter() {
        let disposable: DisposableSet = ["x@duck.com"].into_iter().collect();
        let value = serde_json::to_value(sender_filter("spam-id", &disposable)).unwrap();
        assert_eq!(
            value,
            json!({
                "operator": "AND",
                "conditions": [
                    {"inMailboxOtherThan": ["spam-id"]},
                    {"operator": "OR", "conditions": [
                        {"to": "x@duck.com"},
                        {"cc": "x@duck.com"},
                        {"bcc": "x@duck.com"}
                    ]}
                ]
            })
        );
    }

    #[test]
    fn test_truncation_of() {
        let envelope = QueryEnvelope {
            records: vec![Email::default()],
            total: 4,
        };
        assert_eq!(
            Truncation::of(&envelope),
            Some(Truncation {
                retrieved: 1,
                total: 4
            })
        );
        let complete = QueryEnvelope::<Email> {
            records: Vec::new(),
            total: 0,
        };
        assert_eq!(Truncation::of(&complete), None);
    }
}
