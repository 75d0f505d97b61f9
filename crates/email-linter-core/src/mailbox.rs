//! Inbox and spam mailbox resolution.

use email_linter_jmap::{Filter, JmapClient, Mailbox, Transport};
use tracing::debug;

use crate::error::{Error, Result};

const INBOX_ROLES: &[&str] = &["inbox"];
const INBOX_NAMES: &[&str] = &["inbox"];
const SPAM_ROLES: &[&str] = &["junk"];
const SPAM_NAMES: &[&str] = &["spam", "junk"];

/// Ids of the two mailboxes the pipeline needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailboxPair {
    /// Inbox mailbox id.
    pub inbox: String,
    /// Spam (junk) mailbox id.
    pub spam: String,
}

/// Filter selecting every mailbox that could be the inbox or the spam folder.
#[must_use]
pub fn candidate_filter() -> Filter {
    let roles = INBOX_ROLES.iter().chain(SPAM_ROLES).map(|r| Filter::role(*r));
    let names = INBOX_NAMES.iter().chain(SPAM_NAMES).map(|n| Filter::name(*n));
    Filter::or(roles.chain(names).collect())
}

/// Picks the inbox and spam mailboxes, by role first and then by name.
///
/// Comparisons ignore case.
///
/// # Errors
///
/// Returns [`Error::MailboxResolution`] if either mailbox is missing or both
/// resolve to the same mailbox.
pub fn resolve(mailboxes: &[Mailbox]) -> Result<MailboxPair> {
    let inbox = find(mailboxes, INBOX_ROLES, INBOX_NAMES)
        .ok_or_else(|| Error::MailboxResolution("no inbox mailbox found".into()))?;
    let spam = find(mailboxes, SPAM_ROLES, SPAM_NAMES)
        .ok_or_else(|| Error::MailboxResolution("no spam mailbox found".into()))?;

    if inbox.id == spam.id {
        return Err(Error::MailboxResolution(format!(
            "mailbox {} matched both inbox and spam",
            inbox.id
        )));
    }

    Ok(MailboxPair {
        inbox: inbox.id.clone(),
        spam: spam.id.clone(),
    })
}

fn find<'a>(mailboxes: &'a [Mailbox], roles: &[&str], names: &[&str]) -> Option<&'a Mailbox> {
    let by_role = mailboxes.iter().find(|m| {
        m.role
            .as_deref()
            .is_some_and(|role| roles.iter().any(|r| role.eq_ignore_ascii_case(r)))
    });
    by_role.or_else(|| {
        mailboxes
            .iter()
            .find(|m| names.iter().any(|n| m.name.eq_ignore_ascii_case(n)))
    })
}

/// Queries the server for the inbox and spam mailboxes.
///
/// # Errors
///
/// Returns an error if the query fails or the pair cannot be resolved.
pub async fn resolve_mailboxes<T: Transport>(client: &JmapClient<T>) -> Result<MailboxPair> {
    let mailboxes = client.query_mailboxes(&candidate_filter()).await?;
    let pair = resolve(&mailboxes)?;
    debug!("inbox ID: {}", pair.inbox);
    debug!("spam folder ID: {}", pair.spam);
    Ok(pair)
}
