//! Disposable-address classification of a single recipient list.

use email_linter_jmap::EmailAddress;
use tracing::warn;

use crate::address::{collapse_embedded, is_disposable, normalize};
use crate::config::DomainSet;

/// Disposable addresses found in one recipient list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    addresses: Vec<String>,
}

impl Classification {
    /// The disposable addresses, lower-cased.
    #[must_use]
    pub fn addresses(&self) -> &[String] {
        &self.addresses
    }

    /// Consumes the classification, returning the addresses.
    #[must_use]
    pub fn into_addresses(self) -> Vec<String> {
        self.addresses
    }

    /// True if no recipient was disposable.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    /// More than one distinct disposable address survived disambiguation.
    #[must_use]
    pub fn is_ambiguous(&self) -> bool {
        self.addresses.len() > 1
    }
}

/// Finds the disposable addresses in one header's recipient list.
///
/// When several recipients look disposable, provider rewrites of the form
/// `<alias>_at_<address>` are collapsed to `<address>` before deduplication.
/// Distinct addresses that remain are all kept and logged as ambiguous.
#[must_use]
pub fn classify(recipients: &[EmailAddress], domains: &DomainSet) -> Classification {
    let mut candidates: Vec<String> = recipients
        .iter()
        .map(|recipient| normalize(&recipient.email))
        .filter(|address| is_disposable(address, domains))
        .collect();

    if candidates.len() > 1 {
        candidates = candidates
            .iter()
            .map(|address| collapse_embedded(address).unwrap_or(address.as_str()).to_string())
            .collect();
        candidates.sort_unstable();
        candidates.dedup();

        if candidates.len() > 1 {
            warn!(
                "one email reached {} disposable addresses: {}",
                candidates.len(),
                candidates.join(", ")
            );
        }
    }

    Classification {
        addresses: candidates,
    }
}
