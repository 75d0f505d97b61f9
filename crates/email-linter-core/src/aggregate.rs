//! Reverse index from disposable addresses to the senders that reached them.

use std::collections::{BTreeMap, BTreeSet};

use email_linter_jmap::Email;
use serde::Serialize;

use crate::address::normalize;

/// Sorted, deduplicated set of lower-cased disposable addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DisposableSet(BTreeSet<String>);

impl DisposableSet {
    /// True if the (already lower-cased) address is in the set.
    #[must_use]
    pub fn contains(&self, address: &str) -> bool {
        self.0.contains(address)
    }

    /// Number of addresses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no address was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Addresses in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for DisposableSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(|a| normalize(a.as_ref())).collect())
    }
}

/// Disposable address → sorted, deduplicated sender addresses.
///
/// Every key is a member of the [`DisposableSet`] the index was built from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SenderIndex(BTreeMap<String, Vec<String>>);

impl SenderIndex {
    /// Senders of one disposable address, or an empty slice.
    #[must_use]
    pub fn senders(&self, address: &str) -> &[String] {
        self.0.get(address).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of disposable addresses with at least one sender.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no sender was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

/// Builds the sender index for the given records.
///
/// Every sender of a record is credited to every disposable recipient of
/// that record, across `to`, `cc` and `bcc`. The result does not depend on
/// record order.
pub fn aggregate<'a, I>(records: I, disposable: &DisposableSet) -> SenderIndex
where
    I: IntoIterator<Item = &'a Email>,
{
    let mut index: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for email in records {
        if email.from.is_empty() {
            continue;
        }
        let senders: Vec<String> = email.from.iter().map(|s| normalize(&s.email)).collect();

        for recipient in email.recipient_lists().into_iter().flatten() {
            let address = normalize(&recipient.email);
            if disposable.contains(&address) {
                index.entry(address).or_default().extend_from_slice(&senders);
            }
        }
    }

    for senders in index.values_mut() {
        senders.sort_unstable();
        senders.dedup();
    }
    SenderIndex(index)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use email_linter_jmap::EmailAddress;
    use proptest::collection::vec;
    use proptest::prelude::*;

    fn email(to: &[&str], cc: &[&str], from: &[&str]) -> Email {
        Email {
            to: to.iter().map(|a| EmailAddress::new(*a)).collect(),
            cc: cc.iter().map(|a| EmailAddress::new(*a)).collect(),
            from: from.iter().map(|a| EmailAddress::new(*a)).collect(),
            ..Email::default()
        }
    }

    #[test]
    fn test_disposable_set_sorted_and_lowercased() {
        let set: DisposableSet = ["b@duck.com", "A@duck.com", "a@duck.com"].into_iter().collect();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["a@duck.com", "b@duck.com"]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_aggregate_basic() {
        let disposable: DisposableSet = ["x@duck.com"].into_iter().collect();
        let records = vec![
            email(&["X@duck.com"], &[], &["Spammer@Evil.com"]),
            email(&["me@example.com"], &["x@duck.com"], &["friend@example.com"]),
            email(&["x@duck.com"], &[], &["spammer@evil.com"]),
        ];
        let index = aggregate(&records, &disposable);
        assert_eq!(
            index.senders("x@duck.com"),
            ["friend@example.com", "spammer@evil.com"]
        );
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_aggregate_skips_unknown_recipients_and_empty_from() {
        let disposable: DisposableSet = ["x@duck.com"].into_iter().collect();
        let records = vec![
            email(&["y@duck.com"], &[], &["a@b.com"]),
            email(&["x@duck.com"], &[], &[]),
        ];
        let index = aggregate(&records, &disposable);
        assert!(index.is_empty());
        assert!(index.senders("x@duck.com").is_empty());
    }

    #[test]
    fn test_sender_index_json() {
        let disposable: DisposableSet = ["x@duck.com"].into_iter().collect();
        let records = vec![email(&["x@duck.com"], &[], &["spammer@evil.com"])];
        let json = serde_json::to_string(&aggregate(&records, &disposable)).unwrap();
        assert_eq!(json, r#"{"x@duck.com":["spammer@evil.com"]}"#);
    }

    fn address() -> impl Strategy<Value = &'static str> {
        prop::sample::select(vec![
            "a@duck.com",
            "A@Duck.com",
            "b@mozmail.com",
            "c@icloud.com",
            "me@example.com",
            "spam@evil.com",
            "SPAM@evil.com",
            "news@shop.example",
        ])
    }

    fn record() -> impl Strategy<Value = Email> {
        (
            vec(address(), 0..3),
            vec(address(), 0..2),
            vec(address(), 0..2),
            vec(address(), 0..3),
        )
            .prop_map(|(to, cc, bcc, from)| {
                let list = |v: Vec<&str>| -> Vec<EmailAddress> {
                    v.into_iter().map(EmailAddress::new).collect()
                };
                Email {
                    id: None,
                    to: list(to),
                    cc: list(cc),
                    bcc: list(bcc),
                    from: list(from),
                }
            })
    }

    fn records_and_shuffle() -> impl Strategy<Value = (Vec<Email>, Vec<Email>)> {
        vec(record(), 0..12).prop_flat_map(|records| {
            let shuffled = Just(records.clone()).prop_shuffle();
            (Just(records), shuffled)
        })
    }

    fn disposable() -> DisposableSet {
        ["a@duck.com", "b@mozmail.com", "c@icloud.com"].into_iter().collect()
    }

    proptest! {
        #[test]
        fn prop_aggregate_is_order_independent((records, shuffled) in records_and_shuffle()) {
            let set = disposable();
            prop_assert_eq!(aggregate(&records, &set), aggregate(&shuffled, &set));
        }

        #[test]
        fn prop_aggregate_is_idempotent(records in vec(record(), 0..12)) {
            let set = disposable();
            let doubled: Vec<Email> = records.iter().chain(records.iter()).cloned().collect();
            prop_assert_eq!(aggregate(&records, &set), aggregate(&doubled, &set));
        }

        #[test]
        fn prop_index_sorted_deduplicated_and_closed(records in vec(record(), 0..12)) {
            let set = disposable();
            let index = aggregate(&records, &set);
            for (key, senders) in index.iter() {
                prop_assert!(set.contains(key));
                prop_assert!(senders.windows(2).all(|w| w[0] < w[1]));
                prop_assert!(senders.iter().all(|s| *s == s.to_lowercase()));
            }
        }

        #[test]
        fn prop_disposable_set_is_order_independent(
            (addresses, shuffled) in vec(address(), 0..10)
                .prop_flat_map(|a| (Just(a.clone()), Just(a).prop_shuffle()))
        ) {
            let first: DisposableSet = addresses.into_iter().collect();
            let second: DisposableSet = shuffled.into_iter().collect();
            let sorted: Vec<&str> = first.iter().collect();
            prop_assert!(sorted.windows(2).all(|w| w[0] < w[1]));
            prop_assert_eq!(first, second);
        }
    }
}
