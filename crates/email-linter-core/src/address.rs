//! Address normalisation and protection-domain matching.

use crate::config::DomainSet;

/// Marker a forwarding provider puts between an alias and the address it embeds.
const EMBEDDED_AT: &str = "_at_";

/// Canonical form of an address: lower case.
#[must_use]
pub fn normalize(address: &str) -> String {
    address.to_lowercase()
}

/// Text after the final `@`, or `None` if there is no `@`.
#[must_use]
pub fn domain_of(address: &str) -> Option<&str> {
    address.rsplit_once('@').map(|(_, domain)| domain)
}

/// True iff the domain of the lower-cased address is in `domains`.
#[must_use]
pub fn is_disposable(address: &str, domains: &DomainSet) -> bool {
    let address = normalize(address);
    domain_of(&address).is_some_and(|domain| domains.contains(domain))
}

/// Undoes a provider rewrite of `<base>_at_<suffix>` to `<suffix>`.
///
/// Returns `None` when the local part has no embedded address.
#[must_use]
pub fn collapse_embedded(address: &str) -> Option<&str> {
    let (local, _) = address.rsplit_once('@')?;
    let (base, _) = local.rsplit_once(EMBEDDED_AT)?;
    if base.is_empty() {
        return None;
    }
    let suffix = &address[base.len() + EMBEDDED_AT.len()..];
    (!suffix.starts_with('@')).then_some(suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_of_uses_last_at() {
        assert_eq!(domain_of("a@b@duck.com"), Some("duck.com"));
        assert_eq!(domain_of("nobody"), None);
        assert_eq!(domain_of("trailing@"), Some(""));
    }

    #[test]
    fn test_is_disposable() {
        let domains = DomainSet::default();
        assert!(is_disposable("X@Duck.COM", &domains));
        assert!(is_disposable("abc@mozmail.com", &domains));
        assert!(!is_disposable("abc@sub.duck.com", &domains));
        assert!(!is_disposable("abc@gmail.com", &domains));
        assert!(!is_disposable("duck.com", &domains));
    }

    #[test]
    fn test_collapse_embedded() {
        assert_eq!(collapse_embedded("a_at_b@mask.com"), Some("b@mask.com"));
        assert_eq!(
            collapse_embedded("user_at_mask.com@duck.com"),
            Some("mask.com@duck.com")
        );
        assert_eq!(collapse_embedded("plain@duck.com"), None);
        assert_eq!(collapse_embedded("_at_b@duck.com"), None);
        assert_eq!(collapse_embedded("a_at_@duck.com"), None);
    }
}
