//! Linter configuration.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use email_linter_jmap::query::DEFAULT_LIMIT;

use crate::error::{Error, Result};

/// Protection-service domains checked when no others are configured.
pub const DEFAULT_DOMAINS: &str = "duck.com mozmail.com icloud.com";

/// Domains of address-protection (masking) services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainSet(BTreeSet<String>);

impl DomainSet {
    /// Parses a space-delimited list of domains.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the list contains no domain.
    pub fn parse(domains: &str) -> Result<Self> {
        let set: BTreeSet<String> = domains
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();
        if set.is_empty() {
            return Err(Error::Config("no email protection domains given".into()));
        }
        Ok(Self(set))
    }

    /// Exact, case-sensitive membership. Callers pass lower-cased domains.
    #[must_use]
    pub fn contains(&self, domain: &str) -> bool {
        self.0.contains(domain)
    }

    /// Iterates the domains in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for DomainSet {
    fn default() -> Self {
        Self(DEFAULT_DOMAINS.split_whitespace().map(str::to_string).collect())
    }
}

impl FromStr for DomainSet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for DomainSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let domains: Vec<&str> = self.iter().collect();
        write!(f, "{}", domains.join(" "))
    }
}

/// Everything one pipeline run needs besides the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinterConfig {
    /// Protection-service domains.
    pub domains: DomainSet,
    /// Page size of the inbox recipient query.
    pub inbox_limit: u32,
    /// Page size of the sender query.
    pub search_limit: u32,
}

impl LinterConfig {
    /// Creates a configuration with default page sizes.
    #[must_use]
    pub const fn new(domains: DomainSet) -> Self {
        Self {
            domains,
            inbox_limit: DEFAULT_LIMIT,
            search_limit: DEFAULT_LIMIT,
        }
    }

    /// Sets both page sizes.
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.inbox_limit = limit;
        self.search_limit = limit;
        self
    }
}

impl Default for LinterConfig {
    fn default() -> Self {
        Self::new(DomainSet::default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_domains() {
        let set = DomainSet::parse("  Duck.com   mozmail.com\tduck.com ").unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["duck.com", "mozmail.com"]);
        assert!(set.contains("duck.com"));
        assert!(!set.contains("Duck.com"));
    }

    #[test]
    fn test_parse_empty_domains() {
        assert!(matches!(DomainSet::parse("   "), Err(Error::Config(_))));
    }

    #[test]
    fn test_default_domains() {
        let set = DomainSet::default();
        assert_eq!(set.to_string(), "duck.com icloud.com mozmail.com");
        assert_eq!(set, DEFAULT_DOMAINS.parse().unwrap());
    }

    #[test]
    fn test_config_limits() {
        let config = LinterConfig::default().with_limit(25);
        assert_eq!(config.inbox_limit, 25);
        assert_eq!(config.search_limit, 25);
    }
}
