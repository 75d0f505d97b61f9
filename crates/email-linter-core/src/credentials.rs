//! API token lookup and secure storage using the system keyring.
//!
//! The token is looked up in this order:
//! 1. `<config dir>/email-linter/jmap_token`
//! 2. the `JMAP_TOKEN` environment variable
//! 3. the platform's native credential storage
//!    - Linux: Secret Service (GNOME Keyring, `KWallet`)
//!    - macOS: Keychain
//!    - Windows: Credential Manager

use std::io;
use std::path::{Path, PathBuf};

use keyring::Entry;
use tracing::{debug, warn};

/// Service name used for keyring entries.
const SERVICE_NAME: &str = "email-linter";

/// Keyring user the API token is stored under.
const TOKEN_USER: &str = "jmap_token";

/// Environment variable holding the API token.
pub const TOKEN_ENV_VAR: &str = "JMAP_TOKEN";

/// Error type for credential operations.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// Failed to access keyring.
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

/// Result type for credential operations.
pub type CredentialResult<T> = std::result::Result<T, CredentialError>;

/// Where a token was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    /// The token file in the config directory.
    File,
    /// The `JMAP_TOKEN` environment variable.
    Environment,
    /// The system keyring.
    Keyring,
}

/// Default location of the token file.
#[must_use]
pub fn token_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("email-linter").join("jmap_token"))
}

/// Reads a token file.
///
/// Missing or empty files yield `None`; other read errors are logged and
/// also yield `None`.
#[must_use]
pub fn read_token_file(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => non_empty(&contents),
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => {
            warn!("Failed to read {}: {e}", path.display());
            None
        }
    }
}

/// Picks the first available token: file, then environment, then keyring.
///
/// The keyring is only consulted when the other two are empty.
///
/// # Errors
///
/// Returns an error if the keyring lookup fails.
pub fn resolve_token<F>(
    file_token: Option<String>,
    env_token: Option<String>,
    keyring_token: F,
) -> CredentialResult<Option<(String, TokenSource)>>
where
    F: FnOnce() -> CredentialResult<Option<String>>,
{
    if let Some(token) = file_token.as_deref().and_then(non_empty) {
        return Ok(Some((token, TokenSource::File)));
    }
    if let Some(token) = env_token.as_deref().and_then(non_empty) {
        return Ok(Some((token, TokenSource::Environment)));
    }
    Ok(keyring_token()?
        .as_deref()
        .and_then(non_empty)
        .map(|token| (token, TokenSource::Keyring)))
}

/// Looks the token up in the default locations.
///
/// # Errors
///
/// Returns an error if the keyring lookup fails.
pub fn find_token() -> CredentialResult<Option<(String, TokenSource)>> {
    let file_token = token_file_path().and_then(|path| read_token_file(&path));
    let env_token = std::env::var(TOKEN_ENV_VAR).ok();
    let found = resolve_token(file_token, env_token, get_token)?;
    if let Some((_, source)) = &found {
        debug!("Using API token from {source:?}");
    }
    Ok(found)
}

/// Stores the API token securely in the system keyring.
///
/// # Errors
///
/// Returns an error if the keyring operation fails.
pub fn store_token(token: &str) -> CredentialResult<()> {
    let entry = Entry::new(SERVICE_NAME, TOKEN_USER)?;
    entry.set_password(token)?;
    debug!("Stored API token in the keyring");
    Ok(())
}

/// Retrieves the API token from the system keyring.
///
/// # Errors
///
/// Returns an error if the keyring operation fails.
pub fn get_token() -> CredentialResult<Option<String>> {
    let entry = Entry::new(SERVICE_NAME, TOKEN_USER)?;
    match entry.get_password() {
        Ok(token) => Ok(Some(token)),
        Err(keyring::Error::NoEntry) => {
            debug!("No API token found in the keyring");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Deletes the API token from the system keyring.
///
/// # Errors
///
/// Returns an error if the keyring operation fails (except for missing entries).
pub fn delete_token() -> CredentialResult<()> {
    let entry = Entry::new(SERVICE_NAME, TOKEN_USER)?;
    match entry.delete_credential() {
        Ok(()) => {
            debug!("Deleted API token from the keyring");
            Ok(())
        }
        Err(keyring::Error::NoEntry) => {
            debug!("No API token to delete");
            Ok(())
        }
        Err(e) => {
            warn!("Failed to delete API token: {e}");
            Err(e.into())
        }
    }
}

fn non_empty(token: &str) -> Option<String> {
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}
