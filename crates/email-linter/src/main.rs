//! `email-linter` - finds spam and phishing emails received at disposable addresses
//!
//! Scans the inbox of a JMAP account for recipients at email protection
//! services, then lists who else has been sending to those addresses outside
//! the spam folder.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod output;

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use email_linter_core::credentials::{
    TOKEN_ENV_VAR, delete_token, find_token, store_token, token_file_path,
};
use email_linter_core::{DEFAULT_DOMAINS, DomainSet, LinterConfig, Outcome, run};
use email_linter_jmap::DEFAULT_SESSION_URL;
use email_linter_jmap::query::DEFAULT_LIMIT;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Find spam and phishing emails received at disposable email addresses
#[derive(Parser, Debug)]
#[command(name = "email-linter")]
#[command(about = "Find spam and phishing emails received at disposable email addresses", long_about = None)]
#[command(version)]
struct Cli {
    /// Display extra info while running
    #[arg(long, global = true)]
    verbose: bool,

    /// The API URL to request a session from
    #[arg(long, default_value = DEFAULT_SESSION_URL)]
    url: String,

    /// Email protection service domains to search for
    #[arg(short, long, default_value = DEFAULT_DOMAINS)]
    domains: String,

    /// Print output as JSON
    #[arg(short, long)]
    json: bool,

    /// Most senders to list per address before printing a count instead
    #[arg(short = 'f', long, default_value_t = 10)]
    max_from: usize,

    /// Most emails to fetch per query
    #[arg(short, long, default_value_t = DEFAULT_LIMIT)]
    limit: u32,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Remove your API token from your system's keyring
    Logout,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "email_linter=debug,email_linter_core=debug,email_linter_jmap=debug"
    } else {
        "email_linter=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match cli.command {
        Some(Commands::Logout) => {
            delete_token().context("failed to remove the API token")?;
            info!("API token removed from the keyring");
            Ok(())
        }
        None => lint(&cli).await,
    }
}

async fn lint(cli: &Cli) -> anyhow::Result<()> {
    let domains = DomainSet::parse(&cli.domains)?;
    let config = LinterConfig::new(domains).with_limit(cli.limit);
    debug!("searching for addresses at: {}", config.domains);

    let token = api_token()?;
    let client = email_linter_jmap::connect(&cli.url, &token)
        .await
        .with_context(|| format!("failed to start a session at {}", cli.url))?;

    let report = match run(&client, &config).await? {
        Outcome::NoDisposableFound { inbox_truncation } => {
            if let Some(t) = inbox_truncation {
                eprintln!("{}", output::inbox_notice(t));
            }
            eprintln!("No disposable addresses found in your inbox");
            return Ok(());
        }
        Outcome::Found(report) => report,
    };

    let mut stdout = io::stdout().lock();
    if cli.json {
        output::write_json(&mut stdout, &report.senders)?;
    } else {
        output::write_text(&mut stdout, &report, cli.max_from)?;
    }
    stdout.flush()?;

    for line in output::notices(&report) {
        eprintln!("{line}");
    }
    Ok(())
}

/// Finds a stored API token or asks for one and saves it in the keyring.
fn api_token() -> anyhow::Result<String> {
    if let Some((token, _)) = find_token()? {
        return Ok(token);
    }

    eprint!("{}", token_prompt(token_file_path().as_deref()));
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let token = line.trim().to_string();
    if token.is_empty() {
        bail!("no API token entered");
    }

    if let Err(e) = store_token(&token) {
        warn!("Could not save the API token in the keyring: {e}");
    }
    Ok(token)
}

/// Instructions shown when no API token is stored anywhere.
fn token_prompt(token_file: Option<&Path>) -> String {
    let mut prompt = String::from("Create a read-only JMAP API token and either:\n");
    if let Some(path) = token_file {
        prompt.push_str(&format!("  * put it in a file named {}\n", path.display()));
    }
    prompt.push_str(&format!(
        "  * or put it in an environment variable named {TOKEN_ENV_VAR}\n  * or enter the token here: "
    ));
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["email-linter"]);
        assert_eq!(cli.url, DEFAULT_SESSION_URL);
        assert_eq!(cli.domains, "duck.com mozmail.com icloud.com");
        assert_eq!(cli.max_from, 10);
        assert_eq!(cli.limit, 100);
        assert!(!cli.json);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from([
            "email-linter",
            "-j",
            "-f",
            "3",
            "-l",
            "50",
            "-d",
            "duck.com",
            "--verbose",
        ]);
        assert!(cli.json);
        assert!(cli.verbose);
        assert_eq!(cli.max_from, 3);
        assert_eq!(cli.limit, 50);
        assert_eq!(cli.domains, "duck.com");
    }

    #[test]
    fn test_logout_subcommand() {
        let cli = Cli::parse_from(["email-linter", "logout"]);
        assert!(matches!(cli.command, Some(Commands::Logout)));
    }

    #[test]
    fn test_token_prompt_names_lookup_locations() {
        let path = Path::new("/home/me/.config/email-linter/jmap_token");
        let prompt = token_prompt(Some(path));
        assert!(prompt.contains(&format!("file named {}\n", path.display())));
        assert!(prompt.contains("JMAP_TOKEN"));
        assert!(prompt.ends_with("enter the token here: "));

        let without_file = token_prompt(None);
        assert!(!without_file.contains("file named"));
        assert!(without_file.contains("JMAP_TOKEN"));
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
