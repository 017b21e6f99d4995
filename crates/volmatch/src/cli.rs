//! CLI command definitions.

use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use volmatch_client::GridDbClient;
use volmatch_core::codec::DecodePolicy;
use volmatch_core::registration::RegistrationError;
use volmatch_core::storage::{StoreError, StoreGateway};

use crate::config::{Settings, SettingsError};
use crate::storage::inmemory::InMemoryGateway;

/// Operator CLI for the volunteer-matching store.
#[derive(Debug, Parser)]
#[command(name = "volmatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Output format.
    #[arg(long, global = true, default_value = "json")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Store connection arguments. Each falls back to its environment variable.
#[derive(Debug, Args)]
pub struct StoreArgs {
    /// Database endpoint, e.g. https://cloud1.griddb.com/griddb/v2/gs_cluster/dbs/db1
    #[arg(long, global = true, env = "GRIDDB_BASE_URL")]
    pub base_url: Option<String>,

    /// Pre-encoded Basic token (base64 of user:password).
    #[arg(long, global = true, env = "GRIDDB_AUTH_TOKEN", hide_env_values = true)]
    pub auth_token: Option<String>,

    #[arg(long, global = true, env = "GRIDDB_USERNAME")]
    pub username: Option<String>,

    #[arg(long, global = true, env = "GRIDDB_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Connect timeout in seconds.
    #[arg(long, global = true, env = "GRIDDB_CONNECT_TIMEOUT_SECS", default_value_t = 5)]
    pub connect_timeout_secs: u64,

    /// Whole-request timeout in seconds.
    #[arg(long, global = true, env = "GRIDDB_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// How to treat rows with fields that fail to decode: lenient or strict.
    #[arg(long, global = true, env = "VOLMATCH_DECODE_POLICY", default_value = "lenient")]
    pub decode_policy: DecodePolicy,

    /// Use a throwaway in-memory store instead of the configured one.
    #[arg(long, global = true)]
    pub in_memory: bool,
}

impl StoreArgs {
    /// Resolves the arguments into validated [`Settings`].
    ///
    /// Goes through [`Settings::from_lookup`] so the flags follow the same
    /// rules as the environment variables they stand in for.
    pub fn settings(&self) -> Result<Settings, SettingsError> {
        Settings::from_lookup(|name| self.lookup(name))
    }

    fn lookup(&self, name: &str) -> Option<String> {
        match name {
            "GRIDDB_BASE_URL" => self.base_url.clone(),
            "GRIDDB_AUTH_TOKEN" => self.auth_token.clone(),
            "GRIDDB_USERNAME" => self.username.clone(),
            "GRIDDB_PASSWORD" => self.password.clone(),
            "GRIDDB_CONNECT_TIMEOUT_SECS" => Some(self.connect_timeout_secs.to_string()),
            "GRIDDB_REQUEST_TIMEOUT_SECS" => Some(self.request_timeout_secs.to_string()),
            "VOLMATCH_DECODE_POLICY" => Some(
                match self.decode_policy {
                    DecodePolicy::Lenient => "lenient",
                    DecodePolicy::Strict => "strict",
                }
                .to_string(),
            ),
            _ => None,
        }
    }

    /// Builds the gateway the commands run against.
    pub fn gateway(&self) -> anyhow::Result<Arc<dyn StoreGateway>> {
        if self.in_memory {
            tracing::warn!("Using an in-memory store; nothing is persisted");
            return Ok(Arc::new(InMemoryGateway::new()));
        }
        let settings = self.settings()?;
        Ok(Arc::new(GridDbClient::new(settings.store)?))
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON.
    #[default]
    Json,
    /// Human-readable text.
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Probe store connectivity.
    Check,
    /// Create every container.
    Provision {
        /// Use SQL DDL instead of the container endpoint.
        #[arg(long)]
        sql: bool,
    },
    /// Register a volunteer for an opportunity.
    Register {
        #[arg(long)]
        user: String,
        #[arg(long)]
        opportunity: String,
    },
    /// Approve a pending registration.
    Approve { id: String },
    /// Reject a pending registration.
    Reject { id: String },
    /// List registrations for an organization's opportunities.
    Registrations {
        #[arg(long)]
        org: String,
    },
}

/// Process exit code for an unreachable store.
pub const EXIT_UNREACHABLE: u8 = 2;
/// Process exit code for rejected credentials or permissions.
pub const EXIT_FORBIDDEN: u8 = 3;
/// Process exit code for a refused registration or status change.
pub const EXIT_REJECTED: u8 = 4;

/// Exit code and message for a failed command.
pub fn describe_failure(error: &anyhow::Error) -> (u8, String) {
    let store = error.downcast_ref::<StoreError>().or_else(|| {
        match error.downcast_ref::<RegistrationError>() {
            Some(RegistrationError::Store(store)) => Some(store),
            _ => None,
        }
    });

    match store {
        Some(StoreError::Forbidden { .. }) => (
            EXIT_FORBIDDEN,
            format!("Store access forbidden; check GRIDDB credentials and permissions ({error})"),
        ),
        Some(_) => (1, format!("Store error: {error}")),
        None if error.downcast_ref::<RegistrationError>().is_some() => {
            (EXIT_REJECTED, format!("Rejected: {error}"))
        }
        None => (1, format!("Error: {error:#}")),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use volmatch_client::ConfigError;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_parse_register() {
        let cli = parse(&[
            "volmatch",
            "--base-url",
            "https://x.org/db",
            "--auth-token",
            "dXNlcjpwYXNz",
            "register",
            "--user",
            "usr_1",
            "--opportunity",
            "opp_1",
        ]);

        assert!(matches!(
            cli.command,
            Commands::Register { ref user, ref opportunity } if user == "usr_1" && opportunity == "opp_1"
        ));
        let settings = cli.store.settings().unwrap();
        assert_eq!(settings.store.credentials.header_value(), "Basic dXNlcjpwYXNz");
        assert_eq!(settings.store.connect_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_settings_follow_the_env_rules() {
        let cli = parse(&[
            "volmatch",
            "--base-url",
            "https://x.org/db",
            "--username",
            "user",
            "--password",
            "pass",
            "--decode-policy",
            "strict",
            "--connect-timeout-secs",
            "2",
            "check",
        ]);
        let settings = cli.store.settings().unwrap();
        assert_eq!(settings.store.credentials.header_value(), "Basic dXNlcjpwYXNz");
        assert_eq!(settings.store.connect_timeout, Duration::from_secs(2));
        assert_eq!(settings.decode_policy, DecodePolicy::Strict);

        let cli = parse(&["volmatch", "--base-url", "https://x.org/db", "--username", "user", "check"]);
        assert_eq!(
            cli.store.settings().unwrap_err(),
            SettingsError::Store(ConfigError::Missing("GRIDDB_PASSWORD"))
        );
    }

    #[test]
    fn test_parse_policy_and_timeouts() {
        let cli = parse(&[
            "volmatch",
            "provision",
            "--sql",
            "--decode-policy",
            "strict",
            "--request-timeout-secs",
            "7",
            "--in-memory",
        ]);

        assert!(matches!(cli.command, Commands::Provision { sql: true }));
        assert_eq!(cli.store.decode_policy, DecodePolicy::Strict);
        assert_eq!(cli.store.request_timeout_secs, 7);
        assert!(cli.store.in_memory);
        assert!(cli.store.gateway().is_ok());
    }

    #[test]
    fn test_forbidden_has_its_own_exit_code() {
        let forbidden = anyhow::Error::new(RegistrationError::Store(StoreError::Forbidden {
            body: "denied".to_string(),
        }));
        let fault = anyhow::Error::new(StoreError::Fault {
            status: Some(500),
            body: "boom".to_string(),
        });
        let rejected = anyhow::Error::new(RegistrationError::AlreadyRegistered {
            user_id: "usr_1".to_string(),
            opportunity_id: "opp_1".to_string(),
        });

        let (code, message) = describe_failure(&forbidden);
        assert_eq!(code, EXIT_FORBIDDEN);
        assert!(message.contains("forbidden"));
        assert_eq!(describe_failure(&fault).0, 1);
        assert_eq!(describe_failure(&rejected).0, EXIT_REJECTED);
    }
}
