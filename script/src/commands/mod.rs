//! CLI subcommands.

pub mod deploy;
pub mod networks;
pub mod status;

pub use deploy::DeployCommand;
pub use networks::NetworksCommand;
pub use status::StatusCommand;

use anyhow::{anyhow, Result};
use colored::*;
use ntnft_lib::DeployError;
use std::env;

/// How a command ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// The user declined a confirmation prompt
    Cancelled,
}

impl Outcome {
    /// Closing line printed by the CLI, if any.
    pub fn banner(&self) -> Option<&'static str> {
        match self {
            Self::Completed => Some("Operation completed successfully!"),
            Self::Cancelled => None,
        }
    }
}

/// Extra hint for errors the user can fix by changing arguments.
pub fn error_hint(err: &anyhow::Error) -> Option<&'static str> {
    let err = err.downcast_ref::<DeployError>()?;
    if err.is_not_found() {
        return Some("Check --network, --artifacts-dir and --deployments-dir");
    }
    match err {
        DeployError::InvalidNetworkName(_) => Some("Network names must be a single word"),
        _ => None,
    }
}

/// Expand a `$NAME` argument to the value of that environment variable.
///
/// Anything not starting with `$` is returned unchanged.
pub fn expand_env_vars(input: &str) -> Result<String> {
    let Some(var_name) = input.strip_prefix('$') else {
        return Ok(input.to_string());
    };
    match env::var(var_name) {
        Ok(value) => {
            println!(
                "{} Expanded {} to environment variable value",
                "🔧".bright_green(),
                input
            );
            Ok(value)
        }
        Err(_) => Err(anyhow!("Environment variable {var_name} not found")),
    }
}

/// `0x1234...abcd` style preview of a secret.
pub(crate) fn redact(secret: &str) -> String {
    if secret.len() <= 14 {
        return "*".repeat(secret.len());
    }
    format!("{}...{}", &secret[..8], &secret[secret.len() - 6..])
}
