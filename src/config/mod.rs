//! Run configuration
//!
//! Resolves the commit identity and bundles the per-run settings into one
//! immutable struct. Identity precedence:
//! 1. Explicit CLI arguments (highest)
//! 2. `git config user.name` / `user.email`
//! 3. Fixed fallback values
//!
//! The optional GitHub email lookup can override the email on top of that;
//! its failure is never fatal.

use crate::git::GitRepo;
use crate::github;
use tracing::{info, warn};

pub const DEFAULT_TIME: &str = "12:00:00";
pub const DEFAULT_TZ: &str = "Z";
pub const DEFAULT_TEMPLATE: &str = "Restore streak for {date}";

const FALLBACK_NAME: &str = "streakfill";
const FALLBACK_EMAIL: &str = "streakfill@users.noreply.github.com";

/// Commit author/committer identity, resolved once per run.
#[derive(Debug, Clone)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

/// Everything a run needs, immutable after construction.
#[derive(Debug, Clone)]
pub struct BackfillConfig {
    pub identity: Identity,
    pub template: String,
    pub time: String,
    pub tz: String,
    pub push: bool,
    pub dry_run: bool,
}

/// Resolve the identity from args, git config, and fallbacks, optionally
/// overriding the email via the GitHub emails API.
pub fn resolve_identity(
    name: Option<String>,
    email: Option<String>,
    repo: &GitRepo,
    lookup_email: bool,
) -> Identity {
    let name = name
        .or_else(|| repo.config_get("user.name"))
        .unwrap_or_else(|| FALLBACK_NAME.to_string());
    let mut email = email
        .or_else(|| repo.config_get("user.email"))
        .unwrap_or_else(|| FALLBACK_EMAIL.to_string());

    if lookup_email {
        match github::lookup_from_env() {
            Ok(found) => {
                info!(email = %found, "using verified email from GitHub");
                email = found;
            }
            Err(e) => warn!("email lookup failed, keeping {email}: {e}"),
        }
    }

    Identity { name, email }
}
