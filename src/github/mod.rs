//! GitHub email lookup
//!
//! Optional identity source: an authenticated GET of the `/user/emails`
//! endpoint, picking the address GitHub itself considers canonical. Uses
//! ureq (sync HTTP) — no async runtime needed. Every failure here is
//! non-fatal; the caller degrades to the identity it already resolved.

use serde::Deserialize;
use thiserror::Error;

/// Bearer token environment variable for the lookup.
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

const EMAILS_URL: &str = "https://api.github.com/user/emails";

/// Errors from the email lookup. Callers log these and move on.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("GITHUB_TOKEN is not set")]
    MissingToken,

    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("failed to parse API response: {0}")]
    ParseError(String),

    #[error("no verified email on the account")]
    NoVerifiedEmail,
}

/// One record from the emails endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailEntry {
    pub email: String,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub verified: bool,
}

fn make_agent() -> ureq::Agent {
    ureq::config::Config::builder()
        .http_status_as_error(false) // status codes handled explicitly below
        .timeout_global(Some(std::time::Duration::from_secs(30)))
        .build()
        .new_agent()
}

/// First entry that is both primary and verified, else the first verified.
pub fn select_email(entries: &[EmailEntry]) -> Option<&str> {
    entries
        .iter()
        .find(|e| e.primary && e.verified)
        .or_else(|| entries.iter().find(|e| e.verified))
        .map(|e| e.email.as_str())
}

/// Fetch the canonical verified email using the token from the environment.
pub fn lookup_from_env() -> Result<String, LookupError> {
    let token = std::env::var(TOKEN_ENV).map_err(|_| LookupError::MissingToken)?;
    lookup_verified_email(&token)
}

/// Fetch the account's canonical verified email address.
pub fn lookup_verified_email(token: &str) -> Result<String, LookupError> {
    let agent = make_agent();
    let response = agent
        .get(EMAILS_URL)
        .header("Authorization", &format!("Bearer {token}"))
        .header("Accept", "application/vnd.github+json")
        .header("User-Agent", concat!("streakfill/", env!("CARGO_PKG_VERSION")))
        .call()
        .map_err(|e| LookupError::RequestFailed(e.to_string()))?;

    let status = response.status().as_u16();
    if status >= 400 {
        let message = response.into_body().read_to_string().unwrap_or_default();
        return Err(LookupError::ApiError { status, message });
    }

    let entries: Vec<EmailEntry> = response
        .into_body()
        .read_json()
        .map_err(|e| LookupError::ParseError(e.to_string()))?;

    select_email(&entries)
        .map(str::to_string)
        .ok_or(LookupError::NoVerifiedEmail)
}
