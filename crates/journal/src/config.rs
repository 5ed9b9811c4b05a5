use std::env;

use chrono::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Email of the single account allowed to write (default: "admin@example.com")
    pub admin_email: String,
    /// Plain-text password of that account, hashed at startup (default: "journal")
    pub admin_password: String,
    /// Session lifetime in hours (default: 168)
    pub session_ttl_hours: i64,
    /// Name of the session cookie (default: "journal_session")
    pub cookie_name: String,
    /// Fill the store with demo entries on startup (default: true)
    pub seed_demo_data: bool,
    /// Reject every mutation with a permission error (default: false)
    pub read_only_store: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `ADMIN_EMAIL`
    /// - `ADMIN_PASSWORD`
    /// - `SESSION_TTL_HOURS`
    /// - `COOKIE_NAME`
    /// - `SEED_DEMO_DATA` (`true`/`false`, `1`/`0`)
    /// - `READ_ONLY_STORE` (`true`/`false`, `1`/`0`)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, falling back to defaults
    /// for missing or unparsable values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            admin_email: lookup("ADMIN_EMAIL").unwrap_or(defaults.admin_email),
            admin_password: lookup("ADMIN_PASSWORD").unwrap_or(defaults.admin_password),
            session_ttl_hours: lookup("SESSION_TTL_HOURS")
                .and_then(|v| v.parse().ok())
                .filter(|hours| *hours > 0)
                .unwrap_or(defaults.session_ttl_hours),
            cookie_name: lookup("COOKIE_NAME").unwrap_or(defaults.cookie_name),
            seed_demo_data: lookup("SEED_DEMO_DATA")
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.seed_demo_data),
            read_only_store: lookup("READ_ONLY_STORE")
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.read_only_store),
        }
    }

    /// Get session TTL as a Duration.
    pub fn session_ttl(&self) -> Duration {
        Duration::hours(self.session_ttl_hours)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            admin_email: "admin@example.com".to_string(),
            admin_password: "journal".to_string(),
            session_ttl_hours: 168,
            cookie_name: "journal_session".to_string(),
            seed_demo_data: true,
            read_only_store: false,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
