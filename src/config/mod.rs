//! Configuration module for the leave backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.
//! Remote credentials are optional: leaving them out selects local storage.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Default time allowed for the remote schema check.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Remote database URL
    pub remote_url: Option<String>,
    /// Access key for the remote database
    pub remote_key: Option<String>,
    /// Path to the local SQLite key-value store
    pub local_store_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit JSON log lines
    pub log_json: bool,
    /// Upper bound on the remote schema check
    pub probe_timeout: Duration,
}

/// Remote endpoint and access key, present only when both are configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCredentials {
    pub url: String,
    pub key: String,
}

/// A malformed configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub variable: &'static str,
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {}: {}", self.variable, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let remote_url = non_empty_var("LEAVE_REMOTE_URL");
        let remote_key = non_empty_var("LEAVE_REMOTE_KEY");

        let local_store_path = env::var("LEAVE_LOCAL_STORE_PATH")
            .unwrap_or_else(|_| "./data/local.sqlite".to_string())
            .into();

        let bind_addr = env::var("LEAVE_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .map_err(|e| ConfigError {
                variable: "LEAVE_BIND_ADDR",
                message: format!("{}", e),
            })?;

        let log_level = env::var("LEAVE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_json = env::var("LEAVE_LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let probe_timeout = match non_empty_var("LEAVE_PROBE_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| ConfigError {
                    variable: "LEAVE_PROBE_TIMEOUT_SECS",
                    message: format!("{}", e),
                })?,
            None => DEFAULT_PROBE_TIMEOUT,
        };

        Ok(Self {
            remote_url,
            remote_key,
            local_store_path,
            bind_addr,
            log_level,
            log_json,
            probe_timeout,
        })
    }

    /// Remote credentials, if both the URL and the key are set.
    pub fn remote_credentials(&self) -> Option<RemoteCredentials> {
        match (&self.remote_url, &self.remote_key) {
            (Some(url), Some(key)) => Some(RemoteCredentials {
                url: url.clone(),
                key: key.clone(),
            }),
            _ => None,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;
    use std::sync::Mutex;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const VARS: [&str; 7] = [
        "LEAVE_REMOTE_URL",
        "LEAVE_REMOTE_KEY",
        "LEAVE_LOCAL_STORE_PATH",
        "LEAVE_BIND_ADDR",
        "LEAVE_LOG_LEVEL",
        "LEAVE_LOG_FORMAT",
        "LEAVE_PROBE_TIMEOUT_SECS",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_default_config() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();

        let config = Config::from_env().unwrap();

        assert!(config.remote_credentials().is_none());
        assert_eq!(config.local_store_path, PathBuf::from("./data/local.sqlite"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert!(!config.log_json);
        assert_eq!(config.probe_timeout, DEFAULT_PROBE_TIMEOUT);
    }

    #[test]
    fn test_credentials_need_both_values() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();

        env::set_var("LEAVE_REMOTE_URL", "postgres://db.example.com/leave");
        env::set_var("LEAVE_REMOTE_KEY", "   ");
        let config = Config::from_env().unwrap();
        assert!(config.remote_credentials().is_none());

        env::set_var("LEAVE_REMOTE_KEY", "anon-key");
        let config = Config::from_env().unwrap();
        let creds = config.remote_credentials().unwrap();
        assert_eq!(creds.url, "postgres://db.example.com/leave");
        assert_eq!(creds.key, "anon-key");

        clear_env();
    }

    #[test]
    fn test_malformed_timeout_is_reported() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();

        env::set_var("LEAVE_PROBE_TIMEOUT_SECS", "soon");
        let err = Config::from_env().unwrap_err();
        assert_eq!(err.variable, "LEAVE_PROBE_TIMEOUT_SECS");

        clear_env();
    }
}
