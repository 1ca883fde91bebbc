use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use crate::pipeline::llm::gemini::{DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};
use crate::pipeline::llm::openai::{DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL};

/// Application-level constants
pub const APP_NAME: &str = "CareBridge";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot determine home directory")]
    NoHomeDir,

    #[error("Invalid CAREBRIDGE_BIND_ADDR {value:?}: {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("Invalid CAREBRIDGE_LLM_TIMEOUT_SECS {0:?}: expected a positive integer")]
    InvalidTimeout(String),
}

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "carebridge=info,carebridge_lib=info,tower_http=info"
}

/// Get the application data directory (~/.carebridge)
pub fn app_data_dir() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(".carebridge"))
}

/// Default location of the discharge JSON exports
pub fn default_discharge_dir() -> Result<PathBuf, ConfigError> {
    Ok(app_data_dir()?.join("discharges"))
}

/// Credentials and endpoint for one hosted model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub data_dir: PathBuf,
    pub llm_timeout_secs: u64,
    pub openai: Option<ProviderConfig>,
    pub gemini: Option<ProviderConfig>,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bind_value = get("CAREBRIDGE_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let bind_addr = bind_value
            .parse()
            .map_err(|source| ConfigError::InvalidBindAddr {
                value: bind_value.clone(),
                source,
            })?;

        let data_dir = match get("CAREBRIDGE_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => default_discharge_dir()?,
        };

        let llm_timeout_secs = match get("CAREBRIDGE_LLM_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
            None => DEFAULT_LLM_TIMEOUT_SECS,
        };

        let provider = |prefix: &str, default_model: &str, default_base: &str| {
            get(&format!("{prefix}_API_KEY")).map(|api_key| ProviderConfig {
                api_key,
                model: get(&format!("{prefix}_MODEL")).unwrap_or_else(|| default_model.into()),
                base_url: get(&format!("{prefix}_BASE_URL"))
                    .unwrap_or_else(|| default_base.into()),
            })
        };

        Ok(Self {
            bind_addr,
            data_dir,
            llm_timeout_secs,
            openai: provider("OPENAI", DEFAULT_OPENAI_MODEL, DEFAULT_OPENAI_BASE_URL),
            gemini: provider("GEMINI", DEFAULT_GEMINI_MODEL, DEFAULT_GEMINI_BASE_URL),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = Config::from_lookup(lookup(&[("CAREBRIDGE_DATA_DIR", "/srv/discharges")])).unwrap();
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.data_dir, PathBuf::from("/srv/discharges"));
        assert_eq!(config.llm_timeout_secs, DEFAULT_LLM_TIMEOUT_SECS);
        assert!(config.openai.is_none());
        assert!(config.gemini.is_none());
    }

    #[test]
    fn provider_keys_enable_clients_with_default_models() {
        let config = Config::from_lookup(lookup(&[
            ("CAREBRIDGE_DATA_DIR", "/tmp"),
            ("OPENAI_API_KEY", "sk-test"),
            ("GEMINI_API_KEY", "g-test"),
            ("GEMINI_MODEL", "gemini-1.5-pro"),
        ]))
        .unwrap();

        let openai = config.openai.unwrap();
        assert_eq!(openai.model, "gpt-4o-mini");
        assert_eq!(openai.base_url, DEFAULT_OPENAI_BASE_URL);

        let gemini = config.gemini.unwrap();
        assert_eq!(gemini.api_key, "g-test");
        assert_eq!(gemini.model, "gemini-1.5-pro");
    }

    #[test]
    fn blank_key_counts_as_unset() {
        let config = Config::from_lookup(lookup(&[
            ("CAREBRIDGE_DATA_DIR", "/tmp"),
            ("OPENAI_API_KEY", "   "),
        ]))
        .unwrap();
        assert!(config.openai.is_none());
    }

    #[test]
    fn rejects_bad_bind_addr() {
        let err = Config::from_lookup(lookup(&[
            ("CAREBRIDGE_DATA_DIR", "/tmp"),
            ("CAREBRIDGE_BIND_ADDR", "localhost"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBindAddr { .. }));
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = Config::from_lookup(lookup(&[
            ("CAREBRIDGE_DATA_DIR", "/tmp"),
            ("CAREBRIDGE_LLM_TIMEOUT_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout(_)));
    }

    #[test]
    fn app_data_dir_under_home() {
        let dir = app_data_dir().unwrap();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(default_discharge_dir().unwrap().ends_with("discharges"));
    }

    #[test]
    fn app_name_is_carebridge() {
        assert_eq!(APP_NAME, "CareBridge");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.3.0");
    }
}
