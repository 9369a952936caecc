//! Runtime settings for the rate refresh loop.

use serde::Deserialize;

use crate::rates::exchangerate_api::DEFAULT_ENDPOINT;

/// Where to fetch mid-market rates from and how often.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// Rate endpoint; the base currency code is appended as the last path segment.
    #[serde(default = "default_rate_endpoint")]
    pub rate_endpoint: String,
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
    #[serde(default = "default_intermediate_currency")]
    pub intermediate_currency: String,
    #[serde(default = "default_target_currency")]
    pub target_currency: String,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_auto_fetch")]
    pub auto_fetch: bool,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_rate_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_base_currency() -> String {
    "RUB".to_string()
}

fn default_intermediate_currency() -> String {
    "USD".to_string()
}

fn default_target_currency() -> String {
    "KRW".to_string()
}

fn default_poll_interval_secs() -> u64 {
    5
}

fn default_auto_fetch() -> bool {
    true
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rate_endpoint: default_rate_endpoint(),
            base_currency: default_base_currency(),
            intermediate_currency: default_intermediate_currency(),
            target_currency: default_target_currency(),
            poll_interval_secs: default_poll_interval_secs(),
            auto_fetch: default_auto_fetch(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Settings {
    /// Loads `config/default` (optional) and then `FXCHAIN_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a source is present but cannot be parsed.
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(
                config::Environment::with_prefix("FXCHAIN")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Parses settings from a TOML document, missing keys take their defaults.
    pub fn from_toml(doc: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(doc, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_rub_usd_krw() {
        let s = Settings::default();
        assert_eq!(s.base_currency, "RUB");
        assert_eq!(s.intermediate_currency, "USD");
        assert_eq!(s.target_currency, "KRW");
        assert_eq!(s.poll_interval_secs, 5);
        assert!(s.auto_fetch);
    }

    #[test]
    fn toml_overrides_keep_other_defaults() {
        let s = Settings::from_toml("poll_interval_secs = 30\nauto_fetch = false\n").unwrap();
        assert_eq!(s.poll_interval_secs, 30);
        assert!(!s.auto_fetch);
        assert_eq!(s.rate_endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn environment_overrides_defaults() {
        temp_env::with_vars(
            [
                ("FXCHAIN_BASE_CURRENCY", Some("EUR")),
                ("FXCHAIN_POLL_INTERVAL_SECS", Some("60")),
                ("FXCHAIN_AUTO_FETCH", Some("false")),
            ],
            || {
                let s = Settings::load().unwrap();
                assert_eq!(s.base_currency, "EUR");
                assert_eq!(s.poll_interval_secs, 60);
                assert!(!s.auto_fetch);
                assert_eq!(s.target_currency, "KRW");
            },
        );
    }
}
