//! Service settings loaded from the environment.
//!
//! Every value has a default, so an empty environment yields a working
//! service. Variables that are present must parse.

use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Error returned when an environment variable holds an unusable value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// The variable is set but cannot be parsed
    #[error("invalid value {value:?} for {key}")]
    Invalid {
        /// Environment variable name
        key: &'static str,
        /// Raw value found
        value: String,
    },
}

/// Runtime settings of the summary service.
///
/// | field | variable | default |
/// |---|---|---|
/// | `app_name` | `APP_NAME` | `Document Summarizer API` |
/// | `version` | `APP_VERSION` | crate version |
/// | `max_content_length` | `MAX_CONTENT_LENGTH` | 50000 |
/// | `min_content_length` | `MIN_CONTENT_LENGTH` | 100 |
/// | `rate_limit_requests` | `RATE_LIMIT_REQUESTS` | 10 |
/// | `rate_limit_window` | `RATE_LIMIT_WINDOW` (seconds) | 60 |
/// | `default_max_sentences` | `DEFAULT_MAX_SENTENCES` | 5 |
/// | `max_sentences_cap` | `MAX_SENTENCES_CAP` | 20 |
/// | `max_tracked_clients` | `MAX_TRACKED_CLIENTS` (0 = unlimited) | 10000 |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub app_name: String,
    pub version: String,
    /// Upper bound on a request body in bytes and on document length in characters
    pub max_content_length: usize,
    /// Lower bound on document length in characters
    pub min_content_length: usize,
    pub rate_limit_requests: usize,
    pub rate_limit_window: Duration,
    pub default_max_sentences: usize,
    pub max_sentences_cap: usize,
    /// `None` tracks any number of clients
    pub max_tracked_clients: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "Document Summarizer API".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            max_content_length: 50_000,
            min_content_length: 100,
            rate_limit_requests: 10,
            rate_limit_window: Duration::from_secs(60),
            default_max_sentences: 5,
            max_sentences_cap: 20,
            max_tracked_clients: Some(10_000),
        }
    }
}

impl Settings {
    /// Read settings from process environment variables.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through an arbitrary lookup function.
    ///
    /// ```
    /// use textdigest::Settings;
    /// use std::time::Duration;
    ///
    /// let settings = Settings::from_lookup(|key| match key {
    ///     "RATE_LIMIT_WINDOW" => Some("30".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    ///
    /// assert_eq!(settings.rate_limit_window, Duration::from_secs(30));
    /// assert_eq!(settings.rate_limit_requests, 10);
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let max_tracked_clients = match parse::<usize, _>(&lookup, "MAX_TRACKED_CLIENTS")? {
            Some(0) => None,
            Some(n) => Some(n),
            None => defaults.max_tracked_clients,
        };

        Ok(Self {
            app_name: lookup("APP_NAME").unwrap_or(defaults.app_name),
            version: lookup("APP_VERSION").unwrap_or(defaults.version),
            max_content_length: parse(&lookup, "MAX_CONTENT_LENGTH")?
                .unwrap_or(defaults.max_content_length),
            min_content_length: parse(&lookup, "MIN_CONTENT_LENGTH")?
                .unwrap_or(defaults.min_content_length),
            rate_limit_requests: parse(&lookup, "RATE_LIMIT_REQUESTS")?
                .unwrap_or(defaults.rate_limit_requests),
            rate_limit_window: parse(&lookup, "RATE_LIMIT_WINDOW")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.rate_limit_window),
            default_max_sentences: parse(&lookup, "DEFAULT_MAX_SENTENCES")?
                .unwrap_or(defaults.default_max_sentences),
            max_sentences_cap: parse(&lookup, "MAX_SENTENCES_CAP")?
                .unwrap_or(defaults.max_sentences_cap),
            max_tracked_clients,
        })
    }
}

fn parse<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, SettingsError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| SettingsError::Invalid { key, value: raw }),
    }
}
