use crate::error::Form3Error;
use std::env;
use std::time::Duration;

/// Environment variable holding the API base URL (`scheme://host:port`).
pub const BASE_URL_ENV: &str = "FORM3_BASE_URL";

/// Request timeout of the default transport.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub timeout: Duration,
}

impl Config {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read the base URL from `FORM3_BASE_URL`.
    pub fn from_env() -> Result<Self, Form3Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Form3Error> {
        match lookup(BASE_URL_ENV) {
            Some(url) if !url.trim().is_empty() => Ok(Self::new(url)),
            _ => Err(Form3Error::MissingBaseUrl(BASE_URL_ENV)),
        }
    }
}
