use crate::error::{AdviceError, Result};
use dashmap::DashMap;
use std::env;
use std::sync::Arc;

/// Environment key of the diagnostics flag.
pub const HIDE_EXCEPTIONS_KEY: &str = "PA_HIDE_EXCEPTIONS";

/// Configuration service
#[derive(Clone, Default)]
pub struct ConfigService {
    config: Arc<DashMap<String, String>>,
}

impl ConfigService {
    /// Create a service seeded with the process environment
    pub fn new() -> Self {
        let service = Self::default();
        for (key, value) in env::vars() {
            service.set(&key, &value);
        }
        service
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.config.get(key).map(|v| v.clone())
    }

    pub fn set(&self, key: &str, value: &str) {
        self.config.insert(key.to_string(), value.to_string());
    }

    /// Read a boolean value.
    ///
    /// Accepts `true` / `false` in any case, surrounded by optional whitespace.
    /// Returns `Ok(None)` when the key is not set.
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        let Some(raw) = self.get(key) else {
            return Ok(None);
        };

        match raw.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            _ => Err(AdviceError::InvalidBool {
                key: key.to_string(),
                value: raw,
            }),
        }
    }
}

/// Process-wide settings of the exception advice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdviceConfig {
    /// When true (the default) stack traces never leave the server.
    pub hide_exceptions: bool,
}

impl Default for AdviceConfig {
    fn default() -> Self {
        Self {
            hide_exceptions: true,
        }
    }
}

impl AdviceConfig {
    /// Settings that expose stack traces in error responses
    pub fn verbose() -> Self {
        Self {
            hide_exceptions: false,
        }
    }

    pub fn from_config(config: &ConfigService) -> Result<Self> {
        let hide_exceptions = config
            .get_bool(HIDE_EXCEPTIONS_KEY)?
            .unwrap_or(Self::default().hide_exceptions);

        Ok(Self { hide_exceptions })
    }

    /// Load the settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_config(&ConfigService::new())
    }
}
