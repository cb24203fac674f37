//! Mirror settings and validation.
//!
//! All fields are optional so a partially configured bot still runs; unset
//! limits are simply not enforced.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Environment keys read by [`MirrorSettings::from_lookup`].
pub mod keys {
    pub const API_KEY: &str = "MEGA_API_KEY";
    pub const ACCOUNT_EMAIL: &str = "MEGA_EMAIL_ID";
    pub const ACCOUNT_PASSWORD: &str = "MEGA_PASSWORD";
    pub const DEDUP_ENABLED: &str = "STOP_DUPLICATE";
    pub const STORAGE_THRESHOLD_GB: &str = "STORAGE_THRESHOLD";
    pub const GLOBAL_SIZE_LIMIT_GB: &str = "MEGA_LIMIT";
    pub const LEECH_SIZE_LIMIT_GB: &str = "LEECH_LIMIT";
    pub const TRANSFER_TIMEOUT_SECS: &str = "MEGA_TRANSFER_TIMEOUT";
}

/// Settings consumed by the download engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MirrorSettings {
    /// Application key passed to every SDK client.
    pub api_key: Option<String>,

    /// Account login; downloads run anonymously when unset.
    pub account_email: Option<String>,
    pub account_password: Option<String>,

    /// Refuse to mirror content that already exists in the destination.
    pub dedup_enabled: Option<bool>,

    /// Free space (GB) that must remain after a download.
    pub storage_threshold_gb: Option<f64>,

    /// Maximum size (GB) of any download.
    pub global_size_limit_gb: Option<f64>,

    /// Maximum size (GB) of a leech download.
    pub leech_size_limit_gb: Option<f64>,

    /// Bound on each wait for the SDK. Unset waits indefinitely.
    pub transfer_timeout_secs: Option<u64>,
}

impl MirrorSettings {
    /// Load settings from the process environment.
    ///
    /// A `.env` file in the working directory is loaded first when present.
    pub fn from_env() -> Result<Self, SettingsError> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!(error = %e, "Ignoring unreadable .env file"),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from a key lookup (see [`keys`]).
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let settings = Self {
            api_key: get(keys::API_KEY),
            account_email: get(keys::ACCOUNT_EMAIL),
            account_password: get(keys::ACCOUNT_PASSWORD),
            dedup_enabled: get(keys::DEDUP_ENABLED)
                .map(|v| parse_bool(keys::DEDUP_ENABLED, &v))
                .transpose()?,
            storage_threshold_gb: get(keys::STORAGE_THRESHOLD_GB)
                .map(|v| parse_number(keys::STORAGE_THRESHOLD_GB, &v))
                .transpose()?,
            global_size_limit_gb: get(keys::GLOBAL_SIZE_LIMIT_GB)
                .map(|v| parse_number(keys::GLOBAL_SIZE_LIMIT_GB, &v))
                .transpose()?,
            leech_size_limit_gb: get(keys::LEECH_SIZE_LIMIT_GB)
                .map(|v| parse_number(keys::LEECH_SIZE_LIMIT_GB, &v))
                .transpose()?,
            transfer_timeout_secs: get(keys::TRANSFER_TIMEOUT_SECS)
                .map(|v| {
                    v.parse::<u64>()
                        .map_err(|_| SettingsError::invalid(keys::TRANSFER_TIMEOUT_SECS, &v))
                })
                .transpose()?,
        };

        validate_settings(&settings)?;
        Ok(settings)
    }

    /// Application key, empty when unset.
    #[must_use]
    pub fn effective_api_key(&self) -> &str {
        self.api_key.as_deref().unwrap_or_default()
    }

    /// Account credentials when both parts are configured.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.account_email.as_deref(), self.account_password.as_deref()) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
                Some((email, password))
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn is_dedup_enabled(&self) -> bool {
        self.dedup_enabled.unwrap_or(false)
    }

    /// Configured free-space threshold in GB, if enforced.
    #[must_use]
    pub fn storage_threshold(&self) -> Option<f64> {
        self.storage_threshold_gb.filter(|gb| *gb > 0.0)
    }

    #[must_use]
    pub fn global_size_limit_bytes(&self) -> Option<u64> {
        self.global_size_limit_gb.and_then(gb_to_bytes)
    }

    #[must_use]
    pub fn leech_size_limit_bytes(&self) -> Option<u64> {
        self.leech_size_limit_gb.and_then(gb_to_bytes)
    }

    #[must_use]
    pub fn transfer_timeout(&self) -> Option<Duration> {
        self.transfer_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

/// Convert a GB limit into bytes; zero disables the limit.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn gb_to_bytes(gb: f64) -> Option<u64> {
    (gb > 0.0).then(|| (gb * BYTES_PER_GB) as u64)
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, SettingsError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(SettingsError::invalid(key, value)),
    }
}

fn parse_number(key: &'static str, value: &str) -> Result<f64, SettingsError> {
    value
        .parse::<f64>()
        .map_err(|_| SettingsError::invalid(key, value))
}

/// Settings validation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("API key cannot be blank")]
    EmptyApiKey,

    #[error("Account email and password must be set together")]
    IncompleteCredentials,

    #[error("{0} must be a non-negative number of GB")]
    InvalidLimit(&'static str),
}

impl SettingsError {
    fn invalid(key: &'static str, value: &str) -> Self {
        Self::InvalidValue {
            key,
            value: value.to_string(),
        }
    }
}

/// Validate settings values.
pub fn validate_settings(settings: &MirrorSettings) -> Result<(), SettingsError> {
    if settings
        .api_key
        .as_ref()
        .is_some_and(|key| key.trim().is_empty())
    {
        return Err(SettingsError::EmptyApiKey);
    }

    if settings.account_email.is_some() != settings.account_password.is_some() {
        return Err(SettingsError::IncompleteCredentials);
    }

    let limits = [
        (keys::STORAGE_THRESHOLD_GB, settings.storage_threshold_gb),
        (keys::GLOBAL_SIZE_LIMIT_GB, settings.global_size_limit_gb),
        (keys::LEECH_SIZE_LIMIT_GB, settings.leech_size_limit_gb),
    ];
    for (key, value) in limits {
        if value.is_some_and(|gb| gb.is_nan() || gb < 0.0) {
            return Err(SettingsError::InvalidLimit(key));
        }
    }

    Ok(())
}
