//! Configuration for the verification gate.
//!
//! Loaded as the `verification` section of `help-ireland.yaml`, then
//! overridden from the environment so the API key never has to live in the
//! file:
//!
//! - `GEMINI_API_KEY` -- judge API key
//! - `GEMINI_MODEL` -- judge model name
//! - `TEMPLATES_DIR` -- directory holding a replacement `evidence.j2`
//! - `WITNESS_EXPIRY_HOURS` -- how long a witness request stays open

use std::time::Duration;

use serde::Deserialize;

use crate::error::VerifyError;

/// Complete verification configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VerifyConfig {
    /// Image judgment backend settings.
    pub judge: JudgeConfig,
    /// Hours before an unconfirmed witness request expires (default: 24).
    pub witness_expiry_hours: u64,
}

/// Settings for the image judgment backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct JudgeConfig {
    /// Which backend to use (default: gemini).
    pub backend: JudgeBackendType,
    /// Base API URL.
    pub api_url: String,
    /// API key. An empty key disables the Gemini backend.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// Request timeout in milliseconds (default: 15000).
    pub timeout_ms: u64,
    /// Directory holding an `evidence.j2` that replaces the built-in
    /// prompt. Unset uses the built-in one.
    pub templates_dir: Option<String>,
}

/// Supported judge backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JudgeBackendType {
    /// Google Gemini `generateContent`.
    #[default]
    Gemini,
    /// Approves every claim. For local development without an API key.
    Stub,
    /// Always returns the unavailable verdict.
    Disabled,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            judge: JudgeConfig::default(),
            witness_expiry_hours: 24,
        }
    }
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            backend: JudgeBackendType::Gemini,
            api_url: "https://generativelanguage.googleapis.com/v1beta".to_owned(),
            api_key: String::new(),
            model: "gemini-3-flash-preview".to_owned(),
            timeout_ms: 15_000,
            templates_dir: None,
        }
    }
}

impl VerifyConfig {
    /// Apply environment variable overrides on top of the file values.
    pub fn apply_env_overrides(&mut self) -> Result<(), VerifyError> {
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            self.judge.api_key = key;
        }
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            self.judge.model = model;
        }
        if let Ok(dir) = std::env::var("TEMPLATES_DIR") {
            self.judge.templates_dir = Some(dir).filter(|d| !d.trim().is_empty());
        }
        if let Ok(hours) = std::env::var("WITNESS_EXPIRY_HOURS") {
            self.witness_expiry_hours = hours
                .parse()
                .map_err(|e| VerifyError::Config(format!("invalid WITNESS_EXPIRY_HOURS: {e}")))?;
        }
        Ok(())
    }

    /// How long a witness request stays open.
    pub const fn witness_expiry(&self) -> Duration {
        Duration::from_secs(self.witness_expiry_hours.saturating_mul(3600))
    }
}

impl JudgeConfig {
    /// Request timeout as a [`Duration`].
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = VerifyConfig::default();
        assert_eq!(cfg.judge.backend, JudgeBackendType::Gemini);
        assert!(cfg.judge.api_key.is_empty());
        assert_eq!(cfg.witness_expiry(), Duration::from_secs(24 * 3600));
        assert_eq!(cfg.judge.timeout(), Duration::from_secs(15));
        assert!(cfg.judge.templates_dir.is_none());
    }

    #[test]
    fn partial_section_deserializes() {
        let cfg: VerifyConfig =
            serde_json::from_str(r#"{"judge": {"backend": "stub", "templates_dir": "prompts"}, "witness_expiry_hours": 2}"#)
                .unwrap();
        assert_eq!(cfg.judge.backend, JudgeBackendType::Stub);
        assert_eq!(cfg.judge.templates_dir.as_deref(), Some("prompts"));
        assert_eq!(cfg.judge.model, "gemini-3-flash-preview");
        assert_eq!(cfg.witness_expiry_hours, 2);
    }
}
