//! Startup configuration
//!
//! Reads the model-provider settings from the process environment. Only the
//! Gemini API key is required; the location and news keys are read by their
//! tools at call time.

use std::env;

use crate::core::{FrameworkError, FrameworkResult};
use crate::llm::gemini::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL};

/// Default limit on model turns per run
pub const DEFAULT_MAX_TURNS: usize = 10;

/// Settings loaded once at startup
#[derive(Clone)]
pub struct Settings {
    /// Gemini API key (`GEMINI_API_KEY`, required)
    pub gemini_api_key: String,
    /// Model name (`GEMINI_MODEL`)
    pub model: String,
    /// Max output tokens per response (`GEMINI_MAX_TOKENS`)
    pub max_tokens: u32,
    /// Optional API base override (`GEMINI_API_BASE`)
    pub api_base: Option<String>,
    /// Max model turns per run (`AGENT_MAX_TURNS`)
    pub max_turns: usize,
}

impl Settings {
    /// Load settings from the process environment
    pub fn from_env() -> FrameworkResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> FrameworkResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let gemini_api_key = get("GEMINI_API_KEY")
            .ok_or_else(|| FrameworkError::MissingCredential("GEMINI_API_KEY".to_string()))?;

        let model = get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let max_tokens = match get("GEMINI_MAX_TOKENS") {
            Some(raw) => parse_positive("GEMINI_MAX_TOKENS", &raw)?,
            None => DEFAULT_MAX_TOKENS,
        };

        let max_turns = match get("AGENT_MAX_TURNS") {
            Some(raw) => parse_positive("AGENT_MAX_TURNS", &raw)?,
            None => DEFAULT_MAX_TURNS,
        };

        Ok(Self {
            gemini_api_key,
            model,
            max_tokens,
            api_base: get("GEMINI_API_BASE"),
            max_turns,
        })
    }
}

/// Parse an unsigned setting that must be at least 1
fn parse_positive<T>(key: &str, raw: &str) -> FrameworkResult<T>
where
    T: std::str::FromStr + Default + PartialEq,
{
    let value: T = raw
        .trim()
        .parse()
        .map_err(|_| FrameworkError::InvalidConfig(format!("{} must be a number, got '{}'", key, raw)))?;
    if value == T::default() {
        return Err(FrameworkError::InvalidConfig(format!(
            "{} must be at least 1, got '{}'",
            key, raw
        )));
    }
    Ok(value)
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("gemini_api_key", &"<redacted>")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("api_base", &self.api_base)
            .field("max_turns", &self.max_turns)
            .finish()
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
    fn test_missing_key_fails() {
        let err = Settings::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, FrameworkError::MissingCredential(ref k) if k == "GEMINI_API_KEY"));
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let err = Settings::from_lookup(lookup(&[("GEMINI_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, FrameworkError::MissingCredential(_)));
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(lookup(&[("GEMINI_API_KEY", "AIza")])).unwrap();
        assert_eq!(settings.gemini_api_key, "AIza");
        assert_eq!(settings.model, "gemini-2.0-flash");
        assert_eq!(settings.max_tokens, 8192);
        assert_eq!(settings.max_turns, DEFAULT_MAX_TURNS);
        assert!(settings.api_base.is_none());
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "AIza"),
            ("GEMINI_MODEL", "gemini-2.5-flash"),
            ("GEMINI_MAX_TOKENS", "1024"),
            ("GEMINI_API_BASE", "http://localhost:8000/v1beta"),
            ("AGENT_MAX_TURNS", "4"),
        ]))
        .unwrap();
        assert_eq!(settings.model, "gemini-2.5-flash");
        assert_eq!(settings.max_tokens, 1024);
        assert_eq!(settings.api_base.as_deref(), Some("http://localhost:8000/v1beta"));
        assert_eq!(settings.max_turns, 4);
    }

    #[test]
    fn test_invalid_number() {
        let err = Settings::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "AIza"),
            ("GEMINI_MAX_TOKENS", "lots"),
        ]))
        .unwrap_err();
        assert!(matches!(err, FrameworkError::InvalidConfig(_)));
    }

    #[test]
    fn test_zero_limits_rejected() {
        for key in ["AGENT_MAX_TURNS", "GEMINI_MAX_TOKENS"] {
            let err = Settings::from_lookup(lookup(&[("GEMINI_API_KEY", "AIza"), (key, "0")]))
                .unwrap_err();
            assert!(
                matches!(err, FrameworkError::InvalidConfig(ref msg) if msg.contains(key)),
                "{}",
                err
            );
        }
    }

    #[test]
    fn test_negative_turns_rejected() {
        let err = Settings::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "AIza"),
            ("AGENT_MAX_TURNS", "-3"),
        ]))
        .unwrap_err();
        assert!(matches!(err, FrameworkError::InvalidConfig(_)));
    }

    #[test]
    fn test_debug_redacts_key() {
        let settings = Settings::from_lookup(lookup(&[("GEMINI_API_KEY", "AIza-secret")])).unwrap();
        assert!(!format!("{:?}", settings).contains("AIza-secret"));
    }
}
