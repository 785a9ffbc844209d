//! Feedback client configuration.

use crate::error::{FeedbackError, FeedbackResult};
use std::time::Duration;
use url::Url;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const MODEL_ENV: &str = "DOODLEPAD_MODEL";
pub const API_BASE_ENV: &str = "DOODLEPAD_API_BASE";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where and how to reach the generative model.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: Url,
    /// Ignored in the browser, where fetch has no timeout knob.
    pub timeout: Duration,
}

impl FeedbackConfig {
    /// Config for `api_key` with the default model and endpoint.
    pub fn new(api_key: impl Into<String>) -> FeedbackResult<Self> {
        Ok(Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            api_base: Url::parse(DEFAULT_API_BASE)?,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Read the config from the process environment.
    pub fn from_env() -> FeedbackResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> FeedbackResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_ENV)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(FeedbackError::MissingApiKey)?;
        let mut config = Self::new(api_key)?;
        if let Some(model) = lookup(MODEL_ENV).filter(|m| !m.trim().is_empty()) {
            config.model = model.trim().to_string();
        }
        if let Some(base) = lookup(API_BASE_ENV).filter(|b| !b.trim().is_empty()) {
            config = config.with_api_base(base.trim())?;
        }
        Ok(config)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the endpoint base. A trailing slash is added so model paths
    /// join under it.
    pub fn with_api_base(mut self, base: &str) -> FeedbackResult<Self> {
        let normalized = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{base}/")
        };
        self.api_base = Url::parse(&normalized)?;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `{base}/models/{model}:generateContent?key={api_key}`
    pub fn endpoint(&self) -> FeedbackResult<Url> {
        let mut url = self
            .api_base
            .join(&format!("models/{}:generateContent", self.model))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_missing_key() {
        assert!(matches!(
            FeedbackConfig::from_lookup(lookup(&[])),
            Err(FeedbackError::MissingApiKey)
        ));
        assert!(matches!(
            FeedbackConfig::from_lookup(lookup(&[(API_KEY_ENV, "  ")])),
            Err(FeedbackError::MissingApiKey)
        ));
    }

    #[test]
    fn test_defaults() {
        let config = FeedbackConfig::from_lookup(lookup(&[(API_KEY_ENV, "k")])).unwrap();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(
            config.endpoint().unwrap().as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent?key=k"
        );
    }

    #[test]
    fn test_overrides() {
        let config = FeedbackConfig::from_lookup(lookup(&[
            (API_KEY_ENV, "abc"),
            (MODEL_ENV, "gemini-pro"),
            (API_BASE_ENV, "http://localhost:8080/v1"),
        ]))
        .unwrap();
        assert_eq!(
            config.endpoint().unwrap().as_str(),
            "http://localhost:8080/v1/models/gemini-pro:generateContent?key=abc"
        );
    }

    #[test]
    fn test_invalid_base() {
        let result = FeedbackConfig::from_lookup(lookup(&[(API_KEY_ENV, "k"), (API_BASE_ENV, "not a url")]));
        assert!(matches!(result, Err(FeedbackError::InvalidUrl(_))));
    }
}
