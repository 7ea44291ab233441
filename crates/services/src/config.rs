use std::env;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8009/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

const BASE_URL_VAR: &str = "STUDY_API_BASE_URL";
const EXPORT_DIR_VAR: &str = "STUDY_EXPORT_DIR";
const TIMEOUT_VAR: &str = "STUDY_HTTP_TIMEOUT_SECS";

/// Where the study API lives and where exports go.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StudyApiConfig {
    base_url: Url,
    pub export_dir: PathBuf,
    pub timeout: Duration,
}

impl StudyApiConfig {
    /// Read `STUDY_API_BASE_URL`, `STUDY_EXPORT_DIR` and
    /// `STUDY_HTTP_TIMEOUT_SECS`, falling back to defaults for unset values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a set value cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`StudyApiConfig::from_env`] with a custom variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a set value cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let present = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let base_url = present(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let mut config = Self::new(parse_base_url(&base_url)?);
        if let Some(dir) = present(EXPORT_DIR_VAR) {
            config.export_dir = PathBuf::from(dir);
        }
        if let Some(raw) = present(TIMEOUT_VAR) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::InvalidTimeout(raw.clone()))?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    /// Config for `base_url` with the default export dir and timeout.
    #[must_use]
    pub fn new(mut base_url: Url) -> Self {
        // Keep a trailing slash so relative joins append instead of replacing.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            base_url,
            export_dir: PathBuf::from("."),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Replace the base url.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for unparseable urls and non-http schemes.
    pub fn with_base_url(self, raw: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            export_dir: self.export_dir,
            timeout: self.timeout,
            ..Self::new(parse_base_url(raw)?)
        })
    }

    #[must_use]
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidBaseUrl {
        value: raw.to_string(),
        source,
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme(url.scheme().to_string()));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = StudyApiConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.base_url().as_str(), "http://127.0.0.1:8009/api/");
        assert_eq!(config.export_dir, PathBuf::from("."));
        assert_eq!(config.timeout, Duration::from_secs(15));
    }

    #[test]
    fn env_values_override_defaults() {
        let config = StudyApiConfig::from_lookup(lookup(&[
            ("STUDY_API_BASE_URL", "https://study.example.com/v2"),
            ("STUDY_EXPORT_DIR", "/tmp/exports"),
            ("STUDY_HTTP_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();
        assert_eq!(config.base_url().as_str(), "https://study.example.com/v2/");
        assert_eq!(config.export_dir, PathBuf::from("/tmp/exports"));
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            StudyApiConfig::from_lookup(lookup(&[("STUDY_API_BASE_URL", "not a url")])),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            StudyApiConfig::from_lookup(lookup(&[("STUDY_API_BASE_URL", "ftp://host/api")])),
            Err(ConfigError::UnsupportedScheme(_))
        ));
        assert!(matches!(
            StudyApiConfig::from_lookup(lookup(&[("STUDY_HTTP_TIMEOUT_SECS", "0")])),
            Err(ConfigError::InvalidTimeout(_))
        ));
    }

    #[test]
    fn joined_endpoints_keep_the_base_path() {
        let config = StudyApiConfig::from_lookup(lookup(&[])).unwrap();
        let url = config.base_url().join("chapters/").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8009/api/chapters/");
    }
}
