//! Client runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the client. Library
//! code never reads environment variables itself; the binaries read them and hand the raw values
//! to the helpers below.

use crate::constants::{DEV_API_BASE_URL, PROD_API_BASE_URL};
use crate::{PatientorError, PatientorResult};
use std::str::FromStr;

/// Deployment environment, selecting which API base URL is used.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// The API base URL for this environment.
    pub fn default_base_url(self) -> &'static str {
        match self {
            Environment::Development => DEV_API_BASE_URL,
            Environment::Production => PROD_API_BASE_URL,
        }
    }
}

impl FromStr for Environment {
    type Err = PatientorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(PatientorError::InvalidInput(format!(
                "unknown environment '{other}' (expected development or production)"
            ))),
        }
    }
}

/// API configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    environment: Environment,
    base_url: String,
}

impl ApiConfig {
    /// Create a new `ApiConfig`.
    ///
    /// When `base_url` is `None` the environment's default base URL is used. A trailing `/` is
    /// removed so that endpoint paths can be appended directly.
    ///
    /// # Errors
    ///
    /// Returns `PatientorError::InvalidInput` if the base URL is empty or does not use the
    /// `http` or `https` scheme.
    pub fn new(environment: Environment, base_url: Option<String>) -> PatientorResult<Self> {
        let base_url = base_url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| environment.default_base_url().to_string());

        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(PatientorError::InvalidInput(format!(
                "API base URL must start with http:// or https://, got '{base_url}'"
            )));
        }

        Ok(Self {
            environment,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join an endpoint path such as `/patients` onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Parse the environment from an optional raw value.
///
/// If `value` is `None` or empty/whitespace, returns `Environment::Production`: only an explicit
/// development setting selects the local backend.
pub fn environment_from_env_value(value: Option<String>) -> PatientorResult<Environment> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let parsed = value.map(|v| v.parse::<Environment>()).transpose()?;

    Ok(parsed.unwrap_or(Environment::Production))
}

/// Build an `ApiConfig` from the raw values of the environment variables.
pub fn api_config_from_env_values(
    environment: Option<String>,
    base_url: Option<String>,
) -> PatientorResult<ApiConfig> {
    let environment = environment_from_env_value(environment)?;
    ApiConfig::new(environment, base_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_environment_selects_production() {
        assert_eq!(
            environment_from_env_value(None).expect("default"),
            Environment::Production
        );
        assert_eq!(
            environment_from_env_value(Some("  ".into())).expect("blank"),
            Environment::Production
        );
    }

    #[test]
    fn development_is_selected_explicitly() {
        let env = environment_from_env_value(Some("development".into())).expect("parse");
        assert_eq!(env, Environment::Development);
        let cfg = ApiConfig::new(env, None).expect("config");
        assert_eq!(cfg.base_url(), DEV_API_BASE_URL);
    }

    #[test]
    fn rejects_unknown_environment() {
        let err = environment_from_env_value(Some("staging".into())).expect_err("should reject");
        assert!(matches!(err, PatientorError::InvalidInput(msg) if msg.contains("staging")));
    }

    #[test]
    fn override_wins_and_trailing_slash_is_trimmed() {
        let cfg = api_config_from_env_values(
            Some("prod".into()),
            Some("http://127.0.0.1:4000/api/".into()),
        )
        .expect("config");
        assert_eq!(cfg.environment(), Environment::Production);
        assert_eq!(cfg.base_url(), "http://127.0.0.1:4000/api");
        assert_eq!(cfg.endpoint("/patients"), "http://127.0.0.1:4000/api/patients");
    }

    #[test]
    fn rejects_non_http_base_url() {
        let err = ApiConfig::new(Environment::Development, Some("ftp://example.org".into()))
            .expect_err("should reject");
        assert!(matches!(err, PatientorError::InvalidInput(_)));
    }
}
