//! Application-level configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Environment variable holding the deployment environment
pub const ENV_VAR: &str = "STOCKDASH_ENV";

/// Deployment environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dev" | "development" => Ok(Self::Development),
            "prod" | "production" => Ok(Self::Production),
            other => Err(format!("unknown environment: {other}")),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application name
    pub app_name: String,
    /// Environment (development, production)
    pub environment: Environment,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "stockdash".to_string(),
            environment: Environment::Development,
        }
    }
}

impl AppConfig {
    /// Build from `STOCKDASH_ENV`
    ///
    /// An unset variable keeps the default environment; an unparsable one is
    /// an error so the caller can report it once logging is up.
    pub fn from_env() -> Result<Self, String> {
        Self::from_env_value(std::env::var(ENV_VAR).ok().as_deref())
    }

    fn from_env_value(value: Option<&str>) -> Result<Self, String> {
        let mut config = Self::default();
        if let Some(value) = value {
            config.environment = value
                .parse()
                .map_err(|e| format!("{ENV_VAR}: {e}"))?;
        }
        Ok(config)
    }

    /// Default log filter for this environment
    pub fn default_log_filter(&self) -> &'static str {
        match self.environment {
            Environment::Development => "info,stockdash_core=debug",
            Environment::Production => "warn,stockdash_core=info",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.app_name, "stockdash");
        assert_eq!(config.environment, Environment::Development);
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!("prod".parse::<Environment>(), Ok(Environment::Production));
        assert_eq!(" Development ".parse::<Environment>(), Ok(Environment::Development));
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn test_env_value() {
        assert_eq!(
            AppConfig::from_env_value(None).unwrap().environment,
            Environment::Development
        );
        assert_eq!(
            AppConfig::from_env_value(Some("production")).unwrap().environment,
            Environment::Production
        );

        let err = AppConfig::from_env_value(Some("staging")).unwrap_err();
        assert!(err.contains("STOCKDASH_ENV"));
        assert!(err.contains("staging"));
    }

    #[test]
    fn test_log_filter_per_environment() {
        let mut config = AppConfig::default();
        assert!(config.default_log_filter().contains("debug"));
        config.environment = Environment::Production;
        assert!(config.default_log_filter().starts_with("warn"));
    }

    #[test]
    fn test_config_serde() {
        let json = serde_json::to_string(&AppConfig::default()).unwrap();
        assert!(json.contains("\"development\""));
    }
}
