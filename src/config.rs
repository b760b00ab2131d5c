use reqwest::Url;
use std::env;
use thiserror::Error;
use tracing::{info, warn};

pub const API_BASE_URL_VAR: &str = "TANK_API_BASE_URL";
pub const PORT_VAR: &str = "PORT";
pub const AUTH_TOKEN_VAR: &str = "TANK_AUTH_TOKEN";
pub const AUTH_USER_VAR: &str = "TANK_AUTH_USER";

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_AUTH_USER: &str = "aquarist";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{var} is not a valid http(s) URL: {reason}")]
    InvalidUrl { var: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityConfig {
    pub user: String,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_base_url: String,
    pub port: u16,
    /// Present only when the sign-in gate is switched on.
    pub identity: Option<IdentityConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url = lookup(API_BASE_URL_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::Missing(API_BASE_URL_VAR))?;
        let api_base_url = validate_url(&raw_url)?;

        let port = match lookup(PORT_VAR) {
            Some(value) => value.parse::<u16>().unwrap_or_else(|err| {
                warn!("invalid {PORT_VAR} '{value}' ({err}), using {DEFAULT_PORT}");
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let identity = lookup(AUTH_TOKEN_VAR)
            .filter(|token| !token.trim().is_empty())
            .map(|token| IdentityConfig {
                user: lookup(AUTH_USER_VAR)
                    .filter(|user| !user.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_AUTH_USER.to_string()),
                token: token.trim().to_string(),
            });
        if identity.is_none() {
            info!("{AUTH_TOKEN_VAR} not set, sign-in gate disabled");
        }

        Ok(Self {
            api_base_url,
            port,
            identity,
        })
    }
}

fn validate_url(raw: &str) -> Result<String, ConfigError> {
    let url = Url::parse(raw).map_err(|err| ConfigError::InvalidUrl {
        var: API_BASE_URL_VAR,
        reason: err.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            var: API_BASE_URL_VAR,
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    Ok(raw.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn base_url_is_required() {
        assert_eq!(load(&[]), Err(ConfigError::Missing(API_BASE_URL_VAR)));
        assert_eq!(
            load(&[(API_BASE_URL_VAR, "  ")]),
            Err(ConfigError::Missing(API_BASE_URL_VAR))
        );
    }

    #[test]
    fn rejects_non_http_urls() {
        assert!(matches!(
            load(&[(API_BASE_URL_VAR, "ftp://tanks.local")]),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            load(&[(API_BASE_URL_VAR, "not a url")]),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn defaults_without_auth() {
        let config = load(&[(API_BASE_URL_VAR, "http://api.local:3000/")]).unwrap();
        assert_eq!(config.api_base_url, "http://api.local:3000");
        assert_eq!(config.port, 8080);
        assert_eq!(config.identity, None);
    }

    #[test]
    fn token_enables_identity() {
        let config = load(&[
            (API_BASE_URL_VAR, "https://api.local"),
            (PORT_VAR, "9000"),
            (AUTH_TOKEN_VAR, "abc"),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(
            config.identity,
            Some(IdentityConfig {
                user: "aquarist".into(),
                token: "abc".into(),
            })
        );
    }
}
