//! Client configuration loaded from the environment
//!
//! # Environment Variables
//!
//! - `FLOWLOG_API_URL`: base URL of the FlowLog REST API (default: `http://127.0.0.1:3001/api`)
//! - `FLOWLOG_TOKEN`: bearer token supplied by the session layer (optional)
//! - `RUST_LOG`: log filter used by the `flowlog` binary

use crate::auth::SessionToken;
use crate::error::{FlowlogError, Result};
use reqwest::Url;
use std::env;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3001/api";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every endpoint path is joined onto, always ending in `/`
    pub api_url: Url,

    pub token: Option<SessionToken>,
}

impl ClientConfig {
    /// Parses the base URL of the API
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the URL does not parse or is not http(s).
    pub fn new(api_url: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            api_url: parse_base_url(api_url.as_ref())?,
            token: None,
        })
    }

    pub fn with_token(mut self, token: SessionToken) -> Self {
        self.token = Some(token);
        self
    }

    /// Loads configuration from a `.env` file and environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `FLOWLOG_API_URL` is set but is not an http(s) URL.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_url = env::var("FLOWLOG_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let token = env::var("FLOWLOG_TOKEN")
            .ok()
            .filter(|raw| !raw.trim().is_empty())
            .map(SessionToken::new);

        let config = Self::new(api_url)?;
        Ok(Self { token, ..config })
    }

    /// Joins an endpoint path onto the base URL
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.api_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| FlowlogError::ValidationError(format!("invalid endpoint '{}': {}", path, e)))
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim().trim_end_matches('/');
    let mut url = Url::parse(trimmed).map_err(|e| {
        FlowlogError::ConfigError(format!("invalid FLOWLOG_API_URL '{}': {}", raw, e))
    })?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(FlowlogError::ConfigError(format!(
            "FLOWLOG_API_URL must be an http(s) URL, got '{}'",
            raw
        )));
    }
    // Url::join replaces the last segment unless the base ends in a slash
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;

    fn local() -> ClientConfig {
        ClientConfig::new(DEFAULT_API_URL).unwrap()
    }

    #[test]
    fn test_default_points_at_local_api() {
        let config = local();
        assert_eq!(
            config.endpoint("boards/1").unwrap().as_str(),
            "http://127.0.0.1:3001/api/boards/1"
        );
        assert!(config.token.is_none());
    }

    #[test]
    fn test_trailing_slash_is_dropped() {
        let config = ClientConfig::new("https://flowlog.example.com/api/").unwrap();
        assert_eq!(
            config.endpoint("/lists/reorder").unwrap().as_str(),
            "https://flowlog.example.com/api/lists/reorder"
        );
    }

    #[test]
    fn test_host_only_base_url() {
        let config = ClientConfig::new("http://localhost:3001").unwrap();
        assert_eq!(
            config.endpoint("cards/reorder").unwrap().as_str(),
            "http://localhost:3001/cards/reorder"
        );
    }

    #[test]
    fn test_rejects_non_http_url() {
        let err = ClientConfig::new("ftp://example.com").unwrap_err();
        assert!(matches!(err, FlowlogError::ConfigError(_)));
    }

    #[test]
    fn test_rejects_malformed_urls() {
        for raw in ["http://exa mple.com/api", "https://[::1", "http://", "not a url"] {
            let err = ClientConfig::new(raw).unwrap_err();
            assert!(
                matches!(err, FlowlogError::ConfigError(_)),
                "{raw} should be rejected, got {err:?}"
            );
        }
    }

    #[test]
    fn test_with_token() {
        let config = local().with_token(SessionToken::guest());
        assert!(config.token.unwrap().is_guest());
    }

    // Single test so the env mutations never interleave.
    #[test]
    fn test_from_env_defaults_and_overrides() {
        env::remove_var("FLOWLOG_API_URL");
        env::remove_var("FLOWLOG_TOKEN");
        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.api_url.as_str(), "http://127.0.0.1:3001/api/");
        assert!(config.token.is_none());

        env::set_var("FLOWLOG_API_URL", "https://boards.example.com/v1/");
        env::set_var("FLOWLOG_TOKEN", "flowlog-temp-token-7");
        let config = ClientConfig::from_env().unwrap();
        assert_eq!(
            config.endpoint("boards").unwrap().as_str(),
            "https://boards.example.com/v1/boards"
        );
        assert_eq!(config.token.unwrap().user_id(), Some(UserId(7)));

        env::set_var("FLOWLOG_TOKEN", "   ");
        assert!(ClientConfig::from_env().unwrap().token.is_none());

        env::set_var("FLOWLOG_API_URL", "http://exa mple.com");
        let err = ClientConfig::from_env().unwrap_err();
        assert!(matches!(err, FlowlogError::ConfigError(_)));

        env::remove_var("FLOWLOG_API_URL");
        env::remove_var("FLOWLOG_TOKEN");
    }
}
