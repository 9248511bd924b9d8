//! Runtime configuration
//!
//! Defaults point at the production gateway, the iTunes search endpoint and the
//! Google OAuth client. Every value can be overridden from the environment
//! (a `.env` file in the working directory is loaded first, if present).

use anyhow::{Context, Result};

pub const DEFAULT_GATEWAY_URL: &str = "https://script.google.com/macros/s/AKfycbwtfTgh_VX95AR3zYPokQODNzIwxfUf00uWS1wWS5hmCxCAxTtzbbk6PgCe9kPWWO8g/exec";
pub const DEFAULT_SEARCH_URL: &str = "https://itunes.apple.com/search";
pub const DEFAULT_CLIENT_ID: &str = "979114722520-k22qukqaqc699ihho59a15ev3iaogvi4.apps.googleusercontent.com";
pub const DEFAULT_REDIRECT_PORT: u16 = 8899;
pub const DEFAULT_HIDDEN_DOMAIN: &str = "@jamesirwin.org";

const ENV_GATEWAY_URL: &str = "SONG_REQUESTS_GATEWAY_URL";
const ENV_SEARCH_URL: &str = "SONG_REQUESTS_SEARCH_URL";
const ENV_CLIENT_ID: &str = "SONG_REQUESTS_CLIENT_ID";
const ENV_REDIRECT_PORT: &str = "SONG_REQUESTS_REDIRECT_PORT";
const ENV_ACCESS_TOKEN: &str = "SONG_REQUESTS_ACCESS_TOKEN";
const ENV_HIDDEN_DOMAIN: &str = "SONG_REQUESTS_HIDDEN_DOMAIN";

#[derive(Clone, Debug)]
pub struct Config {
    pub gateway_url: String,
    pub search_url: String,
    pub client_id: String,
    pub redirect_port: u16,
    /// Skips the browser login when set
    pub access_token: Option<String>,
    /// Suffix stripped from submitter addresses before display
    pub hidden_domain: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            search_url: DEFAULT_SEARCH_URL.to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            redirect_port: DEFAULT_REDIRECT_PORT,
            access_token: None,
            hidden_domain: Some(DEFAULT_HIDDEN_DOMAIN.to_string()),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup, falling back to defaults
    /// for missing or blank values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let defaults = Self::default();

        let redirect_port = match get(ENV_REDIRECT_PORT) {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("{ENV_REDIRECT_PORT} must be a port number, got '{raw}'"))?,
            None => defaults.redirect_port,
        };

        let config = Self {
            gateway_url: get(ENV_GATEWAY_URL).unwrap_or(defaults.gateway_url),
            search_url: get(ENV_SEARCH_URL).unwrap_or(defaults.search_url),
            client_id: get(ENV_CLIENT_ID).unwrap_or(defaults.client_id),
            redirect_port,
            access_token: get(ENV_ACCESS_TOKEN),
            hidden_domain: get(ENV_HIDDEN_DOMAIN).or(defaults.hidden_domain),
        };

        tracing::debug!(
            gateway_url = %config.gateway_url,
            search_url = %config.search_url,
            redirect_port = config.redirect_port,
            preset_token = config.access_token.is_some(),
            "Configuration loaded"
        );

        Ok(config)
    }
}
