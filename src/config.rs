//! Portal connection settings.
//!
//! Each setting is resolved in priority order: CLI flag, then environment
//! variable, then the built-in default (the URL only).
use anyhow::{anyhow, Result};
use std::env;

pub const DEFAULT_PORTAL_URL: &str = "https://developer.apple.com/services-account/v1";
pub const PORTAL_URL_ENV: &str = "DEVPORTAL_URL";
pub const USERNAME_ENV: &str = "DEVPORTAL_USERNAME";
pub const PASSWORD_ENV: &str = "DEVPORTAL_PASSWORD";

#[derive(Clone)]
pub struct PortalConfig {
    pub base_url: String,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for PortalConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortalConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Raw values as they arrived on the command line.
#[derive(Debug, Default)]
pub struct ConfigInputs<'a> {
    pub portal_url: Option<&'a str>,
    pub username: Option<&'a str>,
    pub password: Option<&'a str>,
}

impl PortalConfig {
    pub fn resolve(inputs: &ConfigInputs<'_>) -> Result<Self> {
        Self::resolve_with(inputs, |key| env::var(key).ok())
    }

    fn resolve_with(
        inputs: &ConfigInputs<'_>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let pick = |flag: Option<&str>, key: &str| {
            flag.map(str::to_string)
                .or_else(|| lookup(key))
                .filter(|value| !value.trim().is_empty())
        };

        let base_url = pick(inputs.portal_url, PORTAL_URL_ENV)
            .unwrap_or_else(|| DEFAULT_PORTAL_URL.to_string());
        let username = pick(inputs.username, USERNAME_ENV)
            .ok_or_else(|| anyhow!("--username (or {USERNAME_ENV}) is required"))?;
        let password = pick(inputs.password, PASSWORD_ENV)
            .ok_or_else(|| anyhow!("--password (or {PASSWORD_ENV}) is required"))?;

        Ok(Self {
            base_url: normalize_base_url(&base_url)?,
            username,
            password,
        })
    }
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(anyhow!("portal url must be http(s) (got {raw:?})"));
    }
    Ok(trimmed.to_string())
}
