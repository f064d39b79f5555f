// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use smsview_fetch::DEFAULT_PASTEBIN_BASE_URL;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const APP_NAME: &str = "smsview";
const CONFIG_VERSION: i64 = 1;
const CONFIG_PATH_ENV: &str = "SMSVIEW_CONFIG_PATH";
const DEFAULT_TIMEOUT: &str = "10s";
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub fetch: Fetch,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            fetch: Fetch::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Fetch {
    pub timeout: Option<String>,
    pub pastebin_base_url: Option<String>,
}

impl Default for Fetch {
    fn default() -> Self {
        Self {
            timeout: Some(DEFAULT_TIMEOUT.to_owned()),
            pastebin_base_url: Some(DEFAULT_PASTEBIN_BASE_URL.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Log {
    pub filter: Option<String>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set {CONFIG_PATH_ENV} to the config file")
        })?;
        Ok(config_root.join(APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and put values under [fetch] and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(timeout) = &self.fetch.timeout {
            let parsed = parse_duration(timeout)?;
            if parsed <= Duration::ZERO {
                bail!(
                    "fetch.timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
        }

        if let Some(base_url) = &self.fetch.pastebin_base_url {
            url::Url::parse(base_url).with_context(|| {
                format!(
                    "fetch.pastebin_base_url in {} is not a valid URL: {base_url:?}",
                    path.display()
                )
            })?;
        }

        if let Some(filter) = &self.log.filter
            && filter.trim().is_empty()
        {
            bail!("log.filter in {} must not be blank", path.display());
        }

        Ok(())
    }

    pub fn fetch_timeout(&self) -> Result<Duration> {
        parse_duration(self.fetch.timeout.as_deref().unwrap_or(DEFAULT_TIMEOUT))
    }

    pub fn pastebin_base_url(&self) -> &str {
        self.fetch
            .pastebin_base_url
            .as_deref()
            .unwrap_or(DEFAULT_PASTEBIN_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn log_filter(&self) -> &str {
        self.log.filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# smsview config\n# Place this file at: {}\n\nversion = 1\n\n[fetch]\ntimeout = \"{}\"\npastebin_base_url = \"{}\"\n\n[log]\n# RUST_LOG overrides this when set\nfilter = \"{}\"\n",
            path.display(),
            DEFAULT_TIMEOUT,
            DEFAULT_PASTEBIN_BASE_URL,
            DEFAULT_LOG_FILTER,
        )
    }
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(mins * 60));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 5s)")
}
