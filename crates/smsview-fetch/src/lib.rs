// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use reqwest::header::ACCEPT;
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

pub const DEFAULT_PASTEBIN_BASE_URL: &str = "https://pastebin.com";
const ACCEPT_ANY_JSON: &str = "application/json, text/plain, */*";
const GITHUB_RAW_HOST: &str = "raw.githubusercontent.com";
const MIN_PASTEBIN_KEY_LEN: usize = 5;
const MAX_BARE_KEY_LEN: usize = 20;

/// Where an export comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Pastebin { key: String },
    GitHub { url: String },
    InternetArchive { url: String },
    GenericJson { url: String },
    File { path: PathBuf },
}

/// User-facing wording for one kind of source.
struct SourceText {
    origin: &'static str,
    not_found: &'static str,
    denied: &'static str,
    failed: &'static str,
    empty: &'static str,
    invalid: &'static str,
}

static PASTEBIN_TEXT: SourceText = SourceText {
    origin: "the pastebin data",
    not_found: "Pastebin not found. Please check the key and try again.",
    denied: "Pastebin is private or access denied.",
    failed: "Failed to fetch pastebin data",
    empty: "Pastebin is empty or contains no data",
    invalid: "Pastebin does not contain valid JSON data",
};

static GITHUB_TEXT: SourceText = SourceText {
    origin: "the GitHub data",
    not_found: "GitHub file not found. Please check the URL and try again.",
    denied: "GitHub file access denied. Make sure the repository is public.",
    failed: "Failed to fetch GitHub data",
    empty: "GitHub file is empty or contains no data",
    invalid: "GitHub file does not contain valid JSON data",
};

static ARCHIVE_TEXT: SourceText = SourceText {
    origin: "the Internet Archive data",
    not_found: "Internet Archive file not found. Please check the URL and try again.",
    denied: "Internet Archive file access denied.",
    failed: "Failed to fetch Internet Archive data",
    empty: "Internet Archive file is empty or contains no data",
    invalid: "Internet Archive file does not contain valid JSON data",
};

static GENERIC_TEXT: SourceText = SourceText {
    origin: "the JSON data",
    not_found: "JSON file not found. Please check the URL and try again.",
    denied: "JSON file access denied.",
    failed: "Failed to fetch JSON data",
    empty: "JSON file is empty or contains no data",
    invalid: "File does not contain valid JSON data",
};

static FILE_TEXT: SourceText = SourceText {
    origin: "the JSON file",
    not_found: "Export file not found. Please check the path and try again.",
    denied: "Export file access denied.",
    failed: "Error reading file",
    empty: "JSON file is empty or contains no data",
    invalid: "Error parsing JSON file",
};

impl Source {
    /// Sniffs a pasted URL or bare key. Pastebin, GitHub and Internet
    /// Archive are recognized by host text; short alphanumeric input is a
    /// Pastebin key; anything else must be an absolute URL.
    pub fn detect(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            bail!("no URL or key given");
        }

        if input.contains("pastebin.com") {
            return Self::pastebin(&pastebin_key_from_url(input)?);
        }
        if input.contains("github.com") || input.contains("githubusercontent.com") {
            return Self::github(input);
        }
        if input.contains("archive.org") {
            return Self::internet_archive(input);
        }
        if input.len() <= MAX_BARE_KEY_LEN && input.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Self::pastebin(input);
        }
        Self::generic(input).map_err(|_| {
            anyhow!(
                "Invalid URL format. Please use a valid JSON URL, Pastebin, GitHub, or Internet Archive URL."
            )
        })
    }

    /// Strips everything but ASCII letters and digits.
    pub fn pastebin(raw_key: &str) -> Result<Self> {
        let key: String = raw_key
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect();
        if key.len() < MIN_PASTEBIN_KEY_LEN {
            bail!("Invalid pastebin key format");
        }
        Ok(Self::Pastebin { key })
    }

    /// Accepts raw URLs as-is and rewrites `github.com/.../blob/...` page
    /// URLs to their raw-content form.
    pub fn github(input: &str) -> Result<Self> {
        let raw = if input.contains("github.com") && !input.contains(GITHUB_RAW_HOST) {
            input
                .replacen("github.com", GITHUB_RAW_HOST, 1)
                .replacen("/blob/", "/", 1)
        } else {
            input.to_owned()
        };

        let url = Url::parse(&raw).with_context(|| format!("invalid GitHub URL {input:?}"))?;
        let host = url.host_str().unwrap_or_default();
        if !host.contains("githubusercontent.com") && !host.contains("github.com") {
            bail!("Invalid GitHub URL format");
        }
        Ok(Self::GitHub {
            url: url.to_string(),
        })
    }

    pub fn internet_archive(input: &str) -> Result<Self> {
        let url =
            Url::parse(input).with_context(|| format!("invalid Internet Archive URL {input:?}"))?;
        if !url.host_str().unwrap_or_default().contains("archive.org") {
            bail!("Invalid Internet Archive URL format");
        }
        Ok(Self::InternetArchive {
            url: url.to_string(),
        })
    }

    pub fn generic(input: &str) -> Result<Self> {
        let url = Url::parse(input).with_context(|| format!("invalid JSON URL {input:?}"))?;
        if url.host_str().is_none() {
            bail!("JSON URL {input:?} has no host");
        }
        Ok(Self::GenericJson {
            url: url.to_string(),
        })
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File { path: path.into() }
    }

    /// Message shown when an export parses but holds no records.
    pub fn empty_export_message(&self) -> String {
        format!("No messages found in {}", self.text().origin)
    }

    fn text(&self) -> &'static SourceText {
        match self {
            Self::Pastebin { .. } => &PASTEBIN_TEXT,
            Self::GitHub { .. } => &GITHUB_TEXT,
            Self::InternetArchive { .. } => &ARCHIVE_TEXT,
            Self::GenericJson { .. } => &GENERIC_TEXT,
            Self::File { .. } => &FILE_TEXT,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pastebin { key } => write!(f, "pastebin {key}"),
            Self::GitHub { url } => write!(f, "GitHub {url}"),
            Self::InternetArchive { url } => write!(f, "Internet Archive {url}"),
            Self::GenericJson { url } => write!(f, "JSON URL {url}"),
            Self::File { path } => write!(f, "file {}", path.display()),
        }
    }
}

/// A parsed export and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedExport {
    pub source: Source,
    pub value: Value,
}

#[derive(Debug, Clone)]
pub struct Client {
    pastebin_base_url: String,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(pastebin_base_url: &str, timeout: Duration) -> Result<Self> {
        let pastebin_base_url = pastebin_base_url.trim_end_matches('/').to_owned();
        if pastebin_base_url.is_empty() {
            bail!("fetch.pastebin_base_url must not be empty");
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            pastebin_base_url,
            timeout,
            http,
        })
    }

    pub fn pastebin_base_url(&self) -> &str {
        &self.pastebin_base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolves the request URL for a remote source; `None` for files.
    pub fn request_url(&self, source: &Source) -> Option<String> {
        match source {
            Source::Pastebin { key } => Some(format!("{}/raw/{key}", self.pastebin_base_url)),
            Source::GitHub { url } | Source::InternetArchive { url } | Source::GenericJson { url } => {
                Some(url.clone())
            }
            Source::File { .. } => None,
        }
    }

    /// Reads or downloads the export and parses it as JSON. Interpreting
    /// the JSON is left to the caller.
    pub fn load(&self, source: &Source) -> Result<LoadedExport> {
        let value = match (source, self.request_url(source)) {
            (Source::File { path }, _) => read_export_file(path)?,
            (_, Some(url)) => self.fetch_json(&url, source.text())?,
            (_, None) => bail!("no request URL for {source}"),
        };
        info!(%source, "loaded export");
        Ok(LoadedExport {
            source: source.clone(),
            value,
        })
    }

    fn fetch_json(&self, url: &str, text: &SourceText) -> Result<Value> {
        debug!(url, "fetching export");
        let response = self
            .http
            .get(url)
            .header(ACCEPT, ACCEPT_ANY_JSON)
            .send()
            .map_err(|error| connection_error(url, self.timeout, error))?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, text));
        }

        let body = response.text().context("read response body")?;
        parse_body(&body, text)
    }
}

pub fn read_export_file(path: &Path) -> Result<Value> {
    let body =
        fs::read_to_string(path).with_context(|| format!("{} {}", FILE_TEXT.failed, path.display()))?;
    parse_body(&body, &FILE_TEXT)
}

fn parse_body(body: &str, text: &SourceText) -> Result<Value> {
    if body.trim().is_empty() {
        bail!("{}", text.empty);
    }
    serde_json::from_str(body).map_err(|error| anyhow!("{}: {error}", text.invalid))
}

// `pastebin.com/<key>` or `pastebin.com/raw/<key>`.
fn pastebin_key_from_url(input: &str) -> Result<String> {
    let (_, rest) = input
        .split_once("pastebin.com/")
        .ok_or_else(|| anyhow!("Invalid pastebin URL {input:?}"))?;
    let rest = rest.strip_prefix("raw/").unwrap_or(rest);
    let key: String = rest
        .chars()
        .take_while(char::is_ascii_alphanumeric)
        .collect();
    if key.is_empty() {
        bail!("Invalid pastebin URL {input:?}");
    }
    Ok(key)
}

fn connection_error(url: &str, timeout: Duration, error: reqwest::Error) -> anyhow::Error {
    if error.is_timeout() {
        return anyhow!("timed out after {timeout:?} fetching {url}");
    }
    anyhow!("cannot reach {url} ({error})")
}

fn status_error(status: StatusCode, text: &SourceText) -> anyhow::Error {
    match status {
        StatusCode::NOT_FOUND => anyhow!("{}", text.not_found),
        StatusCode::FORBIDDEN => anyhow!("{}", text.denied),
        _ => anyhow!("{} ({})", text.failed, status.as_u16()),
    }
}
