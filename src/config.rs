use std::path::PathBuf;
use std::time::Duration;

use chrono::Locale;
use clap::Parser;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::RecordIdentity;
use crate::nav::{parse_record_target, UriError};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Parser, Debug)]
#[command(name = "rowlog", about = "Browse the change history of a table record")]
pub struct Cli {
    /// Record to open, as <base>/<table>/<record> or a rowlog:// link
    pub target: Option<String>,

    /// Base URL of the tabular-data API
    #[arg(long, env = "ROWLOG_API_URL")]
    pub api_url: Option<String>,

    /// API token sent as a bearer token
    #[arg(long, env = "ROWLOG_API_TOKEN")]
    pub api_token: Option<String>,

    /// Base id of the record
    #[arg(long, env = "ROWLOG_BASE_ID")]
    pub base_id: Option<String>,

    /// Table id of the record
    #[arg(long, env = "ROWLOG_TABLE_ID")]
    pub table_id: Option<String>,

    /// Record id
    #[arg(long, env = "ROWLOG_RECORD_ID")]
    pub record_id: Option<String>,

    /// Locale for dates, e.g. en_US or de-DE (defaults to $LANG)
    #[arg(long, env = "ROWLOG_LOCALE")]
    pub locale: Option<String>,

    /// TOML file overriding UI strings
    #[arg(long, env = "ROWLOG_STRINGS")]
    pub strings: Option<PathBuf>,

    /// HTTP request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Log file path
    #[arg(long, env = "ROWLOG_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub api_url: Option<String>,
    pub api_token: Option<String>,
    pub base_id: Option<String>,
    pub table_id: Option<String>,
    pub record_id: Option<String>,
    pub locale: Option<String>,
    pub strings: Option<PathBuf>,
    pub timeout: Option<u64>,
}

impl ConfigFile {
    pub fn path() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join("rowlog").join("config.toml"))
    }

    pub fn load() -> Option<Self> {
        let config_path = Self::path()?;
        let content = std::fs::read_to_string(&config_path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!("ignoring {}: {}", config_path.display(), e);
                None
            }
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no API url given (use --api-url or ROWLOG_API_URL)")]
    MissingApiUrl,
    #[error("no record given (pass <base>/<table>/<record> or --base-id/--table-id/--record-id)")]
    MissingRecord,
    #[error("invalid record target: {0}")]
    InvalidRecord(#[from] UriError),
    #[error("unknown locale: {0}")]
    UnknownLocale(String),
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: String,
    pub api_token: Option<String>,
    pub identity: RecordIdentity,
    pub locale: Locale,
    pub strings: Option<PathBuf>,
    pub timeout: Duration,
}

impl Cli {
    /// Merges command-line values over the config file. The command line
    /// always wins; the file only fills gaps.
    pub fn resolve(&self, file: ConfigFile) -> Result<Settings, ConfigError> {
        let api_url = self
            .api_url
            .clone()
            .or(file.api_url)
            .ok_or(ConfigError::MissingApiUrl)?;

        let identity = match &self.target {
            Some(target) => parse_record_target(target)?,
            None => {
                let base = self.base_id.clone().or(file.base_id);
                let table = self.table_id.clone().or(file.table_id);
                let record = self.record_id.clone().or(file.record_id);
                match (base, table, record) {
                    (Some(b), Some(t), Some(r)) => RecordIdentity::new(b, t, r),
                    _ => return Err(ConfigError::MissingRecord),
                }
            }
        };

        let locale = match self.locale.clone().or(file.locale) {
            Some(tag) => parse_locale(&tag).ok_or(ConfigError::UnknownLocale(tag))?,
            None => std::env::var("LANG")
                .ok()
                .and_then(|lang| parse_locale(&lang))
                .unwrap_or(Locale::en_US),
        };

        Ok(Settings {
            api_url,
            api_token: self.api_token.clone().or(file.api_token),
            identity,
            locale,
            strings: self.strings.clone().or(file.strings),
            timeout: Duration::from_secs(
                self.timeout.or(file.timeout).unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        })
    }
}

/// Accepts POSIX (`de_DE.UTF-8`) and BCP 47 (`de-DE`) style tags.
pub fn parse_locale(tag: &str) -> Option<Locale> {
    let base = tag.split(['.', '@']).next().unwrap_or("").replace('-', "_");
    Locale::try_from(base.as_str()).ok()
}
