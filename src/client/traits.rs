use async_trait::async_trait;
use thiserror::Error;

use crate::domain::RecordIdentity;

/// Entries requested per page. The history endpoint is always asked for
/// this many.
pub const HISTORY_PAGE_SIZE: u32 = 50;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("connection error: {0}")]
    ConnectionError(String),
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("parse error: {0}")]
    ParseError(String),
    #[error("config error: {0}")]
    ConfigError(String),
    #[error("timeout")]
    Timeout,
}

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    pub identity: RecordIdentity,
    pub page: u32,
    pub page_size: u32,
}

impl HistoryQuery {
    pub fn new(identity: RecordIdentity, page: u32) -> Self {
        Self {
            identity,
            page,
            page_size: HISTORY_PAGE_SIZE,
        }
    }
}

/// Source of raw history payloads. Implementations return the response body
/// untouched; unwrapping and decoding happen in [`super::decode_history_page`]
/// so that every transport shares the same tolerance for envelope shapes.
#[async_trait]
pub trait HistoryClient: Send + Sync {
    async fn fetch_history(&self, query: &HistoryQuery) -> ClientResult<serde_json::Value>;
}
