//! Client configuration read from the environment.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `VET_API_BASE_URL` | required | Backend base URL |
//! | `VET_TOKEN_FILE` | unset (memory) | File that persists the bearer token |
//! | `VET_TABLE_PAGE_SIZE` | 10 | Rows per table page |
//! | `VET_CARD_PAGE_SIZE` | 6 | Cards per grid page, clamped to 3..=8 |

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::listing::{PageKind, DEFAULT_CARD_PAGE_SIZE, TABLE_PAGE_SIZE};
use crate::session::{FileTokenStore, MemoryTokenStore, Session, TokenStore};

pub const BASE_URL_VAR: &str = "VET_API_BASE_URL";
pub const TOKEN_FILE_VAR: &str = "VET_TOKEN_FILE";
pub const TABLE_PAGE_SIZE_VAR: &str = "VET_TABLE_PAGE_SIZE";
pub const CARD_PAGE_SIZE_VAR: &str = "VET_CARD_PAGE_SIZE";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{var} has an invalid value: {value}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub token_file: Option<PathBuf>,
    pub table_page_size: usize,
    pub card_page_size: usize,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token_file: None,
            table_page_size: TABLE_PAGE_SIZE,
            card_page_size: DEFAULT_CARD_PAGE_SIZE,
        }
    }

    pub fn with_token_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_file = Some(path.into());
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup(BASE_URL_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing(BASE_URL_VAR))?;
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                var: BASE_URL_VAR,
                value: base_url,
            });
        }

        let mut config = Self::new(base_url);
        config.token_file = lookup(TOKEN_FILE_VAR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        if let Some(size) = parse_size(&lookup, TABLE_PAGE_SIZE_VAR)? {
            config.table_page_size = size;
        }
        if let Some(size) = parse_size(&lookup, CARD_PAGE_SIZE_VAR)? {
            config.card_page_size = PageKind::Cards(size).page_size();
        }
        tracing::debug!(base_url = %config.base_url, "client configuration loaded");
        Ok(config)
    }

    /// Card layout with the configured number of cards per page.
    pub fn card_layout(&self) -> PageKind {
        PageKind::Cards(self.card_page_size)
    }

    /// Page size for a layout. Tables use the configured size; card grids
    /// carry their own, bounded by `PageKind::page_size`.
    pub fn page_size(&self, kind: PageKind) -> usize {
        match kind {
            PageKind::Table => self.table_page_size,
            PageKind::Cards(_) => kind.page_size(),
        }
    }

    /// A session backed by the configured token store.
    pub fn session(&self) -> Session {
        let store: Arc<dyn TokenStore> = match &self.token_file {
            Some(path) => Arc::new(FileTokenStore::new(path)),
            None => Arc::new(MemoryTokenStore::default()),
        };
        Session::new(store)
    }
}

fn parse_size(lookup: &impl Fn(&str) -> Option<String>, var: &'static str) -> Result<Option<usize>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(raw) => match raw.trim().parse::<usize>() {
            Ok(n) if n > 0 => Ok(Some(n)),
            _ => Err(ConfigError::Invalid { var, value: raw }),
        },
    }
}
