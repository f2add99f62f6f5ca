//! Client configuration.
//!
//! Built in code with [`ClientConfig::new`] and the `with_*` methods, or read
//! from the environment:
//!
//! - `BILLING_API_URL` (required): base URL, e.g. `https://api.example.com/v2.1`
//! - `BILLING_API_TIMEOUT_SECS`: request timeout, default 30
//! - `BILLING_PAGE_SIZE`: default paginator page size, default 100
//! - `BILLING_TOTAL_COUNT_HEADER`: header carrying list totals, default
//!   `Pagination-Total`

use std::num::NonZeroU32;
use std::time::Duration;

use crate::collection::TotalCountSource;
use crate::error::{ApiError, Result};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_PAGE_SIZE: NonZeroU32 = match NonZeroU32::new(100) {
    Some(size) => size,
    None => panic!("default page size is zero"),
};

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// Page size used by paginators created through a service.
    pub page_size: NonZeroU32,
    pub total_count: TotalCountSource,
    pub user_agent: String,
    /// Extra headers sent with every request.
    pub default_headers: Vec<(String, String)>,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
            page_size: DEFAULT_PAGE_SIZE,
            total_count: TotalCountSource::default(),
            user_agent: format!("billing-core/{}", env!("CARGO_PKG_VERSION")),
            default_headers: Vec::new(),
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = lookup("BILLING_API_URL").ok_or_else(|| ApiError::Config {
            message: "BILLING_API_URL is not set".to_string(),
        })?;
        let mut config = Self::new(&base_url);

        if let Some(raw) = lookup("BILLING_API_TIMEOUT_SECS") {
            let secs = parse_number::<u64>("BILLING_API_TIMEOUT_SECS", &raw)?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(raw) = lookup("BILLING_PAGE_SIZE") {
            let size = parse_number::<u32>("BILLING_PAGE_SIZE", &raw)?;
            config = config.with_page_size(size)?;
        }
        if let Some(header) = lookup("BILLING_TOTAL_COUNT_HEADER") {
            config = config.with_total_count(TotalCountSource::Header(header));
        }
        Ok(config)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fails with `ApiError::Config` for zero.
    pub fn with_page_size(mut self, page_size: u32) -> Result<Self> {
        self.page_size = nonzero_page_size(page_size)?;
        Ok(self)
    }

    pub fn with_total_count(mut self, source: TotalCountSource) -> Self {
        self.total_count = source;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }
}

pub(crate) fn nonzero_page_size(page_size: u32) -> Result<NonZeroU32> {
    NonZeroU32::new(page_size).ok_or_else(|| ApiError::Config {
        message: "page size must be at least 1".to_string(),
    })
}

fn parse_number<N: std::str::FromStr>(key: &str, raw: &str) -> Result<N> {
    raw.trim().parse().map_err(|_| ApiError::Config {
        message: format!("{key} must be a non-negative integer, got {raw:?}"),
    })
}
