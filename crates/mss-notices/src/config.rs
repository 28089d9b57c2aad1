use std::time::Duration;

use reqwest::Url;

use crate::retry::RetryPolicy;
use crate::types::ItemReference;

pub const BASE_URL: &str = "https://www.mss.go.kr";
pub const BOARD_ID: u32 = 81;
pub const USER_AGENT: &str = "Mozilla/5.0";
pub const FETCH_FAILED: &str = "[fetch failed]";

const LIST_PATH: &str = "/site/smba/ex/bbs/List.do";
const VIEW_PATH: &str = "/site/smba/ex/bbs/View.do";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Accepts an absolute `http`/`https` origin such as `https://www.mss.go.kr`.
pub fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if !url.has_host() {
        return Err(invalid("no host".to_string()));
    }

    Ok(raw.trim().to_string())
}

/// Endpoints, request settings and pacing for one [`WebScraper`](crate::WebScraper).
///
/// `Default` targets the live site; tests swap in a local base URL and zero delays.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub base_url: String,
    pub board_id: u32,
    pub user_agent: String,
    pub timeout: Duration,
    /// Pause after each kept row.
    pub row_delay: Duration,
    /// Pause between listing pages.
    pub page_delay: Duration,
    pub listing_retry: RetryPolicy,
    pub detail_retry: RetryPolicy,
    /// Content recorded for a notice whose detail page never came back.
    pub fetch_failed: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            board_id: BOARD_ID,
            user_agent: USER_AGENT.to_string(),
            timeout: Duration::from_secs(10),
            row_delay: Duration::from_millis(500),
            page_delay: Duration::from_secs(1),
            // Unbounded: a listing endpoint that never recovers blocks the crawl.
            listing_retry: RetryPolicy::unbounded(Duration::from_secs(3)),
            detail_retry: RetryPolicy::bounded(3, Duration::from_secs(3)),
            fetch_failed: FETCH_FAILED.to_string(),
        }
    }
}

impl ScraperConfig {
    /// Default settings against another origin, with every pause set to zero.
    pub fn immediate(base_url: impl Into<String>) -> Self {
        let defaults = Self::default();
        Self {
            base_url: base_url.into(),
            row_delay: Duration::ZERO,
            page_delay: Duration::ZERO,
            listing_retry: RetryPolicy {
                delay: Duration::ZERO,
                ..defaults.listing_retry
            },
            detail_retry: RetryPolicy {
                delay: Duration::ZERO,
                ..defaults.detail_retry
            },
            ..defaults
        }
    }

    pub fn listing_url(&self, page: u32) -> String {
        format!(
            "{}{}?cbIdx={}&pageIndex={}",
            self.base_url.trim_end_matches('/'),
            LIST_PATH,
            self.board_id,
            page
        )
    }

    pub fn detail_url(&self, reference: &ItemReference) -> String {
        format!(
            "{}{}?cbIdx={}&bcIdx={}&parentSeq={}",
            self.base_url.trim_end_matches('/'),
            VIEW_PATH,
            self.board_id,
            reference.board_index,
            reference.parent_seq
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_urls() {
        let config = ScraperConfig::default();
        assert_eq!(
            config.listing_url(2),
            "https://www.mss.go.kr/site/smba/ex/bbs/List.do?cbIdx=81&pageIndex=2"
        );
        assert_eq!(
            config.detail_url(&ItemReference::new("12345", "67890")),
            "https://www.mss.go.kr/site/smba/ex/bbs/View.do?cbIdx=81&bcIdx=12345&parentSeq=67890"
        );
    }

    #[test]
    fn test_parse_base_url() {
        assert_eq!(parse_base_url(BASE_URL).unwrap(), BASE_URL);
        assert_eq!(
            parse_base_url(" http://127.0.0.1:8080/ ").unwrap(),
            "http://127.0.0.1:8080/"
        );

        for bad in ["not a url", "", "www.mss.go.kr", "localhost:8080", "ftp://mss.go.kr"] {
            let err = parse_base_url(bad).unwrap_err();
            assert!(
                matches!(&err, ConfigError::InvalidBaseUrl { url, .. } if url == bad),
                "{bad:?} accepted: {err}"
            );
        }
    }

    #[test]
    fn test_immediate_keeps_retry_limits() {
        let config = ScraperConfig::immediate("http://127.0.0.1:9/");
        assert_eq!(
            config.listing_url(1),
            "http://127.0.0.1:9/site/smba/ex/bbs/List.do?cbIdx=81&pageIndex=1"
        );
        assert!(config.row_delay.is_zero());
        assert!(config.page_delay.is_zero());
        assert_eq!(config.listing_retry.max_attempts, None);
        assert_eq!(config.detail_retry.max_attempts, Some(3));
        assert!(config.detail_retry.delay.is_zero());
    }
}
