use std::time::Duration;

use crate::config::{ConfigError, ScraperConfig, parse_base_url};
use crate::parser::{ListingRow, parse_date, parse_detail_content, parse_listing_page};
use crate::reference::extract_reference;
use crate::retry::retry;
use crate::transport::{HttpTransport, Transport};
use crate::types::{ItemReference, Notice};
use crate::utils::{DateWindow, WindowError, WindowPosition};

#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("HTTP client setup failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Invalid date window: {0}")]
    Window(#[from] WindowError),
    #[error("Listing page {page} unavailable after {attempts} attempt(s): {reason}")]
    ListingUnavailable {
        page: u32,
        attempts: u32,
        reason: String,
    },
}

/// Walks the notice board page by page and collects the notices of a date window.
///
/// Every request and pause is awaited in turn: one request in flight at most.
#[derive(Debug, Clone)]
pub struct WebScraper<T = HttpTransport> {
    transport: T,
    config: ScraperConfig,
}

impl WebScraper<HttpTransport> {
    pub fn new() -> Result<Self, ScraperError> {
        Self::with_config(ScraperConfig::default())
    }

    /// Rejects a `base_url` that is not an absolute http(s) URL before any request.
    pub fn with_config(config: ScraperConfig) -> Result<Self, ScraperError> {
        parse_base_url(&config.base_url)?;
        let transport = HttpTransport::new(&config)?;
        Ok(Self { transport, config })
    }
}

impl<T: Transport> WebScraper<T> {
    pub fn with_transport(transport: T, config: ScraperConfig) -> Self {
        Self { transport, config }
    }

    /// Crawls the last `days` days, today included.
    pub async fn crawl_days(&self, days: u32) -> Result<Vec<Notice>, ScraperError> {
        let window = DateWindow::last_days(days)?;
        self.crawl(window).await
    }

    /// Collects every notice dated inside `window`, in listing order.
    ///
    /// Assumes the board lists notices newest first: the first row older than
    /// the window ends the crawl. A page without rows ends it as well.
    ///
    /// With the default unbounded listing retry policy a listing endpoint that
    /// never recovers keeps this future pending forever. Only a bounded
    /// `listing_retry` makes it return [`ScraperError::ListingUnavailable`].
    pub async fn crawl(&self, window: DateWindow) -> Result<Vec<Notice>, ScraperError> {
        log::info!("Crawling notices published {}", window);

        let mut notices = Vec::new();
        let mut page = 1;

        loop {
            let rows = self.fetch_listing_page(page).await?;
            if rows.is_empty() {
                log::info!("Listing page {} has no rows; end of listing", page);
                break;
            }

            if self.scan_rows(rows, &window, &mut notices).await {
                log::info!("Listing page {} passed {}; stopping", page, window.start());
                break;
            }

            page += 1;
            pause(self.config.page_delay).await;
        }

        log::info!("Collected {} notice(s) after {} listing page(s)", notices.len(), page);
        Ok(notices)
    }

    /// Fetches and parses one detail page.
    ///
    /// Never fails: a page without a content region yields `""`, and a page that
    /// could not be fetched within the retry policy yields the configured
    /// `fetch_failed` text.
    pub async fn fetch_detail(&self, reference: &ItemReference) -> String {
        let url = self.config.detail_url(reference);
        log::debug!("Fetching detail page {}", url);

        let transport = &self.transport;
        let url = url.as_str();
        let what = format!("Detail request ({reference})");

        let attempt = move |_: u32| transport.get(url);
        match retry(&self.config.detail_retry, &what, T::is_transient, attempt).await {
            Ok(html) => parse_detail_content(&html),
            Err(e) => {
                log::warn!("Recording '{}' for {}: {}", self.config.fetch_failed, reference, e);
                self.config.fetch_failed.clone()
            }
        }
    }

    async fn fetch_listing_page(&self, page: u32) -> Result<Vec<ListingRow>, ScraperError> {
        let url = self.config.listing_url(page);
        log::info!("Fetching listing page {}...", page);

        let transport = &self.transport;
        let url = url.as_str();
        let what = format!("Listing request (page {page})");

        let attempt = move |_: u32| transport.get(url);
        let html = retry(&self.config.listing_retry, &what, T::is_transient, attempt)
            .await
            .map_err(|e| ScraperError::ListingUnavailable {
                page,
                attempts: e.attempts,
                reason: e.source.to_string(),
            })?;

        Ok(parse_listing_page(&html))
    }

    /// Returns `true` once a row older than the window is reached.
    async fn scan_rows(
        &self,
        rows: Vec<ListingRow>,
        window: &DateWindow,
        notices: &mut Vec<Notice>,
    ) -> bool {
        for row in rows {
            let Some(reference) = row.reference.as_deref().and_then(extract_reference) else {
                log::debug!("Skipping row without a view reference: {}", row.title);
                continue;
            };

            let date = match parse_date(&row.date_text) {
                Ok(date) => date,
                Err(e) => {
                    log::warn!("Skipping '{}': {}", row.title, e);
                    continue;
                }
            };

            match window.position(date) {
                WindowPosition::Before => return true,
                WindowPosition::After => {
                    log::debug!("Skipping future-dated '{}' ({})", row.title, date);
                }
                WindowPosition::Within => {
                    let content = self.fetch_detail(&reference).await;
                    notices.push(Notice::new(row.title, date, row.date_text, content));
                    pause(self.config.row_delay).await;
                }
            }
        }
        false
    }
}

async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}
