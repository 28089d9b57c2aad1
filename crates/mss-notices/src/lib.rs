pub mod config;
pub mod parser;
pub mod reference;
pub mod retry;
pub mod scraper;
pub mod sink;
pub mod text;
pub mod transport;
pub mod types;
pub mod utils;

pub use config::ScraperConfig;
pub use scraper::{ScraperError, WebScraper};
