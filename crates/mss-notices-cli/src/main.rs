use std::path::PathBuf;
use std::process;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use mss_notices::config::{BASE_URL, ScraperConfig, parse_base_url};
use mss_notices::retry::RetryPolicy;
use mss_notices::sink::{HtmlEmbed, JsonFile, NoticeSink};
use mss_notices::types::Notice;
use mss_notices::utils::DateWindow;
use mss_notices::WebScraper;

#[derive(Parser)]
#[command(name = "mss-notices")]
#[command(about = "Collects the last N days of www.mss.go.kr notices", long_about = None)]
struct Cli {
    #[arg(
        value_name = "DAYS",
        help = "Number of days to collect, today included",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    days: u32,

    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        default_value = "notices.json",
        help = "Where to write the collected notices as JSON"
    )]
    output: PathBuf,

    #[arg(
        long,
        value_name = "PATH",
        default_value = "mss_notice.html",
        help = "Page whose notices-data block receives the JSON"
    )]
    html: PathBuf,

    #[arg(long, help = "Skip embedding the JSON into the HTML page")]
    no_embed: bool,

    #[arg(
        long,
        value_name = "URL",
        default_value = BASE_URL,
        help = "Site origin to crawl",
        value_parser = parse_base_url
    )]
    base_url: String,

    #[arg(
        long,
        value_name = "N",
        help = "Give up on a listing page after N failed attempts (default: retry forever)",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    max_list_attempts: Option<u32>,

    #[arg(
        short = 'f',
        long = "format",
        value_enum,
        default_value = "text",
        help = "What to print on stdout"
    )]
    format: OutputFormat,

    #[arg(
        short = 'l',
        long = "log-level",
        value_enum,
        default_value = "info",
        help = "Set the logging level"
    )]
    log_level: LogLevel,
}

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    fn scraper_config(&self) -> ScraperConfig {
        let mut config = ScraperConfig {
            base_url: self.base_url.clone(),
            ..ScraperConfig::default()
        };
        if let Some(max) = self.max_list_attempts {
            config.listing_retry = RetryPolicy::bounded(max, config.listing_retry.delay);
        }
        config
    }
}

fn print_notices(notices: &[Notice], format: &OutputFormat) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(notices) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                log::error!("Error serializing to JSON: {}", e);
                process::exit(1);
            }
        },
        OutputFormat::Text => {
            if notices.is_empty() {
                println!("No notices in range.");
            } else {
                for (i, notice) in notices.iter().enumerate() {
                    println!("{:>3}. {}", i + 1, notice);
                }
            }
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.clone().into())
        .init();

    let window = DateWindow::last_days(cli.days).unwrap_or_else(|e| {
        log::error!("Invalid args: {e}");
        process::exit(1);
    });

    let config = cli.scraper_config();
    if config.listing_retry.max_attempts.is_none() {
        log::debug!(
            "Listing requests retry every {:?} without limit",
            config.listing_retry.delay
        );
    }

    let scraper = WebScraper::with_config(config).unwrap_or_else(|e| {
        log::error!("Error creating scraper: {}", e);
        process::exit(1);
    });

    let started = Instant::now();
    let notices = scraper.crawl(window).await.unwrap_or_else(|e| {
        log::error!("Error crawling notices: {}", e);
        process::exit(1);
    });
    log::info!("Crawl finished in {:.1?}", started.elapsed());

    let mut sinks: Vec<Box<dyn NoticeSink>> = vec![Box::new(JsonFile::new(&cli.output))];
    if cli.no_embed {
        log::info!("Embedding into {} skipped", cli.html.display());
    } else {
        sinks.push(Box::new(HtmlEmbed::new(&cli.html)));
    }

    for sink in &sinks {
        if let Err(e) = sink.publish(&notices) {
            log::error!("Error publishing notices: {}", e);
            process::exit(1);
        }
    }

    print_notices(&notices, &cli.format);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_must_be_positive_integer() {
        assert!(Cli::try_parse_from(["mss-notices"]).is_err());
        assert!(Cli::try_parse_from(["mss-notices", "0"]).is_err());
        assert!(Cli::try_parse_from(["mss-notices", "-3"]).is_err());
        assert!(Cli::try_parse_from(["mss-notices", "seven"]).is_err());
        assert_eq!(Cli::try_parse_from(["mss-notices", "7"]).unwrap().days, 7);
    }

    #[test]
    fn test_base_url_must_be_http_url() {
        for bad in ["not a url", "www.mss.go.kr", "ftp://www.mss.go.kr", ""] {
            assert!(
                Cli::try_parse_from(["mss-notices", "7", "--base-url", bad]).is_err(),
                "{bad:?} accepted"
            );
        }
    }

    #[test]
    fn test_scraper_config_defaults() {
        let cli = Cli::try_parse_from(["mss-notices", "7"]).unwrap();
        let config = cli.scraper_config();

        assert_eq!(config.base_url, BASE_URL);
        assert_eq!(config.listing_retry.max_attempts, None);
        assert_eq!(config.detail_retry.max_attempts, Some(3));
        assert_eq!(cli.output, PathBuf::from("notices.json"));
        assert_eq!(cli.html, PathBuf::from("mss_notice.html"));
        assert!(!cli.no_embed);
    }

    #[test]
    fn test_scraper_config_overrides() {
        let cli = Cli::try_parse_from([
            "mss-notices",
            "3",
            "--base-url",
            "http://localhost:8080",
            "--max-list-attempts",
            "5",
            "--no-embed",
            "-o",
            "out.json",
        ])
        .unwrap();
        let config = cli.scraper_config();

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.listing_retry.max_attempts, Some(5));
        assert!(cli.no_embed);
        assert_eq!(cli.output, PathBuf::from("out.json"));
    }
}
