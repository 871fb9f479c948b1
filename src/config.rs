//! Application configuration loaded from environment variables.
//!
//! Every variable is optional and falls back to the local development
//! defaults of the portfolio services:
//! - `FOLIO_GATEWAY_URL`: base URL of the API gateway (auth, portfolio, analytics)
//! - `FOLIO_MARKET_DATA_URL`: base URL of the market-data service
//! - `FOLIO_STREAM_URL`: WebSocket endpoint of the analytics risk stream
//! - `FOLIO_POLL_INTERVAL_SECS`: fallback poll period for risk snapshots
//! - `FOLIO_PRICE_REFRESH_SECS`: auto-refresh period for the market view
//! - `FOLIO_USER_ID`: user whose risk stream is subscribed
//! - `FOLIO_DATA_DIR`: directory for the local key-value store

use std::path::PathBuf;
use std::time::Duration;

/// Default gateway base URL (auth, portfolio, analytics routes).
const DEFAULT_GATEWAY_URL: &str = "http://localhost:8080";

/// Default market-data service base URL.
const DEFAULT_MARKET_DATA_URL: &str = "http://localhost:8083";

/// Default risk stream endpoint.
const DEFAULT_STREAM_URL: &str = "ws://localhost:8080/analytics/stream";

/// Default fallback poll period in seconds.
const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Default market-price auto-refresh period in seconds.
const DEFAULT_PRICE_REFRESH_SECS: u64 = 30;

/// Default risk-stream subscription target.
const DEFAULT_USER_ID: u64 = 1;

/// Default data directory for persisted client state.
const DEFAULT_DATA_DIR: &str = ".folio";

/// Top-level application configuration.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub services: ServiceConfig,
    pub feed: FeedConfig,
    /// Directory holding the local key-value store.
    pub data_dir: PathBuf,
}

/// Base URLs of the remote services.
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub gateway_url: String,
    pub market_data_url: String,
}

/// Live-feed tuning values.
#[derive(Clone, Debug)]
pub struct FeedConfig {
    /// WebSocket endpoint delivering risk snapshots.
    pub stream_url: String,
    /// Period of the fallback poller.
    pub poll_interval: Duration,
    /// Period of the market-price auto-refresh.
    pub price_refresh_interval: Duration,
    /// User whose risk stream is subscribed.
    pub user_id: u64,
}

/// Loads the application configuration from environment variables.
///
/// # Errors
///
/// Returns [`FolioError::Config`](crate::FolioError::Config) if a numeric
/// variable is set but does not parse.
pub fn fetch_config() -> crate::Result<AppConfig> {
    let gateway_url =
        non_empty_var("FOLIO_GATEWAY_URL").unwrap_or_else(|| DEFAULT_GATEWAY_URL.to_string());
    let market_data_url = non_empty_var("FOLIO_MARKET_DATA_URL")
        .unwrap_or_else(|| DEFAULT_MARKET_DATA_URL.to_string());
    let stream_url =
        non_empty_var("FOLIO_STREAM_URL").unwrap_or_else(|| DEFAULT_STREAM_URL.to_string());

    let poll_secs = parse_var("FOLIO_POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?;
    let refresh_secs = parse_var("FOLIO_PRICE_REFRESH_SECS", DEFAULT_PRICE_REFRESH_SECS)?;
    let user_id = parse_var("FOLIO_USER_ID", DEFAULT_USER_ID)?;

    let data_dir = non_empty_var("FOLIO_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

    Ok(AppConfig {
        services: ServiceConfig {
            gateway_url,
            market_data_url,
        },
        feed: FeedConfig {
            stream_url,
            poll_interval: Duration::from_secs(poll_secs),
            price_refresh_interval: Duration::from_secs(refresh_secs),
            user_id,
        },
        data_dir,
    })
}

/// Returns the value of an environment variable if it exists and is non-empty.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

/// Parses a numeric environment variable, falling back to `default` when unset.
fn parse_var(name: &str, default: u64) -> crate::Result<u64> {
    match non_empty_var(name) {
        Some(raw) => raw
            .parse()
            .map_err(|_| crate::FolioError::Config(format!("{name} is not a number: {raw}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper that temporarily sets env vars, runs `f`, then restores originals.
    ///
    /// # Safety
    ///
    /// Tests using this helper must run with `--test-threads=1` or otherwise
    /// ensure no other threads read these env vars concurrently.
    fn with_env<F: FnOnce()>(vars: &[(&str, Option<&str>)], f: F) {
        let originals: Vec<(&str, Option<String>)> = vars
            .iter()
            .map(|(k, _)| (*k, std::env::var(k).ok()))
            .collect();

        for (k, v) in vars {
            // SAFETY: config tests run single-threaded (see test runner config).
            unsafe {
                match v {
                    Some(val) => std::env::set_var(k, val),
                    None => std::env::remove_var(k),
                }
            }
        }

        f();

        for (k, original) in originals {
            // SAFETY: restoring original values, same single-threaded context.
            unsafe {
                match original {
                    Some(val) => std::env::set_var(k, val),
                    None => std::env::remove_var(k),
                }
            }
        }
    }

    #[test]
    fn defaults_without_env_vars() {
        with_env(
            &[
                ("FOLIO_GATEWAY_URL", None),
                ("FOLIO_MARKET_DATA_URL", None),
                ("FOLIO_STREAM_URL", None),
                ("FOLIO_POLL_INTERVAL_SECS", None),
                ("FOLIO_PRICE_REFRESH_SECS", None),
                ("FOLIO_USER_ID", None),
                ("FOLIO_DATA_DIR", None),
            ],
            || {
                let config = fetch_config().unwrap();
                assert_eq!(config.services.gateway_url, DEFAULT_GATEWAY_URL);
                assert_eq!(config.services.market_data_url, DEFAULT_MARKET_DATA_URL);
                assert_eq!(config.feed.stream_url, DEFAULT_STREAM_URL);
                assert_eq!(config.feed.poll_interval, Duration::from_secs(5));
                assert_eq!(config.feed.price_refresh_interval, Duration::from_secs(30));
                assert_eq!(config.feed.user_id, 1);
                assert_eq!(config.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
            },
        );
    }

    #[test]
    fn overrides_from_env() {
        with_env(
            &[
                ("FOLIO_GATEWAY_URL", Some("http://gw.example.com")),
                ("FOLIO_STREAM_URL", Some("ws://gw.example.com/stream")),
                ("FOLIO_POLL_INTERVAL_SECS", Some("12")),
                ("FOLIO_USER_ID", Some("7")),
            ],
            || {
                let config = fetch_config().unwrap();
                assert_eq!(config.services.gateway_url, "http://gw.example.com");
                assert_eq!(config.feed.stream_url, "ws://gw.example.com/stream");
                assert_eq!(config.feed.poll_interval, Duration::from_secs(12));
                assert_eq!(config.feed.user_id, 7);
            },
        );
    }

    #[test]
    fn rejects_non_numeric_interval() {
        with_env(&[("FOLIO_POLL_INTERVAL_SECS", Some("soon"))], || {
            let err = fetch_config().unwrap_err();
            assert!(err.to_string().contains("FOLIO_POLL_INTERVAL_SECS"));
        });
    }

    #[test]
    fn empty_values_treated_as_absent() {
        with_env(
            &[
                ("FOLIO_GATEWAY_URL", Some("")),
                ("FOLIO_POLL_INTERVAL_SECS", Some("")),
            ],
            || {
                let config = fetch_config().unwrap();
                assert_eq!(config.services.gateway_url, DEFAULT_GATEWAY_URL);
                assert_eq!(config.feed.poll_interval, Duration::from_secs(5));
            },
        );
    }
}
