//! # Celestial Parameter Table Source
//!
//! Downloads the per-body orbit parameters (a JSON array, see
//! [`crate::builder`]) and keeps a local copy of the last good download.
//!
//! ## Lookup order
//! 1. **Fresh cache**: the cache file exists and is younger than the TTL
//! 2. **Network**: HTTP GET of the configured URL, then the cache is rewritten
//! 3. **Stale cache**: any cache file at all, used only when the download failed
//!    or its body was not a parameter table
//!
//! Cache writes are best effort: a read-only `/tmp` only costs a re-download
//! next time. There is no retry loop; a failed download is reported to the
//! caller as-is when no cache exists.

use crate::builder::ParameterTable;
use crate::config::DataConfig;
use log::{debug, info, warn};
use std::path::Path;
use std::time::{Duration, SystemTime};
use std::{fs, io};
use thiserror::Error;

/// Errors that can occur while obtaining the parameter table.
#[derive(Error, Debug)]
pub enum DataError {
    /// HTTP request failed (network, server, or protocol error)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Reading or writing a local file failed
    #[error("cache IO: {0}")]
    Cache(#[from] io::Error),

    /// Body was not a JSON array
    #[error("invalid parameter table: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Fetch the parameter table, preferring a fresh cache over the network.
pub async fn fetch(config: &DataConfig) -> Result<ParameterTable, DataError> {
    let cache = Path::new(&config.cache_path);
    let ttl = Duration::from_secs(config.cache_ttl_minutes * 60);

    if let Ok(body) = read_cache(cache, Some(ttl)) {
        match ParameterTable::from_json_str(&body) {
            Ok(table) => {
                info!("Using cached parameter table from {}", cache.display());
                return Ok(table);
            }
            Err(e) => warn!("Ignoring corrupt cache {}: {}", cache.display(), e),
        }
    }

    match download_table(config).await {
        Ok((table, body)) => {
            info!("Downloaded {} parameter records", table.len());
            if let Err(e) = fs::write(cache, &body) {
                debug!("Could not write cache {}: {}", cache.display(), e);
            }
            Ok(table)
        }
        Err(err) => {
            let Ok(body) = read_cache(cache, None) else {
                return Err(err);
            };
            warn!("{}; falling back to stale cache {}", err, cache.display());
            Ok(ParameterTable::from_json_str(&body)?)
        }
    }
}

/// Download and parse; the raw body is returned for the cache.
async fn download_table(config: &DataConfig) -> Result<(ParameterTable, String), DataError> {
    let body = download(config).await?;
    let table = ParameterTable::from_json_str(&body)?;
    Ok((table, body))
}

/// Load a parameter table from a local JSON file.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<ParameterTable, DataError> {
    let body = fs::read_to_string(path)?;
    Ok(ParameterTable::from_json_str(&body)?)
}

async fn download(config: &DataConfig) -> Result<String, DataError> {
    info!("Fetching parameter table from {}", config.url);
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    let body = client
        .get(&config.url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    Ok(body)
}

/// Read the cache file; with `max_age`, reject it once it is older than that.
fn read_cache(path: &Path, max_age: Option<Duration>) -> Result<String, io::Error> {
    if let Some(max_age) = max_age {
        let modified = fs::metadata(path)?.modified()?;
        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO);
        if age > max_age {
            return Err(io::Error::other("stale"));
        }
    }
    fs::read_to_string(path)
}
