//! Fetches the raw strandings spreadsheet the enrichment is usually run on.

use crate::error::ContextError;
use crate::utils::ensure_dir_exists;
use crate::weather_data::error::WeatherDataError;
use log::{info, warn};
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// NOAA East Coast bottlenose dolphin strandings, 2017 to 2019.
pub const STRANDINGS_DATASET_URL: &str =
    "https://www.fisheries.noaa.gov/s3/2023-06/EastCoast-Bottlenose-2017-2019.xlsx";

/// Where downloads land unless told otherwise.
pub const DEFAULT_RAW_DIR: &str = "data/raw";

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);
const FALLBACK_FILE_NAME: &str = "dataset";

/// Last path segment of `url`, without query string or fragment.
pub(crate) fn file_name_from_url(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    match path.trim_end_matches('/').rsplit('/').next() {
        Some(name) if !name.is_empty() && !name.contains(':') => name,
        _ => FALLBACK_FILE_NAME,
    }
}

pub(crate) async fn write_dataset(
    bytes: &[u8],
    dest_dir: &Path,
    file_name: &str,
) -> Result<PathBuf, ContextError> {
    ensure_dir_exists(dest_dir).await?;
    let path = dest_dir.join(file_name);
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| ContextError::FileWrite(path.clone(), e))?;
    Ok(path)
}

/// Downloads `url` into `dest_dir`, keeping the remote file name.
///
/// The directory is created if missing and an existing file is overwritten.
/// Returns the path of the written file.
///
/// # Errors
///
/// [`WeatherDataError::Transport`], [`WeatherDataError::Timeout`] or
/// [`WeatherDataError::HttpStatus`] (wrapped in [`ContextError::WeatherData`])
/// when the download fails, [`ContextError::DirCreation`] or
/// [`ContextError::FileWrite`] when the file cannot be stored.
pub async fn download_dataset(url: &str, dest_dir: &Path) -> Result<PathBuf, ContextError> {
    let client = Client::builder()
        .timeout(DOWNLOAD_TIMEOUT)
        .build()
        .map_err(WeatherDataError::ClientBuild)?;

    info!("Downloading dataset from {}", url);
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| WeatherDataError::from_request(url, DOWNLOAD_TIMEOUT, e))?;

    let response = match response.error_for_status() {
        Ok(resp) => resp,
        Err(e) => {
            warn!("HTTP error for {}: {:?}", url, e);
            return Err(match e.status() {
                Some(status) => WeatherDataError::HttpStatus {
                    url: url.to_string(),
                    status,
                },
                None => WeatherDataError::from_request(url, DOWNLOAD_TIMEOUT, e),
            }
            .into());
        }
    };

    let bytes = response
        .bytes()
        .await
        .map_err(|e| WeatherDataError::from_request(url, DOWNLOAD_TIMEOUT, e))?;

    let path = write_dataset(&bytes, dest_dir, file_name_from_url(url)).await?;
    info!("Saved {} bytes to {}", bytes.len(), path.display());
    Ok(path)
}
