//! One-shot asset loading from a URL or a local file.

use std::{fmt, path::PathBuf};

use reqwest::Client;
use thiserror::Error;

use crate::{geojson::FeatureCollection, ingestion, ip_record::IpRecord};

pub const DEFAULT_CSV_ASSET: &str = "banned_ips_locations.csv";
pub const DEFAULT_GEOJSON_ASSET: &str =
    "https://raw.githubusercontent.com/datasets/geo-countries/master/data/countries.geojson";

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request for {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse GeoJSON: {0}")]
    GeoJson(#[from] serde_json::Error),
}

/// Where an asset lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetSource {
    Url(String),
    Path(PathBuf),
}

impl AssetSource {
    pub fn parse(source: &str) -> Self {
        let source = source.trim();
        if source.starts_with("http://") || source.starts_with("https://") {
            AssetSource::Url(source.to_string())
        } else {
            AssetSource::Path(PathBuf::from(source))
        }
    }
}

impl fmt::Display for AssetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetSource::Url(url) => write!(f, "{url}"),
            AssetSource::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

impl From<&str> for AssetSource {
    fn from(source: &str) -> Self {
        AssetSource::parse(source)
    }
}

/// Fetches the asset body as text. Single attempt, no retry.
pub async fn fetch_text(client: &Client, source: &AssetSource) -> Result<String, FetchError> {
    match source {
        AssetSource::Url(url) => {
            let request_error = |source: reqwest::Error| FetchError::Request {
                url: url.clone(),
                source,
            };
            let response = client.get(url).send().await.map_err(request_error)?;
            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status {
                    url: url.clone(),
                    status,
                });
            }
            response.text().await.map_err(request_error)
        }
        AssetSource::Path(path) => {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| FetchError::Io {
                    path: path.clone(),
                    source,
                })
        }
    }
}

pub async fn load_records(client: &Client, source: &AssetSource) -> Result<Vec<IpRecord>, FetchError> {
    let text = fetch_text(client, source).await?;
    let records = ingestion::parse_records(&text);
    tracing::info!("Loaded {} records from {source}", records.len());
    Ok(records)
}

pub async fn load_boundaries(
    client: &Client,
    source: &AssetSource,
) -> Result<FeatureCollection, FetchError> {
    let text = fetch_text(client, source).await?;
    let boundaries = FeatureCollection::from_json(&text)?;
    tracing::info!(
        "Loaded {} boundary features from {source}",
        boundaries.features.len()
    );
    Ok(boundaries)
}
