use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::catalog::{fallback_catalog, Catalog};
use crate::config;

/// Shown to the user when the fallback catalog replaces the real data.
pub const FALLBACK_WARNING: &str =
    "تم تحميل بيانات تجريبية. يرجى تحديث البيانات من قاعدة البيانات.";

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataSource {
    Url(String),
    File(PathBuf),
    Builtin,
}

impl DataSource {
    /// `http(s)://` values are fetched, anything else is read from disk.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let lower = raw.to_lowercase();
        if raw.is_empty() {
            Self::Builtin
        } else if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(raw.to_string())
        } else {
            Self::File(config::expand_tilde(raw))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Url(url) => url.clone(),
            Self::File(path) => path.display().to_string(),
            Self::Builtin => "built-in sample".to_string(),
        }
    }
}

// every way the data source can fail ends in the fallback catalog
#[derive(Debug, Error)]
pub enum DataLoadFailure {
    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("request failed: {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("failed to read data file: {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog from {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug)]
pub struct LoadOutcome {
    pub catalog: Catalog,
    pub failure: Option<DataLoadFailure>,
}

impl LoadOutcome {
    /// The localized notice to surface, if the fallback catalog is in use.
    pub fn warning(&self) -> Option<&'static str> {
        self.failure.as_ref().map(|_| FALLBACK_WARNING)
    }

    pub fn is_fallback(&self) -> bool {
        self.failure.is_some()
    }
}

fn build_client(timeout_seconds: u64) -> Result<reqwest::Client, DataLoadFailure> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::ACCEPT,
        reqwest::header::HeaderValue::from_static("application/json"),
    );
    headers.insert(
        reqwest::header::USER_AGENT,
        reqwest::header::HeaderValue::from_static(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        )),
    );

    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(timeout_seconds))
        .build()
        .map_err(|e| DataLoadFailure::HttpClientBuild { source: e })
}

async fn fetch_url(url: &str, timeout_seconds: u64) -> Result<String, DataLoadFailure> {
    let client = build_client(timeout_seconds)?;
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| DataLoadFailure::Request {
            url: url.to_string(),
            source: e,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(DataLoadFailure::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|e| DataLoadFailure::Request {
        url: url.to_string(),
        source: e,
    })
}

/// Loads the catalog from `source` without any fallback.
pub async fn load_catalog(
    source: &DataSource,
    timeout_seconds: u64,
) -> Result<Catalog, DataLoadFailure> {
    let body = match source {
        DataSource::Builtin => return Ok(fallback_catalog()),
        DataSource::Url(url) => fetch_url(url, timeout_seconds).await?,
        DataSource::File(path) => {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| DataLoadFailure::FileRead {
                    path: path.display().to_string(),
                    source: e,
                })?
        }
    };

    Catalog::from_json_str(&body).map_err(|e| DataLoadFailure::Parse {
        origin: source.describe(),
        source: e,
    })
}

/// Loads the catalog, substituting the built-in sample on any failure.
pub async fn load_or_fallback(source: &DataSource, timeout_seconds: u64) -> LoadOutcome {
    match load_catalog(source, timeout_seconds).await {
        Ok(catalog) => {
            tracing::info!(
                source = %source.describe(),
                categories = catalog.len(),
                records = catalog.record_count(),
                "catalog loaded"
            );
            LoadOutcome {
                catalog,
                failure: None,
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "error loading data, using sample catalog");
            LoadOutcome {
                catalog: fallback_catalog(),
                failure: Some(e),
            }
        }
    }
}
