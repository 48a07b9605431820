use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("export error: {0}")]
    Export(#[from] ExportError),

    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("content too large: {size} bytes (max: {max})")]
    ContentTooLarge { size: usize, max: usize },
}

/// Rejections produced by [`crate::CrawlConfig::validate`]. Surfaced before
/// any crawl starts; a run never begins with an invalid configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("base URL is missing or empty")]
    MissingBaseUrl,

    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("base URL {0:?} must carry an explicit http or https scheme")]
    UnsupportedScheme(String),

    #[error("{param} out of range: {value} (allowed: {min}..={max})")]
    OutOfRange {
        param: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },
}

/// I/O failures while writing an output file. Reported per format; an export
/// failure never invalidates the in-memory records or other formats already
/// written.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
