/// Failures raised by the analytics client.
///
/// Every variant is a transport-level failure: the request never produced a
/// usable answer. A well-formed response with no items is *not* an error and
/// surfaces as an empty collection instead.
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Service error: {0}")]
    Service(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
