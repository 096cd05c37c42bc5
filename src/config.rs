use std::time::Duration;

pub const DEFAULT_API_URL: &str =
    "https://functions.poehali.dev/523fc7e5-f93b-4c3c-a292-a9470493fd1a";

/// Environment variable that overrides the service endpoint.
pub const API_URL_ENV: &str = "MARKET_ANALYTICS_API_URL";

pub const DEFAULT_USER_ID: u64 = 1;
pub const DEFAULT_WINDOW_DAYS: u32 = 30;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Service endpoint to use when none was configured explicitly.
///
/// Prefers [`API_URL_ENV`] when it is set and non-empty.
pub fn default_api_url() -> String {
    match std::env::var(API_URL_ENV) {
        Ok(url) if !url.trim().is_empty() => url.trim().to_string(),
        _ => DEFAULT_API_URL.to_string(),
    }
}
