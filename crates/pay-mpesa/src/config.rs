//! # API Configuration
//!
//! Where the AfriArt backend lives and how long to wait for it.
//! Values come from environment variables (a `.env` file is honoured).

use pay_core::{PaymentError, PaymentHandle, PaymentResult};
use std::env;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_INITIATE_PATH: &str = "/mpesa/stkpush";
pub const DEFAULT_STATUS_PATH: &str = "/mpesa/status";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// AfriArt API configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// API base URL, no trailing slash (`https://afriart.co.ke/api`)
    pub api_base_url: String,

    /// Push-payment initiation route
    pub initiate_path: String,

    /// Status route; the handle is appended as the last segment
    pub status_path: String,

    /// Bounded wait for every single request
    pub request_timeout: Duration,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// All optional:
    /// - `AFRIART_API_URL`
    /// - `AFRIART_INITIATE_PATH`
    /// - `AFRIART_STATUS_PATH`
    /// - `AFRIART_REQUEST_TIMEOUT_SECS`
    pub fn from_env() -> PaymentResult<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup (environment, test maps)
    pub fn from_lookup<F>(lookup: F) -> PaymentResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_base_url = get("AFRIART_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(PaymentError::Configuration(
                "AFRIART_API_URL must start with http:// or https://".to_string(),
            ));
        }

        let request_timeout_secs = match get("AFRIART_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().ok().filter(|s| *s > 0).ok_or_else(|| {
                PaymentError::Configuration(format!(
                    "AFRIART_REQUEST_TIMEOUT_SECS must be a positive integer, got {:?}",
                    raw
                ))
            })?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        Ok(Self {
            api_base_url: trim_base(&api_base_url),
            initiate_path: route(
                &get("AFRIART_INITIATE_PATH").unwrap_or_else(|| DEFAULT_INITIATE_PATH.to_string()),
            ),
            status_path: route(
                &get("AFRIART_STATUS_PATH").unwrap_or_else(|| DEFAULT_STATUS_PATH.to_string()),
            ),
            request_timeout: Duration::from_secs(request_timeout_secs),
        })
    }

    /// Create config with default routes (for testing)
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: trim_base(&api_base_url.into()),
            initiate_path: DEFAULT_INITIATE_PATH.to_string(),
            status_path: DEFAULT_STATUS_PATH.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = trim_base(&url.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Absolute URL for an API route
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, route(path))
    }

    pub fn initiate_url(&self) -> String {
        self.url(&self.initiate_path)
    }

    /// Status route with the handle appended as one percent-encoded segment
    pub fn status_url(&self, handle: &PaymentHandle) -> String {
        let base = self.url(&self.status_path);
        match reqwest::Url::parse(&base) {
            Ok(mut url) => {
                if let Ok(mut segments) = url.path_segments_mut() {
                    segments.push(handle.as_str());
                }
                url.to_string()
            }
            Err(_) => format!("{}/{}", base, handle),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

fn trim_base(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn route(path: &str) -> String {
    let path = path.trim().trim_end_matches('/');
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}
