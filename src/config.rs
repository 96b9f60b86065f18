//! Client configuration for NCBI E-utilities access
//!
//! NCBI asks clients to identify themselves (`tool`, `email`) and enforces
//! rate limits of 3 requests/second without an API key and 10 requests/second
//! with one. `ClientConfig` collects these knobs plus HTTP timeout and retry
//! behavior.

use crate::rate_limit::RateLimiter;
use crate::retry::RetryConfig;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";
const DEFAULT_TOOL: &str = "pubmed-records-rs";

/// Configuration for [`PubMedClient`](crate::PubMedClient)
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// NCBI API key (raises the rate limit to 10 req/s)
    pub api_key: Option<String>,
    /// Contact email, recommended by NCBI to avoid blocking
    pub email: Option<String>,
    /// Tool name reported to NCBI
    pub tool: Option<String>,
    /// Override for the E-utilities base URL (used by tests)
    pub base_url: Option<String>,
    /// Explicit rate limit in requests per second
    pub rate_limit: Option<f64>,
    /// HTTP request timeout
    pub timeout: Duration,
    /// Retry behavior for transient API failures
    pub retry: RetryConfig,
}

impl ClientConfig {
    /// Create a configuration with NCBI defaults
    pub fn new() -> Self {
        Self {
            api_key: None,
            email: None,
            tool: None,
            base_url: None,
            rate_limit: None,
            timeout: Duration::from_secs(30),
            retry: RetryConfig::default(),
        }
    }

    /// Set the NCBI API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the contact email sent with every request
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the tool name sent with every request
    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = Some(tool.into());
        self
    }

    /// Point the client at a different base URL (mock servers in tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Override the request rate limit (requests per second)
    pub fn with_rate_limit(mut self, requests_per_second: f64) -> Self {
        self.rate_limit = Some(requests_per_second);
        self
    }

    /// Set the HTTP request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry configuration
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Effective rate limit: explicit override, else NCBI default for the key
    pub fn effective_rate_limit(&self) -> f64 {
        if let Some(rate) = self.rate_limit {
            return rate;
        }
        if self.api_key.is_some() { 10.0 } else { 3.0 }
    }

    /// Effective E-utilities base URL
    pub fn effective_base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Effective tool name
    pub fn effective_tool(&self) -> &str {
        self.tool.as_deref().unwrap_or(DEFAULT_TOOL)
    }

    /// User-Agent header value
    pub fn effective_user_agent(&self) -> String {
        format!("pubmed-records-rs/{}", env!("CARGO_PKG_VERSION"))
    }

    /// Query parameters appended to every E-utilities request
    pub fn build_api_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(ref api_key) = self.api_key {
            params.push(("api_key".to_string(), api_key.clone()));
        }
        if let Some(ref email) = self.email {
            params.push(("email".to_string(), email.clone()));
        }
        if let Some(ref tool) = self.tool {
            params.push(("tool".to_string(), tool.clone()));
        }
        params
    }

    /// Build a rate limiter matching this configuration
    pub fn create_rate_limiter(&self) -> RateLimiter {
        RateLimiter::new(self.effective_rate_limit())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}
