//! Configuration types for the client and the extraction run.
//!
//! [`ClientConfig`] controls the HTTP layer: user agent, timeout, the minimum
//! interval between requests, the per-response byte cap, and the SEC base
//! URLs. [`RunOptions`] controls which filings a run processes and how the
//! extracted statements are filtered. Defaults follow SEC fair-access guidance;
//! the user agent has no default because the SEC requires a real contact.

use std::time::Duration;

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 40;

/// Default minimum interval between outbound requests.
pub const DEFAULT_MIN_INTERVAL_SECS: f64 = 0.25;

/// Default per-response size cap (25 MiB).
pub const DEFAULT_MAX_BYTES: usize = 25 * 1024 * 1024;

/// Settings for the rate-limited [`SecClient`](crate::SecClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// User agent string identifying the application and a contact email
    /// (required by SEC.gov).
    pub user_agent: String,

    /// HTTP request timeout.
    pub timeout: Duration,

    /// Minimum interval between outbound requests. Must be positive.
    pub min_interval: Duration,

    /// Maximum accepted response body size in bytes.
    pub max_bytes: usize,

    /// Base URLs for the SEC services.
    pub base_urls: SecUrls,
}

/// Base URLs for the two SEC endpoints the pipeline consumes.
///
/// Overridable mainly so tests can point the client at a mock server.
#[derive(Debug, Clone)]
pub struct SecUrls {
    /// Submissions API base (`CIK##########.json` and its extra pages).
    pub submissions: String,

    /// Archives base for filing directories and report documents.
    pub archives: String,
}

impl Default for SecUrls {
    fn default() -> Self {
        Self {
            submissions: "https://data.sec.gov/submissions".to_string(),
            archives: "https://www.sec.gov/Archives/edgar/data".to_string(),
        }
    }
}

impl ClientConfig {
    /// Creates a configuration with the given user agent and default limits.
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            min_interval: Duration::from_secs_f64(DEFAULT_MIN_INTERVAL_SECS),
            max_bytes: DEFAULT_MAX_BYTES,
            base_urls: SecUrls::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval;
        self
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn with_base_urls(mut self, base_urls: SecUrls) -> Self {
        self.base_urls = base_urls;
        self
    }
}

/// Options for a per-CIK extraction run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Lookback window in years for 10-K selection.
    pub years: u32,

    /// Maximum number of filings to process.
    pub limit: usize,

    /// Whether to include 10-K/A amendments.
    pub include_amends: bool,

    /// Whether to keep XBRL scaffolding rows such as `Assets [Abstract]`.
    pub keep_abstract: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            years: 5,
            limit: 5,
            include_amends: false,
            keep_abstract: false,
        }
    }
}

impl RunOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_years(mut self, years: u32) -> Self {
        self.years = years;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_include_amends(mut self, include_amends: bool) -> Self {
        self.include_amends = include_amends;
        self
    }

    pub fn with_keep_abstract(mut self, keep_abstract: bool) -> Self {
        self.keep_abstract = keep_abstract;
        self
    }
}
