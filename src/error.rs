use thiserror::Error;

/// Error types for PubMed record operations
#[derive(Error, Debug)]
pub enum PubMedError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),

    /// File I/O failed
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// XML parsing failed
    #[error("XML parsing failed: {0}")]
    XmlError(String),

    /// MEDLINE flat-file parsing failed
    #[error("MEDLINE parsing failed at line {line}: {message}")]
    MedlineParseError { line: usize, message: String },

    /// Invalid PMID format
    #[error("Invalid PMID format: {pmid}")]
    InvalidPmid { pmid: String },

    /// Invalid search query
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Invalid regular expression supplied for matching
    #[error("Invalid match pattern: {0}")]
    PatternError(#[from] regex::Error),

    /// Record has no DOI to resolve
    #[error("No DOI found for record")]
    DoiNotFound { pmid: Option<String> },

    /// Records marked for exclusion must be dropped before structural edits
    #[error("Records are marked for exclusion; call drop_excluded() before inserting")]
    PendingExclusions,

    /// Generic API error
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },
}

impl PubMedError {
    /// Whether a retry has a chance of succeeding
    pub fn is_retryable(&self) -> bool {
        match self {
            PubMedError::ApiError { status, .. } => *status == 429 || *status >= 500,
            PubMedError::RequestError(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, PubMedError>;
