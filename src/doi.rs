//! DOI extraction and resolution
//!
//! MEDLINE records carry DOIs inside the `AID`, `SO` or `LID` fields,
//! usually suffixed with ` [doi]`. Extraction scans those fields in order
//! with the DOI pattern; resolution asks `https://doi.org/` where the DOI
//! currently points and reports the final URL after redirects.

use crate::error::{PubMedError, Result};
use crate::medline::record::{FieldValue, MedlineRecord};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, instrument};

/// Public DOI resolver
pub const DOI_RESOLVER: &str = "https://doi.org";

/// A DOI: `10.` + 4-6 digit registrant + `/` + suffix
static DOI_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(10\.\d{4,6}/[^"'&<%\s]+)"#).expect("DOI pattern is valid")
});

/// Fields that may carry a DOI, in precedence order
const DOI_FIELDS: &[&str] = &["AID", "SO", "LID"];

/// Extract the DOI of a record from its `AID`, `SO` or `LID` fields
pub fn extract_doi(record: &MedlineRecord) -> Option<String> {
    for &tag in DOI_FIELDS {
        let Some(value) = record.get(tag) else {
            continue;
        };
        // Repeated identifier fields mix DOIs with other ids ("pii" etc.);
        // keep only entries that mention a doi.
        let haystack = match value {
            FieldValue::Single(s) => s.clone(),
            FieldValue::Many(v) => v
                .iter()
                .filter(|entry| entry.contains("doi"))
                .cloned()
                .collect::<Vec<_>>()
                .join(" "),
        };
        if let Some(m) = DOI_PATTERN.find(&haystack) {
            return Some(m.as_str().to_string());
        }
    }
    None
}

/// Resolve a record's DOI to the publisher URL
///
/// Follows the `doi.org` redirect chain and returns the final URL.
///
/// # Errors
///
/// * [`PubMedError::DoiNotFound`] - The record carries no DOI
/// * [`PubMedError::ApiError`] - The resolver answered with an error status
#[instrument(skip(record), fields(pmid = record.pmid().unwrap_or("<none>")))]
pub async fn resolve_doi(record: &MedlineRecord) -> Result<String> {
    let client = reqwest::Client::new();
    resolve_doi_with(&client, DOI_RESOLVER, record).await
}

/// Resolve a record's DOI against a custom resolver (mock servers in tests)
pub async fn resolve_doi_with(
    client: &reqwest::Client,
    resolver: &str,
    record: &MedlineRecord,
) -> Result<String> {
    let doi = extract_doi(record).ok_or_else(|| PubMedError::DoiNotFound {
        pmid: record.pmid().map(str::to_string),
    })?;

    let url = format!("{}/{}", resolver.trim_end_matches('/'), doi);
    debug!(doi = %doi, "Resolving DOI");
    let response = client.get(&url).send().await?;

    if !response.status().is_success() {
        return Err(PubMedError::ApiError {
            status: response.status().as_u16(),
            message: format!("DOI resolution failed for {doi}"),
        });
    }

    Ok(response.url().to_string())
}
