//! Parser for the MEDLINE flat-file format
//!
//! This is the `rettype=medline&retmode=text` representation served by
//! EFetch and saved by bibliography tools as `.nbib`:
//!
//! ```text
//! PMID- 23370058
//! TI  - Diffusion kurtosis imaging of the healthy
//!       human brain.
//! AU  - Engemann DA
//! AU  - Bzdok D
//! ```
//!
//! Tags occupy the first four columns (space-padded), followed by `"- "` and
//! the value. Lines indented by six spaces continue the previous value.
//! Repeated tags accumulate into lists. Blank lines separate records.

use crate::error::{PubMedError, Result};
use crate::medline::record::MedlineRecord;
use tracing::debug;

const CONTINUATION_INDENT: &str = "      ";

/// Parse one or more MEDLINE records from flat-file text
pub fn parse_medline(text: &str) -> Result<Vec<MedlineRecord>> {
    let mut records = Vec::new();
    let mut current: Option<MedlineRecord> = None;
    let mut last_tag: Option<String> = None;

    for (idx, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim_end();

        if line.trim().is_empty() {
            if let Some(record) = current.take() {
                records.push(record);
            }
            last_tag = None;
            continue;
        }

        if let Some(continued) = line.strip_prefix(CONTINUATION_INDENT) {
            let tag = last_tag.as_deref().ok_or_else(|| PubMedError::MedlineParseError {
                line: idx + 1,
                message: "continuation line without a preceding field".to_string(),
            })?;
            // current is always present when last_tag is set
            if let Some(record) = current.as_mut() {
                record.extend_last(tag, continued.trim_start());
            }
            continue;
        }

        let (tag, value) = split_tag_line(line).ok_or_else(|| PubMedError::MedlineParseError {
            line: idx + 1,
            message: format!("expected `TAG - value`, got {line:?}"),
        })?;

        current
            .get_or_insert_with(MedlineRecord::new)
            .push_value(tag, value.to_string());
        last_tag = Some(tag.to_string());
    }

    if let Some(record) = current.take() {
        records.push(record);
    }

    debug!(record_count = records.len(), "Parsed MEDLINE text");
    Ok(records)
}

/// Split a `TAG - value` line into tag and value
///
/// The tag field is four columns wide and space-padded on the right; the
/// separator is `"- "`. A trailing `"-"` with no value is also accepted,
/// which covers fields that are present but empty.
fn split_tag_line(line: &str) -> Option<(&str, &str)> {
    // Values are UTF-8; only the 4-column tag field must be ASCII
    if line.len() < 5 || !line.is_char_boundary(4) {
        return None;
    }
    let tag = line[..4].trim_end();
    if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    let rest = &line[4..];
    if let Some(value) = rest.strip_prefix("- ") {
        Some((tag, value))
    } else if rest == "-" {
        Some((tag, ""))
    } else {
        None
    }
}
