//! Citation export formats for MEDLINE records
//!
//! Supported formats:
//!
//! - **BibTeX** - Used by LaTeX and many reference managers
//! - **NBIB** - The MEDLINE flat-file format itself, for importing into
//!   bibliography software
//! - **RIS** - Used by Zotero, Mendeley, EndNote, and many others

use crate::medline::fill;
use crate::medline::record::{FieldValue, MedlineRecord};

/// Trait for exporting records to citation formats
pub trait ExportFormat {
    /// Export as a BibTeX entry
    fn to_bibtex(&self) -> String;

    /// Export in MEDLINE/NBIB format
    fn to_nbib(&self) -> String;

    /// Export in RIS format
    fn to_ris(&self) -> String;
}

/// Generate a BibTeX citation key: `<firstauthor><year>_pmid<PMID>`
fn bibtex_key(record: &MedlineRecord) -> String {
    let author = record
        .get("AU")
        .and_then(FieldValue::first)
        .and_then(|au| au.split_whitespace().next())
        .map(|surname| {
            surname
                .chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
                .to_lowercase()
        })
        .unwrap_or_else(|| "anon".to_string());

    let year = record
        .year()
        .map(|y| y.to_string())
        .unwrap_or_else(|| "0000".to_string());

    match record.pmid() {
        Some(pmid) => format!("{author}{year}_pmid{pmid}"),
        None => format!("{author}{year}"),
    }
}

/// Escape special BibTeX characters
fn escape_bibtex(s: &str) -> String {
    s.replace('&', r"\&")
        .replace('%', r"\%")
        .replace('#', r"\#")
}

/// Convert a MEDLINE author (`Surname Initials`) to `Surname, Initials`
fn author_comma_form(author: &str) -> String {
    match author.rsplit_once(' ') {
        Some((surname, initials)) => format!("{surname}, {initials}"),
        None => author.to_string(),
    }
}

/// Repair MEDLINE's truncated page ranges
///
/// MEDLINE abbreviates the end page (`123-45` means pages 123 to 145);
/// multiple ranges are separated by `;` and only the first is kept.
fn normalize_pages(pages: &str) -> String {
    let pages = pages.split(';').next().unwrap_or(pages).trim();
    let Some((start, end)) = pages.split_once('-') else {
        return pages.to_string();
    };
    let (start, end) = (start.trim(), end.trim());
    if start.chars().all(|c| c.is_ascii_digit())
        && end.chars().all(|c| c.is_ascii_digit())
        && !end.is_empty()
        && end.len() < start.len()
    {
        let full_end = format!("{}{}", &start[..start.len() - end.len()], end);
        return format!("{start}-{full_end}");
    }
    format!("{start}-{end}")
}

impl ExportFormat for MedlineRecord {
    fn to_bibtex(&self) -> String {
        let key = bibtex_key(self);
        let mut lines = Vec::new();

        lines.push(format!("@article{{{key},"));

        if let Some(title) = self.get("TI").map(|v| v.joined(" ")) {
            lines.push(format!("  title = {{{}}},", escape_bibtex(&title)));
        }
        if let Some(authors) = self.get("AU") {
            let joined = authors
                .values()
                .into_iter()
                .map(|a| escape_bibtex(&author_comma_form(a)))
                .collect::<Vec<_>>()
                .join(" and ");
            lines.push(format!("  author = {{{joined}}},"));
        }
        if let Some(journal) = self.get("JT").and_then(FieldValue::first) {
            lines.push(format!("  journal = {{{}}},", escape_bibtex(journal)));
        }
        if let Some(year) = self.year() {
            lines.push(format!("  year = {{{year}}},"));
        }
        if let Some(volume) = self.get("VI").and_then(FieldValue::first) {
            lines.push(format!("  volume = {{{volume}}},"));
        }
        if let Some(issue) = self.get("IP").and_then(FieldValue::first) {
            lines.push(format!("  number = {{{issue}}},"));
        }
        if let Some(pages) = self.get("PG").and_then(FieldValue::first) {
            lines.push(format!("  pages = {{{}}},", normalize_pages(pages)));
        }
        if let Some(doi) = self.doi() {
            lines.push(format!("  doi = {{{doi}}},"));
        }
        if let Some(pmid) = self.pmid() {
            lines.push(format!("  pmid = {{{pmid}}},"));
        }

        lines.push("}".to_string());
        lines.join("\n")
    }

    fn to_nbib(&self) -> String {
        let mut lines = Vec::new();

        // PMID leads, the remaining tags follow in record order
        if let Some(pmid) = self.pmid() {
            lines.push(format!("PMID- {pmid}"));
        }
        for (tag, value) in self.iter() {
            if tag == "PMID" {
                continue;
            }
            for v in value.values() {
                push_nbib_field(&mut lines, tag, v);
            }
        }
        lines.join("\n")
    }

    fn to_ris(&self) -> String {
        let mut lines = Vec::new();

        lines.push("TY  - JOUR".to_string());
        if let Some(title) = self.get("TI").map(|v| v.joined(" ")) {
            lines.push(format!("TI  - {title}"));
        }
        if let Some(authors) = self.get("AU") {
            for author in authors.values() {
                lines.push(format!("AU  - {}", author_comma_form(author)));
            }
        }
        if let Some(journal) = self.get("JT").and_then(FieldValue::first) {
            lines.push(format!("JO  - {journal}"));
        }
        if let Some(abbr) = self.get("TA").and_then(FieldValue::first) {
            lines.push(format!("JA  - {abbr}"));
        }
        if let Some(year) = self.year() {
            lines.push(format!("PY  - {year}"));
        }
        if let Some(volume) = self.get("VI").and_then(FieldValue::first) {
            lines.push(format!("VL  - {volume}"));
        }
        if let Some(issue) = self.get("IP").and_then(FieldValue::first) {
            lines.push(format!("IS  - {issue}"));
        }
        if let Some(pages) = self.get("PG").and_then(FieldValue::first) {
            let pages = normalize_pages(pages);
            if let Some((start, end)) = pages.split_once('-') {
                lines.push(format!("SP  - {start}"));
                lines.push(format!("EP  - {end}"));
            } else {
                lines.push(format!("SP  - {pages}"));
            }
        }
        if let Some(doi) = self.doi() {
            lines.push(format!("DO  - {doi}"));
        }
        if let Some(pmid) = self.pmid() {
            lines.push(format!("AN  - PMID:{pmid}"));
        }
        if let Some(abstract_text) = self.get("AB").map(|v| v.joined(" ")) {
            lines.push(format!("AB  - {abstract_text}"));
        }
        for kw_tag in ["MH", "OT"] {
            if let Some(keywords) = self.get(kw_tag) {
                for kw in keywords.values() {
                    lines.push(format!("KW  - {kw}"));
                }
            }
        }

        lines.push("ER  - ".to_string());
        lines.join("\n")
    }
}

/// Write one `TAG - value` field, folding long values onto continuation lines
fn push_nbib_field(lines: &mut Vec<String>, tag: &str, value: &str) {
    let folded = fill(value, 74, "", "");
    let mut parts = folded.lines();
    let first = parts.next().unwrap_or("");
    lines.push(format!("{tag:<4}- {first}"));
    for part in parts {
        lines.push(format!("      {part}"));
    }
}
