//! The MEDLINE record data model
//!
//! A record is a mapping from MEDLINE field tags (`PMID`, `TI`, `AU`, ...)
//! to values that are either a single string or a list of strings, matching
//! the on-disk JSON format: objects whose values are strings or arrays.

use crate::error::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::fill;

/// Fields included in the text corpus when none are requested explicitly
pub const DEFAULT_CORPUS_FIELDS: &[&str] = &["TI", "AU", "AB"];

/// Fields shown by [`MedlineRecord::to_ascii`] by default
pub const DEFAULT_DISPLAY_FIELDS: &[&str] = &["TI", "AU", "DP", "AB"];

/// Value of a MEDLINE field: repeated tags accumulate into a list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Field that occurred once
    Single(String),
    /// Field that occurred multiple times (authors, MeSH terms, ...)
    Many(Vec<String>),
}

impl FieldValue {
    /// All values of the field, regardless of arity
    pub fn values(&self) -> Vec<&str> {
        match self {
            FieldValue::Single(s) => vec![s.as_str()],
            FieldValue::Many(v) => v.iter().map(String::as_str).collect(),
        }
    }

    /// First value of the field
    pub fn first(&self) -> Option<&str> {
        match self {
            FieldValue::Single(s) => Some(s.as_str()),
            FieldValue::Many(v) => v.first().map(String::as_str),
        }
    }

    /// Join all values with the given separator
    pub fn joined(&self, sep: &str) -> String {
        self.values().join(sep)
    }

    /// Append another occurrence of the field, promoting to a list
    pub(crate) fn push(&mut self, value: String) {
        match self {
            FieldValue::Single(s) => {
                *self = FieldValue::Many(vec![std::mem::take(s), value]);
            }
            FieldValue::Many(v) => v.push(value),
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Single(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Single(value.to_string())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        FieldValue::Many(values)
    }
}

/// A single PubMed bibliographic record in MEDLINE form
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MedlineRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl MedlineRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a field by MEDLINE tag
    pub fn get(&self, tag: &str) -> Option<&FieldValue> {
        self.fields.get(tag)
    }

    /// Whether the record carries a field
    pub fn contains(&self, tag: &str) -> bool {
        self.fields.contains_key(tag)
    }

    /// Set a field, replacing any previous value
    pub fn set(&mut self, tag: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(tag.into(), value.into());
    }

    /// Remove a field, returning its value if present
    pub fn remove(&mut self, tag: &str) -> Option<FieldValue> {
        self.fields.remove(tag)
    }

    /// Add another occurrence of a field (parser path for repeated tags)
    pub fn push_value(&mut self, tag: &str, value: String) {
        match self.fields.get_mut(tag) {
            Some(existing) => existing.push(value),
            None => {
                self.fields.insert(tag.to_string(), FieldValue::Single(value));
            }
        }
    }

    /// Extend the most recent occurrence of a field with unfolded text
    pub(crate) fn extend_last(&mut self, tag: &str, text: &str) {
        if let Some(value) = self.fields.get_mut(tag) {
            let slot = match value {
                FieldValue::Single(s) => s,
                FieldValue::Many(v) => match v.last_mut() {
                    Some(last) => last,
                    None => return,
                },
            };
            if !slot.is_empty() {
                slot.push(' ');
            }
            slot.push_str(text);
        }
    }

    /// Iterate over `(tag, value)` pairs in tag order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// MEDLINE tags present in the record
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of fields in the record
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Keep only the listed fields, dropping everything else
    pub fn restrict_fields(&mut self, fields: &[&str]) {
        self.fields.retain(|tag, _| fields.contains(&tag.as_str()));
    }

    /// The PubMed ID of the record
    pub fn pmid(&self) -> Option<&str> {
        self.get("PMID").and_then(FieldValue::first)
    }

    /// Publication year, parsed from the leading four digits of `DP`
    pub fn year(&self) -> Option<i32> {
        let dp = self.get("DP")?.first()?;
        let prefix = dp.get(..4)?;
        prefix.parse().ok()
    }

    /// DOI of the record, if one can be extracted from `AID`, `SO` or `LID`
    pub fn doi(&self) -> Option<String> {
        crate::doi::extract_doi(self)
    }

    /// Concatenate field values into a single searchable string
    ///
    /// List values are joined with `", "`. When `fields` is `None` the
    /// corpus covers title, authors and abstract.
    pub fn as_corpus(&self, fields: Option<&[&str]>) -> String {
        let fields = fields.unwrap_or(DEFAULT_CORPUS_FIELDS);
        let mut corpus = String::new();
        for (tag, value) in &self.fields {
            if fields.contains(&tag.as_str()) {
                corpus.push_str(&value.joined(", "));
            }
        }
        corpus
    }

    /// Match the record corpus against a regular expression or substring
    ///
    /// Plain substrings (alphanumeric after removing `-`, `_` and spaces)
    /// are promoted to `.*needle.*`; anything else is treated as a regex.
    pub fn matches(&self, pattern: &str) -> Result<bool> {
        let is_substring = {
            let stripped: String = pattern
                .chars()
                .filter(|c| !matches!(c, '-' | '_' | ' '))
                .collect();
            !stripped.is_empty() && stripped.chars().all(char::is_alphanumeric)
        };

        let regex = if is_substring {
            Regex::new(&format!(".*{}.*", regex::escape(pattern)))?
        } else {
            Regex::new(pattern)?
        };

        Ok(regex.is_match(&self.as_corpus(None)))
    }

    /// Render the record as readable, wrapped text
    ///
    /// # Arguments
    ///
    /// * `fields` - MEDLINE tags to display; defaults to title, authors,
    ///   publication date and abstract
    /// * `width` - Maximum line width
    pub fn to_ascii(&self, fields: Option<&[&str]>, width: usize) -> String {
        let fields = fields.unwrap_or(DEFAULT_DISPLAY_FIELDS);
        let mut out = format!("----- {}", self.pmid().unwrap_or("<no PMID>"));

        for &tag in fields {
            out.push_str("\n\n");
            out.push_str(field_label(tag));
            out.push_str(":\n");
            match self.get(tag) {
                Some(value) => {
                    out.push_str(&fill(&value.joined(" "), width, "    ", "    "));
                }
                None => {
                    out.push_str(&format!("    {tag} not available for this record"));
                }
            }
        }
        out.push('\n');
        out
    }
}

impl FromIterator<(String, FieldValue)> for MedlineRecord {
    fn from_iter<T: IntoIterator<Item = (String, FieldValue)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Human-readable label for common MEDLINE tags
pub fn field_label(tag: &str) -> &str {
    match tag {
        "PMID" => "PubMed ID",
        "TI" => "Title",
        "AU" => "Authors",
        "FAU" => "Full Authors",
        "AB" => "Abstract",
        "DP" => "Date of Publication",
        "TA" => "Journal Abbreviation",
        "JT" => "Journal Title",
        "VI" => "Volume",
        "IP" => "Issue",
        "PG" => "Pagination",
        "LA" => "Language",
        "PT" => "Publication Type",
        "MH" => "MeSH Terms",
        "AD" => "Affiliation",
        "AID" => "Article Identifier",
        "LID" => "Location Identifier",
        "SO" => "Source",
        "IS" => "ISSN",
        "OT" => "Other Term",
        "PL" => "Place of Publication",
        other => other,
    }
}
