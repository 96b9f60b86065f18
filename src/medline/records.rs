//! An owned collection of MEDLINE records with curation support
//!
//! `RecordSet` keeps an exclusion list alongside the records: curation
//! (interactive review, scripted filtering) marks indices for removal
//! without disturbing the positions of the remaining records, and a later
//! [`drop_excluded`](RecordSet::drop_excluded) applies the removals in one
//! step. Excluded records never reach disk or any export format.

use crate::error::{PubMedError, Result};
use crate::medline::export::ExportFormat;
use crate::medline::parser::parse_medline;
use crate::medline::record::MedlineRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// A collection of PubMed records
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordSet {
    records: Vec<MedlineRecord>,
    #[serde(skip)]
    exclusions: Vec<usize>,
}

impl RecordSet {
    /// Create an empty record set
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse records from MEDLINE flat-file text
    pub fn from_medline(text: &str) -> Result<Self> {
        Ok(Self::from(parse_medline(text)?))
    }

    /// Number of records, including ones marked for exclusion
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the set holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Access a record by index
    pub fn get(&self, index: usize) -> Option<&MedlineRecord> {
        self.records.get(index)
    }

    /// Iterate over all records, including excluded ones
    pub fn iter(&self) -> std::slice::Iter<'_, MedlineRecord> {
        self.records.iter()
    }

    /// Iterate over records not marked for exclusion
    pub fn active(&self) -> impl Iterator<Item = &MedlineRecord> {
        self.records
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.exclusions.contains(i))
            .map(|(_, r)| r)
    }

    /// The underlying records as a slice
    pub fn records(&self) -> &[MedlineRecord] {
        &self.records
    }

    /// Consume the set, returning the records
    pub fn into_vec(self) -> Vec<MedlineRecord> {
        self.records
    }

    /// Append a record
    pub fn push(&mut self, record: MedlineRecord) {
        self.records.push(record);
    }

    /// Insert a record at `index`
    ///
    /// Rejected while exclusions are pending: an insert would silently
    /// shift which records the marked indices refer to.
    pub fn insert(&mut self, index: usize, record: MedlineRecord) -> Result<()> {
        if !self.exclusions.is_empty() {
            return Err(PubMedError::PendingExclusions);
        }
        self.records.insert(index, record);
        Ok(())
    }

    /// Remove and return the record at `index`
    ///
    /// The exclusion list is adjusted so remaining marks keep pointing at
    /// the same records.
    pub fn pop(&mut self, index: usize) -> Option<MedlineRecord> {
        if index >= self.records.len() {
            return None;
        }
        self.exclusions.retain(|&i| i != index);
        for i in self.exclusions.iter_mut() {
            if *i > index {
                *i -= 1;
            }
        }
        Some(self.records.remove(index))
    }

    /// Mark the record at `index` for exclusion
    pub fn mark_excluded(&mut self, index: usize) {
        if index < self.records.len() && !self.exclusions.contains(&index) {
            self.exclusions.push(index);
        }
    }

    /// Indices currently marked for exclusion
    pub fn exclusions(&self) -> &[usize] {
        &self.exclusions
    }

    /// Clear all exclusion marks without removing records
    pub fn clear_exclusions(&mut self) {
        self.exclusions.clear();
    }

    /// Remove all records marked for exclusion
    pub fn drop_excluded(&mut self) {
        if self.exclusions.is_empty() {
            return;
        }
        let excluded = std::mem::take(&mut self.exclusions);
        let mut index = 0;
        self.records.retain(|_| {
            let keep = !excluded.contains(&index);
            index += 1;
            keep
        });
        debug!(dropped = excluded.len(), remaining = self.records.len(), "Dropped excluded records");
    }

    /// Records whose corpus matches a regular expression or substring
    pub fn find(&self, pattern: &str) -> Result<RecordSet> {
        let mut found = RecordSet::new();
        for record in self.active() {
            if record.matches(pattern)? {
                found.push(record.clone());
            }
        }
        Ok(found)
    }

    /// Keep only records satisfying the predicate
    ///
    /// Rejected while exclusions are pending, since removal renumbers the
    /// marked indices.
    pub fn retain<F>(&mut self, f: F) -> Result<()>
    where
        F: FnMut(&MedlineRecord) -> bool,
    {
        if !self.exclusions.is_empty() {
            return Err(PubMedError::PendingExclusions);
        }
        self.records.retain(f);
        Ok(())
    }

    /// Append all records of `other`
    pub fn merge(&mut self, other: RecordSet) -> Result<()> {
        if !self.exclusions.is_empty() || !other.exclusions.is_empty() {
            return Err(PubMedError::PendingExclusions);
        }
        self.records.extend(other.records);
        Ok(())
    }

    /// Remove records repeating an earlier PMID, keeping first occurrences
    ///
    /// The PMID is unique in PubMed, so two records sharing one are the
    /// same publication. Records without a PMID are always kept.
    pub fn dedup_by_pmid(&mut self) -> Result<()> {
        if !self.exclusions.is_empty() {
            return Err(PubMedError::PendingExclusions);
        }
        let mut seen = std::collections::HashSet::new();
        self.records.retain(|record| match record.pmid() {
            Some(pmid) => seen.insert(pmid.to_string()),
            None => true,
        });
        Ok(())
    }

    /// Load records from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let records: Vec<MedlineRecord> = serde_json::from_str(&contents)?;
        info!(path = %path.display(), count = records.len(), "Loaded records");
        Ok(Self::from(records))
    }

    /// Save records to a JSON file, skipping excluded ones
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let active: Vec<&MedlineRecord> = self.active().collect();
        let json = serde_json::to_string_pretty(&active)?;
        fs::write(path, json)?;
        info!(path = %path.display(), count = active.len(), "Saved records");
        Ok(())
    }

    /// Export records to a BibTeX file (`.bib` appended when missing)
    pub fn save_as_bibtex(&self, path: impl AsRef<Path>) -> Result<()> {
        self.export_with(path, "bib", |r| r.to_bibtex(), "\n\n")
    }

    /// Export records to an NBIB (MEDLINE) file (`.nbib` appended when missing)
    pub fn save_as_nbib(&self, path: impl AsRef<Path>) -> Result<()> {
        self.export_with(path, "nbib", |r| r.to_nbib(), "\n\n")
    }

    /// Export records to a RIS file (`.ris` appended when missing)
    pub fn save_as_ris(&self, path: impl AsRef<Path>) -> Result<()> {
        self.export_with(path, "ris", |r| r.to_ris(), "\n")
    }

    fn export_with(
        &self,
        path: impl AsRef<Path>,
        extension: &str,
        format: impl Fn(&MedlineRecord) -> String,
        separator: &str,
    ) -> Result<()> {
        let path = path.as_ref();
        let path = if path.extension().is_some_and(|e| e.eq_ignore_ascii_case(extension)) {
            path.to_path_buf()
        } else {
            let mut with_ext = path.as_os_str().to_owned();
            with_ext.push(".");
            with_ext.push(extension);
            with_ext.into()
        };

        let mut out = self
            .active()
            .map(format)
            .collect::<Vec<_>>()
            .join(separator);
        out.push('\n');
        fs::write(&path, out)?;
        info!(path = %path.display(), "Exported records");
        Ok(())
    }
}

/// Record sets compare by their records; exclusion marks are transient
/// curation state and do not affect equality.
impl PartialEq for RecordSet {
    fn eq(&self, other: &Self) -> bool {
        self.records == other.records
    }
}

impl From<Vec<MedlineRecord>> for RecordSet {
    fn from(records: Vec<MedlineRecord>) -> Self {
        Self {
            records,
            exclusions: Vec::new(),
        }
    }
}

impl FromIterator<MedlineRecord> for RecordSet {
    fn from_iter<T: IntoIterator<Item = MedlineRecord>>(iter: T) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl Extend<MedlineRecord> for RecordSet {
    fn extend<T: IntoIterator<Item = MedlineRecord>>(&mut self, iter: T) {
        self.records.extend(iter);
    }
}

impl IntoIterator for RecordSet {
    type Item = MedlineRecord;
    type IntoIter = std::vec::IntoIter<MedlineRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a MedlineRecord;
    type IntoIter = std::slice::Iter<'a, MedlineRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl std::ops::Index<usize> for RecordSet {
    type Output = MedlineRecord;

    fn index(&self, index: usize) -> &Self::Output {
        &self.records[index]
    }
}

impl fmt::Display for RecordSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Records | {} entries", self.records.len())?;
        let years: Vec<i32> = self.records.iter().filter_map(MedlineRecord::year).collect();
        if let (Some(&min), Some(&max)) = (years.iter().min(), years.iter().max()) {
            if min == max {
                write!(f, " | {min}")?;
            } else {
                write!(f, " | {max} - {min}")?;
            }
        }
        write!(f, ">")
    }
}
