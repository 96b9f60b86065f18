//! Builder for PubMed record downloads
//!
//! A `RecordQuery` describes what to download (search term, optional result
//! limit) and how (EFetch chunk size, optional restriction of the MEDLINE
//! fields kept on each record). `run` executes the pipeline against a
//! [`PubMedClient`]: a global count (unless a limit is set), an ESearch for
//! the PMIDs and chunked EFetch calls.

use crate::error::{PubMedError, Result};
use crate::medline::records::RecordSet;
use crate::pubmed::client::{DEFAULT_CHUNK_SIZE, PubMedClient};
use tracing::{info, instrument};

/// Query builder for downloading PubMed records
#[derive(Debug, Clone, Default)]
pub struct RecordQuery {
    term: String,
    fields: Option<Vec<String>>,
    chunk_size: Option<usize>,
    limit: Option<usize>,
}

impl RecordQuery {
    /// Create an empty query
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search term
    pub fn term(mut self, term: impl Into<String>) -> Self {
        self.term = term.into();
        self
    }

    /// Keep only the given MEDLINE fields on each downloaded record
    ///
    /// Without this, all fields served by PubMed are kept.
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Number of PMIDs per EFetch request (default 50)
    ///
    /// Lower this when large requests fail.
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = Some(chunk_size.max(1));
        self
    }

    /// Cap the number of records downloaded
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Execute the query against a client
    #[instrument(skip(self, client), fields(term = %self.term))]
    pub async fn run(&self, client: &PubMedClient) -> Result<RecordSet> {
        if self.term.trim().is_empty() {
            return Err(PubMedError::InvalidQuery(
                "Search term cannot be empty".to_string(),
            ));
        }

        let retmax = match self.limit {
            Some(limit) => limit,
            None => {
                let count = client.global_count(&self.term).await?;
                info!(count, "Records found");
                if count == 0 {
                    return Ok(RecordSet::new());
                }
                count as usize
            }
        };

        let pmids = client.search_pmids(&self.term, retmax).await?;
        if pmids.is_empty() {
            info!("Search returned no PMIDs");
            return Ok(RecordSet::new());
        }

        let chunk_size = self.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE);
        let mut records = client.fetch_records(&pmids, chunk_size).await?;

        if let Some(ref fields) = self.fields {
            let keep: Vec<&str> = fields.iter().map(String::as_str).collect();
            let mut restricted = RecordSet::new();
            for mut record in records {
                record.restrict_fields(&keep);
                restricted.push(record);
            }
            records = restricted;
        }

        Ok(records)
    }
}
