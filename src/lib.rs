//! # PubMed Records
//!
//! A Rust library for downloading, curating and exporting PubMed
//! bibliographic records in MEDLINE format.
//!
//! ## Features
//!
//! - **PubMed Download**: EGQuery/ESearch/EFetch pipeline with NCBI rate
//!   limiting and retry
//! - **MEDLINE Parsing**: Flat-file (`rettype=medline`) records parsed into
//!   a typed, field-keyed model
//! - **Curation**: Mark-and-drop exclusion workflow, regex search, merging
//!   and PMID de-duplication
//! - **Persistence and Export**: JSON record files plus BibTeX, NBIB and
//!   RIS export for bibliography software
//! - **DOI Handling**: DOI extraction from identifier fields and resolution
//!   to the publisher URL
//!
//! ## Quick Start
//!
//! ### Downloading records
//!
//! ```no_run
//! use pubmed_records_rs::PubMedClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PubMedClient::new();
//!
//!     let records = client
//!         .search()
//!         .term("diffusion kurtosis imaging")
//!         .chunk_size(50)
//!         .run(&client)
//!         .await?;
//!
//!     println!("{records}");
//!     records.save("my_records.json")?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Working with saved records
//!
//! ```no_run
//! use pubmed_records_rs::{ExportFormat, RecordSet};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let records = RecordSet::load("my_records.json")?;
//!
//!     // Pretty-print one record
//!     println!("{}", records[0].to_ascii(None, 80));
//!
//!     // Keep brain-related records published after 2010
//!     let mut recent = records.find("brain")?;
//!     recent.retain(|r| r.year().is_some_and(|y| y > 2010))?;
//!
//!     // Export for bibliography software
//!     recent.save_as_bibtex("mybib")?;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod doi;
pub mod error;
pub mod medline;
pub mod pubmed;
pub mod rate_limit;
pub mod retry;

// Re-export main types for convenience
pub use config::ClientConfig;
pub use doi::{extract_doi, resolve_doi};
pub use error::{PubMedError, Result};
pub use medline::{ExportFormat, FieldValue, MedlineRecord, RecordSet, parse_medline};
pub use pubmed::{PubMedClient, RecordQuery};
pub use rate_limit::RateLimiter;
pub use retry::RetryConfig;
