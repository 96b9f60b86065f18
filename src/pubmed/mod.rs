//! PubMed E-utilities client and query pipeline

pub mod client;
pub mod query;
pub(crate) mod responses;

pub use client::{DEFAULT_CHUNK_SIZE, PubMedClient};
pub use query::RecordQuery;
