use anyhow::{Context, Result};
use clap::Args;
use pubmed_records_rs::{ClientConfig, PubMedClient};
use std::path::PathBuf;
use tracing::info;

#[derive(Args)]
pub struct Search {
    /// Search term (quoted phrases and PubMed field tags are passed through)
    pub term: String,

    /// Output JSON file
    #[arg(short, long, default_value = "records.json")]
    pub output: PathBuf,

    /// Maximum number of records to download (default: all matches)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Number of PMIDs per EFetch request
    #[arg(long, default_value_t = 50)]
    pub chunk_size: usize,

    /// Comma-separated MEDLINE fields to keep (e.g. PMID,TI,AU,AB,DP)
    #[arg(long, value_delimiter = ',')]
    pub fields: Option<Vec<String>>,
}

pub async fn run(args: Search, config: ClientConfig) -> Result<()> {
    let client = PubMedClient::with_config(config);

    let mut query = client.search().term(&args.term).chunk_size(args.chunk_size);
    if let Some(limit) = args.limit {
        query = query.limit(limit);
    }
    if let Some(ref fields) = args.fields {
        query = query.fields(fields.iter().cloned());
    }

    info!(term = %args.term, "Starting query");
    let records = query
        .run(&client)
        .await
        .with_context(|| format!("query failed for term {:?}", args.term))?;

    println!("{records}");
    records
        .save(&args.output)
        .with_context(|| format!("could not save records to {}", args.output.display()))?;
    println!("Saved {} records to {}", records.len(), args.output.display());

    Ok(())
}
