use anyhow::{Context, Result, bail};
use clap::Args;
use pubmed_records_rs::RecordSet;
use std::path::PathBuf;

#[derive(Args)]
pub struct Show {
    /// Input JSON record file
    pub input: PathBuf,

    /// Show only the record at this index
    #[arg(short, long)]
    pub index: Option<usize>,

    /// Line width for wrapped text
    #[arg(short, long, default_value_t = 80)]
    pub width: usize,

    /// Comma-separated MEDLINE fields to display
    #[arg(long, value_delimiter = ',')]
    pub fields: Option<Vec<String>>,
}

pub fn run(args: Show) -> Result<()> {
    let records = RecordSet::load(&args.input)
        .with_context(|| format!("could not load records from {}", args.input.display()))?;

    let fields: Option<Vec<&str>> = args
        .fields
        .as_ref()
        .map(|f| f.iter().map(String::as_str).collect());

    match args.index {
        Some(index) => {
            let Some(record) = records.get(index) else {
                bail!("index {index} out of range ({} records)", records.len());
            };
            println!("{}", record.to_ascii(fields.as_deref(), args.width));
        }
        None => {
            println!("{records}\n");
            for record in &records {
                println!("{}", record.to_ascii(fields.as_deref(), args.width));
            }
        }
    }

    Ok(())
}
