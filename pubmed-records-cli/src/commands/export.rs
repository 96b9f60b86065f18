use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use pubmed_records_rs::RecordSet;
use std::path::PathBuf;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Bibtex,
    Nbib,
    Ris,
}

#[derive(Args)]
pub struct Export {
    /// Input JSON record file
    pub input: PathBuf,

    /// Citation format to export
    #[arg(short, long, value_enum)]
    pub format: Format,

    /// Output file (extension appended when missing)
    #[arg(short, long)]
    pub output: PathBuf,
}

pub fn run(args: Export) -> Result<()> {
    let records = RecordSet::load(&args.input)
        .with_context(|| format!("could not load records from {}", args.input.display()))?;

    match args.format {
        Format::Bibtex => records.save_as_bibtex(&args.output)?,
        Format::Nbib => records.save_as_nbib(&args.output)?,
        Format::Ris => records.save_as_ris(&args.output)?,
    }

    println!("Exported {} records", records.len());
    Ok(())
}
