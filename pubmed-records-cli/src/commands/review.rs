//! Interactive record review: walk through a record file, decide per
//! record whether to keep it, and write the survivors back.

use anyhow::{Context, Result};
use clap::Args;
use pubmed_records_rs::RecordSet;
use std::io::{BufRead, Write};
use std::path::PathBuf;

#[derive(Args)]
pub struct Review {
    /// Input JSON record file
    pub input: PathBuf,

    /// Output file (default: overwrite the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Line width for wrapped text
    #[arg(short, long, default_value_t = 80)]
    pub width: usize,

    /// Comma-separated MEDLINE fields to display while reviewing
    #[arg(long, value_delimiter = ',')]
    pub fields: Option<Vec<String>>,
}

pub fn run(args: Review) -> Result<()> {
    let records = RecordSet::load(&args.input)
        .with_context(|| format!("could not load records from {}", args.input.display()))?;

    let fields: Option<Vec<&str>> = args
        .fields
        .as_ref()
        .map(|f| f.iter().map(String::as_str).collect());

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let records = review_records(
        records,
        fields.as_deref(),
        args.width,
        &mut stdin.lock(),
        &mut stdout,
    )?;

    let output = args.output.as_ref().unwrap_or(&args.input);
    records
        .save(output)
        .with_context(|| format!("could not save records to {}", output.display()))?;
    println!("Kept {} records, saved to {}", records.len(), output.display());

    Ok(())
}

/// Walk through the records, asking per record whether to keep it.
/// `n` drops the record, `q` stops reviewing, anything else keeps it.
fn review_records(
    mut records: RecordSet,
    fields: Option<&[&str]>,
    width: usize,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<RecordSet> {
    for index in 0..records.len() {
        writeln!(output, "{}", records[index].to_ascii(fields, width))?;
        write!(output, "--> keep this record? (y/n/q) ")?;
        output.flush()?;

        let mut answer = String::new();
        if input.read_line(&mut answer)? == 0 {
            break;
        }
        match answer.trim() {
            "n" => records.mark_excluded(index),
            "q" => break,
            _ => {}
        }
    }

    records.drop_excluded();
    Ok(records)
}
