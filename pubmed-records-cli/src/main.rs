use anyhow::Result;
use clap::{Parser, Subcommand};
use pubmed_records_rs::ClientConfig;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(
    name = "pubmed-records",
    about = "Download, curate and export PubMed bibliographic records",
    long_about = "A CLI for querying PubMed, saving MEDLINE records as JSON and \
                  exporting them for bibliography software"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// API key for NCBI E-utilities (increases rate limit)
    #[arg(long, env = "NCBI_API_KEY", global = true)]
    api_key: Option<String>,

    /// Email for NCBI requests (recommended)
    #[arg(long, env = "NCBI_EMAIL", global = true)]
    email: Option<String>,

    /// Tool name for NCBI requests
    #[arg(long, env = "NCBI_TOOL", default_value = "pubmed-records-cli", global = true)]
    tool: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Search PubMed and save the matching records as JSON
    Search(commands::search::Search),
    /// Export a record file to a citation format
    Export(commands::export::Export),
    /// Pretty-print records from a record file
    Show(commands::show::Show),
    /// Interactively keep or drop records in a record file
    Review(commands::review::Review),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = ClientConfig::new();
    if let Some(api_key) = cli.api_key {
        config = config.with_api_key(api_key);
    }
    if let Some(email) = cli.email {
        config = config.with_email(email);
    }
    config = config.with_tool(cli.tool);

    match cli.command {
        Commands::Search(args) => commands::search::run(args, config).await,
        Commands::Export(args) => commands::export::run(args),
        Commands::Show(args) => commands::show::run(args),
        Commands::Review(args) => commands::review::run(args),
    }
}
