use clap::Parser;
use miette::{IntoDiagnostic, Result};
use parcs_export::application::export::{create_xml_documents, group_by_subsidiary, save_documents};
use parcs_export::config::{ExportConfig, read_parameter_store};
use parcs_export::domain::ports::ParameterStoreBox;
use parcs_export::infrastructure::json_file::load_parameters;
use parcs_export::interfaces::csv::transaction_reader::TransactionReader;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input transactions CSV file
    input: PathBuf,

    /// Directory to save the batch documents to (overrides the parameter file)
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Print the documents as a JSON array instead of saving them
    #[arg(long)]
    json: bool,

    /// JSON file of parameter names to values
    #[arg(long)]
    params: Option<PathBuf>,

    /// Parameter path the configuration is read from
    #[arg(long, default_value = "/parcs-export")]
    param_path: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ExportConfig::default();
    if let Some(params) = &cli.params {
        let file = File::open(params).into_diagnostic()?;
        let store: ParameterStoreBox = Box::new(load_parameters(file).await.into_diagnostic()?);
        read_parameter_store(store.as_ref(), &cli.param_path, &mut config)
            .await
            .into_diagnostic()?;
    }
    if let Some(out_dir) = cli.out_dir {
        config.output_dir = out_dir;
    }
    if cli.json {
        config.emit_json = true;
    }

    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = TransactionReader::new(file);
    let mut transactions = Vec::new();
    for tx_result in reader.transactions() {
        match tx_result {
            Ok(tx) => transactions.push(tx),
            Err(e) => tracing::warn!(error = %e, "failed to read transaction"),
        }
    }

    let batches = config.select(group_by_subsidiary(transactions).into_diagnostic()?);
    tracing::info!(batches = batches.len(), "creating batch documents");
    let documents = create_xml_documents(&batches).into_diagnostic()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if config.emit_json {
        serde_json::to_writer_pretty(&mut out, &documents).into_diagnostic()?;
        writeln!(out).into_diagnostic()?;
    } else {
        for path in save_documents(&config.output_dir, &documents).into_diagnostic()? {
            writeln!(out, "{}", path.display()).into_diagnostic()?;
        }
    }

    Ok(())
}
