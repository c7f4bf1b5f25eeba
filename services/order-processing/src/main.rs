//! Order Quotation CLI
//!
//! Runs one order document through the quotation pipeline and prints the
//! run report as JSON.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use quotation_database::{initialize_order_store, RecordStore};
use quotation_email_communication::{QuotationComposer, SmtpClient, SmtpConfig};
use quotation_order_processing::{ContinuePolicy, Pipeline, RunRequest, SheetWriter, UnavailableStore};
use quotation_utils::{init_logging, AppConfig, QuotationError};

#[derive(Debug, Parser)]
#[command(name = "order-quotation", version, about = "Price an order document and email the quotation")]
struct Cli {
    /// Order document (.pdf, .csv, .xlsx or .xls)
    document: PathBuf,

    /// Recipient of the quotation email
    #[arg(long)]
    to: String,

    /// Costing sheet to write (.xlsx or .csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Do not send the email when storing or writing the sheet failed
    #[arg(long)]
    skip_notify_on_persistence_failure: bool,

    /// Compute the quotation without storing, writing or sending anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load().map_err(QuotationError::from)?;
    init_logging(&config.logging)?;
    info!("Starting order quotation run");

    let output = cli
        .output
        .unwrap_or_else(|| PathBuf::from(&config.quotation.default_output_path));
    let request = RunRequest::new(cli.document, cli.to, output).dry_run(cli.dry_run);

    let store: Arc<dyn RecordStore> = if cli.dry_run {
        Arc::new(UnavailableStore::new("dry run"))
    } else {
        connect_store(&config).await
    };

    let notifier = SmtpClient::new(SmtpConfig {
        host: config.email.smtp_host.clone(),
        port: config.email.smtp_port,
        username: config.email.smtp_username.clone(),
        password: config.email.smtp_password.clone(),
        from_email: config.email.from_address.clone(),
        from_name: config.email.from_name.clone(),
    });

    let pipeline = Pipeline::new(store, Arc::new(SheetWriter::default()), Arc::new(notifier))
        .with_composer(QuotationComposer::new(
            &config.quotation.subject,
            &config.quotation.currency_symbol,
            &config.email.signature,
        ))
        .with_policy(ContinuePolicy {
            notify_on_persistence_failure: !cli.skip_notify_on_persistence_failure,
        });

    let report = pipeline.run(&request).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

/// Connect to MongoDB; an unreachable server fails the store stage only.
async fn connect_store(config: &AppConfig) -> Arc<dyn RecordStore> {
    let store_config = quotation_database::DatabaseConfig {
        mongodb_url: config.database.mongodb_url.clone(),
        database_name: config.database.database_name.clone(),
        collection: config.database.collection.clone(),
        connection_timeout: Duration::from_secs(config.database.connection_timeout_seconds),
    };

    match initialize_order_store(&store_config).await {
        Ok(repository) => {
            info!(collection = repository.collection_name(), "Connected to MongoDB");
            Arc::new(repository)
        }
        Err(e) => {
            let reason = format!("{:#}", e);
            tracing::error!(error = %reason, "MongoDB unavailable; order lines will not be stored");
            Arc::new(UnavailableStore::new(reason))
        }
    }
}
