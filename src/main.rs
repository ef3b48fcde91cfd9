use clap::Parser;
use jama::application::app::JamaApp;
use jama::application::latency::Latency;
use jama::application::ledger::PaymentLedger;
use jama::application::session::SessionManager;
use jama::domain::ports::KeyValueStoreBox;
use jama::infrastructure::catalog::Catalog;
use jama::infrastructure::in_memory::InMemoryKeyValueStore;
#[cfg(feature = "storage-rocksdb")]
use jama::infrastructure::rocksdb::RocksDBStore;
use jama::interfaces::console::ScreenWriter;
use jama::interfaces::csv::intent_reader::IntentReader;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Intent script CSV file
    input: PathBuf,

    /// Path to a persistent session store (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Simulated backend delay per operation, in milliseconds
    #[arg(long, default_value_t = 1000)]
    latency_ms: u64,
}

fn session_store(db_path: Option<PathBuf>) -> Result<KeyValueStoreBox> {
    let Some(db_path) = db_path else {
        return Ok(Box::new(InMemoryKeyValueStore::new()));
    };

    #[cfg(feature = "storage-rocksdb")]
    {
        info!(path = %db_path.display(), "Opening session store");
        let store = RocksDBStore::open(db_path).into_diagnostic()?;
        Ok(Box::new(store))
    }

    #[cfg(not(feature = "storage-rocksdb"))]
    {
        warn!(
            path = %db_path.display(),
            "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to in-memory storage."
        );
        Ok(Box::new(InMemoryKeyValueStore::new()))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let latency = Latency::from_millis(cli.latency_ms);
    info!(latency_ms = cli.latency_ms, "Starting Jama console");

    let catalog = Catalog::demo().into_diagnostic()?;
    let storage = session_store(cli.db_path)?;
    let session = SessionManager::new(Box::new(catalog.directory()), storage, latency);
    let ledger = PaymentLedger::new(Box::new(catalog.payments()), latency);
    let mut app = JamaApp::new(session, ledger);

    let stdout = io::stdout();
    let mut writer = ScreenWriter::new(stdout.lock());

    let screen = app.start().await.into_diagnostic()?;
    writer.write_screen(&screen).into_diagnostic()?;

    let file = File::open(cli.input).into_diagnostic()?;
    let reader = IntentReader::new(file);
    for intent_result in reader.intents() {
        match intent_result {
            Ok(intent) => match app.handle(intent).await {
                Ok(screen) => writer.write_screen(&screen).into_diagnostic()?,
                Err(e) => warn!(error = %e, "Error handling intent"),
            },
            Err(e) => warn!(error = %e, "Error reading intent"),
        }
    }

    Ok(())
}
