use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result, miette};
use std::fs::File;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use walletledger::application::dispatch::Invocation;
use walletledger::application::engine::WalletLedger;
use walletledger::config::{ExistingWalletPolicy, LedgerConfig};
use walletledger::domain::ports::{HistoryProviderBox, LedgerStoreBox};
use walletledger::infrastructure::in_memory::InMemoryLedgerStore;
use walletledger::interfaces::csv::invocation_reader::InvocationReader;
use walletledger::interfaces::csv::response_writer::ResponseWriter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    /// What init_wallet does when the wallet already exists.
    #[arg(long, value_enum, global = true, default_value_t = ExistingWalletPolicy::Overwrite)]
    on_existing: ExistingWalletPolicy,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one function and print its payload
    Invoke {
        /// Function name (init, init_wallet, publish, transfer, get_account, get_txList)
        function: String,
        /// Positional string arguments
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Run every invocation of a CSV file (`function,arg1,...` per row) in order
    Batch {
        /// Input invocations CSV file
        input: PathBuf,
    },
}

#[cfg(feature = "storage-rocksdb")]
fn open_store(db_path: Option<PathBuf>) -> Result<(LedgerStoreBox, HistoryProviderBox)> {
    use walletledger::infrastructure::rocksdb::RocksDBStore;

    if let Some(db_path) = db_path {
        let store = RocksDBStore::open(db_path).into_diagnostic()?;
        return Ok((Box::new(store.clone()), Box::new(store)));
    }
    let store = InMemoryLedgerStore::new();
    Ok((Box::new(store.clone()), Box::new(store)))
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_store(db_path: Option<PathBuf>) -> Result<(LedgerStoreBox, HistoryProviderBox)> {
    if db_path.is_some() {
        tracing::warn!(
            "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to in-memory storage."
        );
    }
    let store = InMemoryLedgerStore::new();
    Ok((Box::new(store.clone()), Box::new(store)))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();

    let cli = Cli::parse();

    let config = LedgerConfig::default().with_existing_wallet_policy(cli.on_existing);
    let (store, history) = open_store(cli.db_path)?;
    let ledger = WalletLedger::new(store, history, config);
    tracing::debug!(config = ?ledger.config(), "Ledger ready");

    match cli.command {
        Command::Invoke { function, args } => {
            let invocation = Invocation::new(&function, args);
            let payload = ledger
                .invoke(&invocation)
                .await
                .map_err(|e| miette!("{}: {}", e.tag(), e))?;

            let rendered = payload.render().into_diagnostic()?;
            let mut stdout = io::stdout().lock();
            if !rendered.is_empty() {
                writeln!(stdout, "{rendered}").into_diagnostic()?;
            }
        }
        Command::Batch { input } => {
            let file = File::open(input).into_diagnostic()?;
            let reader = InvocationReader::new(file);
            let mut writer = ResponseWriter::new(io::stdout().lock()).into_diagnostic()?;

            for invocation in reader.invocations() {
                match invocation {
                    Ok(invocation) => {
                        let response = ledger.invoke(&invocation).await;
                        writer
                            .write_response(&invocation.function, &response)
                            .into_diagnostic()?;
                    }
                    Err(e) => {
                        tracing::error!("Error reading invocation: {e}");
                    }
                }
            }
            writer.flush().into_diagnostic()?;
        }
    }

    Ok(())
}
