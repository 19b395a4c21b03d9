use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use section3_core::{ContractKey, TaskStatus};
use section3_import::{ImportOptions, QuoteMode, import_contracts};
use section3_store::{ComplianceStore, DuckStore};
use section3_sync::{HudReporting, HudSystem, SimulatedHud};
use tracing_subscriber::EnvFilter;

mod display;

#[derive(Parser)]
#[command(name = "section3", version, about = "Section 3 contract import and compliance tracking")]
struct Cli {
    /// DuckDB database file. An in-memory database is used when omitted.
    #[arg(long, env = "SECTION3_DB", global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the contracts and compliance_tasks tables.
    Init,
    /// Import contracts from a CSV file.
    Import {
        file: PathBuf,
        /// Honour RFC 4180 quoting so quoted cells may contain commas.
        #[arg(long)]
        quoted: bool,
        /// Also write a metric,value summary to this path.
        #[arg(long)]
        summary_csv: Option<PathBuf>,
        /// Print the full result as JSON on stdout.
        #[arg(long)]
        json: bool,
    },
    /// List imported contracts.
    Contracts {
        #[arg(long)]
        client: Option<String>,
    },
    /// List the compliance tasks of one contract.
    Tasks {
        client: String,
        contract_number: String,
    },
    /// Set the status of a task (pending, in_progress, completed, overdue).
    TaskStatus { id: i64, status: TaskStatus },
    /// Submit applicable contracts to the simulated HUD reporting backend.
    Sync {
        #[arg(long, default_value = "spears")]
        system: HudSystem,
        #[arg(long)]
        client: Option<String>,
    },
}

fn open_store(db: Option<&Path>) -> anyhow::Result<DuckStore> {
    let store = match db {
        Some(path) => DuckStore::open_persistent(path)
            .with_context(|| format!("opening {}", path.display()))?,
        None => DuckStore::open()?,
    };
    Ok(store)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    tracing::info!("section3 v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let store = open_store(cli.db.as_deref())?;

    match cli.command {
        Command::Init => {
            store.init_schema()?;
            println!("Tables ready: contracts, compliance_tasks");
        }
        Command::Import {
            file,
            quoted,
            summary_csv,
            json,
        } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let options = ImportOptions {
                quote_mode: if quoted {
                    QuoteMode::Rfc4180
                } else {
                    QuoteMode::Naive
                },
                ..ImportOptions::default()
            };
            let result = import_contracts(&store, &text, &options).await;

            if let Some(path) = summary_csv {
                let out = File::create(&path)
                    .with_context(|| format!("creating {}", path.display()))?;
                result
                    .write_summary_csv(BufWriter::new(out))
                    .with_context(|| format!("writing {}", path.display()))?;
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                display::print_import_summary(&result);
            }

            if result.needs_setup() {
                display::print_setup_instructions(cli.db.as_deref());
                bail!("database tables not initialized");
            }
            if let Some(failure) = result.failure {
                bail!("import failed: {failure:?}");
            }
        }
        Command::Contracts { client } => {
            store.ensure_schema().await?;
            let batches = store.contracts_batches(client.as_deref())?;
            display::print_batches(&batches)?;
        }
        Command::Tasks {
            client,
            contract_number,
        } => {
            let key = ContractKey::new(client, contract_number);
            if store.get_contract(&key).await?.is_none() {
                bail!("no contract {key}");
            }
            let tasks = store.tasks_for_contract(&key).await?;
            display::print_tasks(&key, &tasks);
        }
        Command::TaskStatus { id, status } => {
            store.update_task_status(id, status).await?;
            println!("Task {id} is now {status}");
        }
        Command::Sync { system, client } => {
            let contracts: Vec<_> = store
                .list_contracts(client.as_deref())
                .await?
                .into_iter()
                .map(|stored| stored.record)
                .collect();
            let hud = SimulatedHud::new();
            let receipt = hud.submit(system, &contracts).await?;
            display::print_receipt(&receipt);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_task_status_and_system() {
        let cli = Cli::try_parse_from(["section3", "task-status", "4", "in-progress"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::TaskStatus {
                id: 4,
                status: TaskStatus::InProgress
            }
        ));

        let cli = Cli::try_parse_from(["section3", "--db", "s3.duckdb", "sync", "--system", "idis"])
            .unwrap();
        assert_eq!(cli.db.as_deref(), Some(Path::new("s3.duckdb")));
        assert!(matches!(
            cli.command,
            Command::Sync {
                system: HudSystem::Idis,
                client: None
            }
        ));
    }
}
