use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

use athlete_etl::config::Config;
use athlete_etl::constants;
use athlete_etl::db;
use athlete_etl::logging;
use athlete_etl::pipeline::Pipeline;

#[derive(Parser)]
#[command(name = "athlete_etl")]
#[command(about = "Normalizes Catapult and ForceDecks exports into relational entity tables")]
#[command(version = "0.1.0")]
struct Cli {
    /// Config file (defaults to $ETL_CONFIG, then config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transform the source feeds into the output document
    Convert {
        /// Output document path, overriding the config
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Load an exported document into the SQLite database
    Load {
        /// Document to load (defaults to the configured output path)
        #[arg(long)]
        input: Option<PathBuf>,
        /// Database path, overriding the config
        #[arg(long)]
        db: Option<PathBuf>,
        /// Clear every table before loading
        #[arg(long)]
        replace: bool,
    },
    /// Delete all rows from database tables
    Clear {
        /// Database path, overriding the config
        #[arg(long)]
        db: Option<PathBuf>,
        /// Tables to clear (comma-separated). Clears every table when omitted.
        #[arg(long, value_delimiter = ',')]
        tables: Vec<String>,
    },
}

fn resolve_config(cli_path: Option<PathBuf>) -> anyhow::Result<Config> {
    let path = cli_path
        .or_else(|| std::env::var_os("ETL_CONFIG").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(constants::DEFAULT_CONFIG_PATH));
    Config::load_or_default(&path).with_context(|| format!("loading config {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let config = resolve_config(cli.config)?;

    match cli.command {
        Commands::Convert { output } => {
            let output = output.unwrap_or_else(|| config.output.path.clone());
            let summary = match Pipeline::new().run(&config, &output) {
                Ok(summary) => summary,
                Err(e) => {
                    error!("Convert failed: {}", e);
                    return Err(e.into());
                }
            };

            println!("\n📊 Conversion results:");
            println!("   Source records: {}", summary.source_records);
            for table in &summary.tables {
                println!("   {:<22} {}", table.name, table.rows);
            }
            println!("   Output file: {}", summary.output_file);
        }
        Commands::Load { input, db, replace } => {
            let input = input.unwrap_or_else(|| config.output.path.clone());
            let db_path = db.unwrap_or_else(|| config.database.path.clone());

            let text = std::fs::read_to_string(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let document: serde_json::Value = serde_json::from_str(&text)?;

            let inserted = db::with_sink(&db_path, |sink| {
                sink.create_schema()?;
                if replace {
                    sink.delete_table_data(&[])?;
                }
                sink.load_document(&document)
            })?;

            info!(rows = inserted, db = %db_path.display(), "Load complete");
            println!("✅ Loaded {} rows into {}", inserted, db_path.display());
        }
        Commands::Clear { db, tables } => {
            let db_path = db.unwrap_or_else(|| config.database.path.clone());
            let tables: Vec<&str> = tables
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .collect();

            let deleted = db::with_sink(&db_path, |sink| {
                sink.create_schema()?;
                sink.delete_table_data(&tables)
            })?;

            println!("🗑️  Deleted {} rows from {}", deleted, db_path.display());
        }
    }

    Ok(())
}
