//! Lens CLI - Edit and inspect query specifications
//!
//! Usage:
//!   lens new <query> <data_source>
//!   lens add-table <query> <table> [--label <label>]
//!   lens add-column <query> <table> <column> [--label <label>] [--type <type>]
//!   lens filters <query> [file.json]
//!   lens shape <query> <results.json>
//!
//! Examples:
//!   lens --catalog catalog.json new QRY-0001 sales_db
//!   lens --catalog catalog.json add-table QRY-0001 orders --label Orders
//!   lens --catalog catalog.json columns QRY-0001
//!   RUST_LOG=lens=debug lens show QRY-0001

use clap::{Parser, Subcommand};
use lens::catalog::InMemoryCatalog;
use lens::config::Settings;
use lens::editor::QueryEditor;
use lens::error::QueryResult;
use lens::results::RawResultSet;
use lens::spec::{FilterGroup, JoinSpec, NewColumn, NewTable};
use lens::store::SqliteSpecStore;
use serde::Serialize;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "lens")]
#[command(about = "Lens - Edit, validate and shape BI query specifications")]
#[command(version)]
struct Cli {
    /// Config file (defaults to LENS_CONFIG, ./lens.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Query store database (overrides [store] path)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// JSON schema catalog (overrides [catalog] path)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new query
    New { query: String, data_source: String },

    /// Print a stored query as JSON
    Show { query: String },

    /// List the tables available to a query
    Tables { query: String },

    /// Select a table
    AddTable {
        query: String,
        table: String,
        #[arg(short, long)]
        label: Option<String>,
    },

    /// Remove a selected table by row name
    RemoveTable { query: String, row: String },

    /// Join a selected table to another table, or clear its join
    Join {
        query: String,
        /// Row name of the selected table
        row: String,
        /// Table to join with
        #[arg(long, required_unless_present = "clear")]
        with: Option<String>,
        /// Label of the joined table
        #[arg(long)]
        label: Option<String>,
        /// Clear the join instead
        #[arg(long)]
        clear: bool,
    },

    /// Project a column
    AddColumn {
        query: String,
        table: String,
        column: String,
        #[arg(short, long)]
        label: Option<String>,
        #[arg(short = 't', long = "type", default_value = "String")]
        column_type: String,
        /// Aggregation, e.g. "Sum" or "Cumulative Sum"
        #[arg(short, long)]
        aggregation: Option<String>,
    },

    /// Move a column (zero-based positions)
    MoveColumn { query: String, from: usize, to: usize },

    /// Remove a projected column by row name
    RemoveColumn { query: String, row: String },

    /// Replace the filter tree with a JSON root group (file or stdin)
    Filters { query: String, file: Option<PathBuf> },

    /// Restore the default filters
    Reset { query: String },

    /// Validate a stored query
    Validate { query: String },

    /// List the catalog columns of the selected and joined tables
    Columns { query: String },

    /// Shape raw JSON results (header row first) for display
    Shape { query: String, file: PathBuf },
}

fn init_logging(verbose: bool) {
    let filter = if verbose { "lens=debug" } else { "lens=warn" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = match &cli.config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let store = match open_store(&cli, &settings) {
        Ok(store) => store,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::FAILURE;
        }
    };

    let catalog = match open_catalog(&cli, &settings) {
        Ok(catalog) => catalog,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::FAILURE;
        }
    };

    let editor = QueryEditor::new(&store, &catalog)
        .with_settings(&settings)
        .with_value_source(&catalog);

    match cli.command {
        Commands::New { query, data_source } => {
            report(editor.create(&query, &data_source), |spec| print_json(&spec))
        }
        Commands::Show { query } => report(editor.load(&query), |spec| print_json(&spec)),
        Commands::Tables { query } => {
            report(editor.fetch_tables(&query), |tables| print_json(&tables))
        }
        Commands::AddTable {
            query,
            table,
            label,
        } => {
            let new_table = NewTable {
                label: label.unwrap_or_else(|| table.clone()),
                table,
            };
            report(editor.add_table(&query, new_table), print_row)
        }
        Commands::RemoveTable { query, row } => {
            report(editor.remove_table(&query, &row), |found| {
                print_match(found, &row)
            })
        }
        Commands::Join {
            query,
            row,
            with,
            label,
            clear,
        } => {
            let join = if clear {
                None
            } else {
                with.map(|table| {
                    let label = label.unwrap_or_else(|| table.clone());
                    JoinSpec::with_table(table, label)
                })
            };
            report(editor.update_table(&query, &row, join), |found| {
                print_match(found, &row)
            })
        }
        Commands::AddColumn {
            query,
            table,
            column,
            label,
            column_type,
            aggregation,
        } => {
            let label = label.unwrap_or_else(|| column.clone());
            let mut new_column = NewColumn::column(table, column, label, column_type);
            if let Some(aggregation) = aggregation {
                new_column = new_column.aggregated(aggregation);
            }
            report(editor.add_column(&query, new_column), print_row)
        }
        Commands::MoveColumn { query, from, to } => {
            report(editor.move_column(&query, from, to), |()| ExitCode::SUCCESS)
        }
        Commands::RemoveColumn { query, row } => {
            report(editor.remove_column(&query, &row), |found| {
                print_match(found, &row)
            })
        }
        Commands::Filters { query, file } => {
            let filters: FilterGroup = match read_json(file.as_deref()) {
                Ok(f) => f,
                Err(message) => {
                    eprintln!("{}", message);
                    return ExitCode::FAILURE;
                }
            };
            report(editor.update_filters(&query, filters), |stored| {
                print_json(&stored)
            })
        }
        Commands::Reset { query } => report(editor.reset(&query), |()| ExitCode::SUCCESS),
        Commands::Validate { query } => report(editor.validate(&query), |spec| {
            println!("OK: {} is valid", spec.name);
            ExitCode::SUCCESS
        }),
        Commands::Columns { query } => {
            report(editor.fetch_columns(&query), |columns| print_json(&columns))
        }
        Commands::Shape { query, file } => {
            let results: RawResultSet = match read_json(Some(&file)) {
                Ok(r) => r,
                Err(message) => {
                    eprintln!("{}", message);
                    return ExitCode::FAILURE;
                }
            };
            report(editor.shape_results(&query, results), |shaped| {
                print_json(&shaped)
            })
        }
    }
}

fn open_store(cli: &Cli, settings: &Settings) -> Result<SqliteSpecStore, String> {
    let configured = match &cli.store {
        Some(path) => Some(path.clone()),
        None => settings
            .store_path()
            .map_err(|e| format!("Error in store config: {}", e))?,
    };
    let store = match configured {
        Some(path) => SqliteSpecStore::open(path),
        None => SqliteSpecStore::open_default(),
    };
    store.map_err(|e| format!("Error opening query store: {}", e))
}

fn open_catalog(cli: &Cli, settings: &Settings) -> Result<InMemoryCatalog, String> {
    let configured = match &cli.catalog {
        Some(path) => Some(path.clone()),
        None => settings
            .catalog_path()
            .map_err(|e| format!("Error in catalog config: {}", e))?,
    };
    match configured {
        Some(path) => InMemoryCatalog::from_json_file(&path)
            .map_err(|e| format!("Error loading catalog '{}': {}", path.display(), e)),
        None => Ok(InMemoryCatalog::new()),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(file: Option<&Path>) -> Result<T, String> {
    let content = match file {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| format!("Error reading file '{}': {}", path.display(), e))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("Error reading stdin: {}", e))?;
            buf
        }
    };
    serde_json::from_str(&content).map_err(|e| format!("Invalid JSON: {}", e))
}

fn report<T>(result: QueryResult<T>, on_ok: impl FnOnce(T) -> ExitCode) -> ExitCode {
    match result {
        Ok(value) => on_ok(value),
        Err(e) if e.is_validation() => {
            eprintln!("Validation error: {}", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_row(name: String) -> ExitCode {
    println!("{}", name);
    ExitCode::SUCCESS
}

fn print_match(found: bool, row: &str) -> ExitCode {
    if !found {
        eprintln!("No row named {}; nothing changed", row);
    }
    ExitCode::SUCCESS
}
