mod cli;
mod db;
mod error;
mod fmt;
mod importer;
mod ledger;
mod models;
mod settings;
mod store;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{CategoriesCommands, Cli, Commands, TransactionsCommands};
use settings::resolve_db_path;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_env("GOFINANCES_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let db = cli.db.as_deref();
    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir, db),
        Commands::Import { file } => cli::import::run(&resolve_db_path(db), &file),
        Commands::Transactions { command } => match command {
            TransactionsCommands::List => cli::transactions::list(&resolve_db_path(db)),
            TransactionsCommands::Add {
                title,
                kind,
                value,
                category,
            } => cli::transactions::add(&resolve_db_path(db), &title, kind.into(), value, &category),
            TransactionsCommands::Delete { id } => cli::transactions::delete(&resolve_db_path(db), id),
        },
        Commands::Categories { command } => match command {
            CategoriesCommands::List => cli::categories::list(&resolve_db_path(db)),
        },
        Commands::Balance => cli::transactions::balance(&resolve_db_path(db)),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
