pub mod categories;
pub mod import;
pub mod init;
pub mod transactions;

use clap::{Parser, Subcommand, ValueEnum};

use crate::models::TransactionKind;

#[derive(Parser)]
#[command(name = "gofinances", about = "Track income and outcome transactions, with CSV import.")]
pub struct Cli {
    /// Database file to use instead of the one in the configured data directory
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Log pipeline progress to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Choose a data directory and initialize the database.
    Init {
        /// Path for gofinances data (default: ~/Documents/gofinances)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Import a CSV of `title,type,value,category` rows. The file is deleted afterwards.
    Import {
        /// Path to the CSV file to import
        file: String,
    },
    /// Manage transactions.
    Transactions {
        #[command(subcommand)]
        command: TransactionsCommands,
    },
    /// Manage categories.
    Categories {
        #[command(subcommand)]
        command: CategoriesCommands,
    },
    /// Show total income, outcome and balance.
    Balance,
}

#[derive(Subcommand)]
pub enum TransactionsCommands {
    /// List all transactions with the current balance.
    List,
    /// Record a single transaction.
    Add {
        /// Transaction title
        title: String,
        /// income or outcome
        #[arg(long = "type", value_enum)]
        kind: KindArg,
        /// Amount (positive)
        #[arg(long)]
        value: f64,
        /// Category title; created if it does not exist
        #[arg(long, default_value = "")]
        category: String,
    },
    /// Delete a transaction by ID.
    Delete {
        /// Transaction ID (shown in `gofinances transactions list`)
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum CategoriesCommands {
    /// List all categories.
    List,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum KindArg {
    Income,
    Outcome,
}

impl From<KindArg> for TransactionKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Income => TransactionKind::Income,
            KindArg::Outcome => TransactionKind::Outcome,
        }
    }
}
