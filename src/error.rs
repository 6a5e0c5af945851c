use thiserror::Error;

#[derive(Error, Debug)]
pub enum FinanceError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unknown transaction type: {0} (must be 'income' or 'outcome')")]
    UnknownKind(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("No category matches '{0}'")]
    UnresolvedCategory(String),

    #[error("Insufficient balance: outcome of {value:.2} exceeds total of {total:.2}")]
    InsufficientBalance { value: f64, total: f64 },

    #[error("Transaction not found: id {0}")]
    TransactionNotFound(i64),

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, FinanceError>;
