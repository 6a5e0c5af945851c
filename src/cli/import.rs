use std::path::Path;

use crate::db::open_db;
use crate::error::Result;
use crate::importer::CsvTransactionImporter;
use crate::store::{SqliteCategoryStore, SqliteTransactionStore};

use super::transactions::transactions_table;

pub fn run(db_path: &Path, file: &str) -> Result<()> {
    let conn = open_db(db_path)?;
    let categories = SqliteCategoryStore::new(&conn);
    let transactions = SqliteTransactionStore::new(&conn);

    let result = CsvTransactionImporter::new(&categories, &transactions).import(Path::new(file))?;

    println!(
        "{} imported, {} skipped, {} new categories",
        result.transactions.len(),
        result.skipped,
        result.created_categories.len()
    );
    if !result.transactions.is_empty() {
        println!("{}", transactions_table(&result.transactions));
    }
    Ok(())
}
