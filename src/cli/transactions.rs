use std::path::Path;

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::db::open_db;
use crate::error::Result;
use crate::fmt::{money, signed_money};
use crate::ledger::{create_transaction, delete_transaction};
use crate::models::{Balance, Transaction, TransactionKind};
use crate::store::{SqliteCategoryStore, SqliteTransactionStore, TransactionStore};

pub(crate) fn transactions_table(txns: &[Transaction]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Value", "Category", "Date"]);
    for txn in txns {
        let value = signed_money(txn.kind, txn.value);
        let value = match txn.kind {
            TransactionKind::Income => value.green(),
            TransactionKind::Outcome => value.red(),
        };
        table.add_row(vec![
            Cell::new(txn.id),
            Cell::new(&txn.title),
            Cell::new(value),
            Cell::new(&txn.category_title),
            Cell::new(&txn.created_at),
        ]);
    }
    table
}

fn balance_table(balance: &Balance) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Income", "Outcome", "Total"]);
    let total = money(balance.total);
    let total = if balance.total < 0.0 { total.red() } else { total.bold() };
    table.add_row(vec![
        Cell::new(money(balance.income).green()),
        Cell::new(money(balance.outcome).red()),
        Cell::new(total),
    ]);
    table
}

pub fn list(db_path: &Path) -> Result<()> {
    let conn = open_db(db_path)?;
    let store = SqliteTransactionStore::new(&conn);
    let txns = store.list()?;
    if txns.is_empty() {
        println!("No transactions.");
    } else {
        println!("Transactions\n{}", transactions_table(&txns));
    }
    println!("Balance\n{}", balance_table(&store.balance()?));
    Ok(())
}

pub fn balance(db_path: &Path) -> Result<()> {
    let conn = open_db(db_path)?;
    let balance = SqliteTransactionStore::new(&conn).balance()?;
    println!("{}", balance_table(&balance));
    Ok(())
}

pub fn add(db_path: &Path, title: &str, kind: TransactionKind, value: f64, category: &str) -> Result<()> {
    let conn = open_db(db_path)?;
    let categories = SqliteCategoryStore::new(&conn);
    let transactions = SqliteTransactionStore::new(&conn);
    let txn = create_transaction(&categories, &transactions, title, kind, value, category)?;
    println!(
        "Added transaction {}: {} {} ({})",
        txn.id,
        txn.title,
        signed_money(txn.kind, txn.value),
        txn.category_title
    );
    Ok(())
}

pub fn delete(db_path: &Path, id: i64) -> Result<()> {
    let conn = open_db(db_path)?;
    delete_transaction(&SqliteTransactionStore::new(&conn), id)?;
    println!("Deleted transaction {id}");
    Ok(())
}
