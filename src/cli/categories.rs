use std::path::Path;

use comfy_table::{Cell, Table};

use crate::db::open_db;
use crate::error::Result;
use crate::store::{CategoryStore, SqliteCategoryStore};

pub fn list(db_path: &Path) -> Result<()> {
    let conn = open_db(db_path)?;
    let categories = SqliteCategoryStore::new(&conn).list()?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Created"]);
    for cat in categories {
        table.add_row(vec![
            Cell::new(cat.id),
            Cell::new(cat.title),
            Cell::new(cat.created_at),
        ]);
    }
    println!("Categories\n{table}");
    Ok(())
}
