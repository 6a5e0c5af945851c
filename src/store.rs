//! Persistence seams for categories and transactions.
//!
//! The importer and ledger only talk to these traits; the SQLite
//! implementations below are what the CLI wires in.

use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};

use crate::error::{FinanceError, Result};
use crate::models::{Balance, Category, NewTransaction, Transaction};

pub trait CategoryStore {
    /// Categories whose title is one of `titles`. Unknown titles are ignored.
    fn find_by_titles(&self, titles: &[String]) -> Result<Vec<Category>>;

    /// Create a category for each title and return them in input order.
    /// A title that already exists is returned as-is rather than duplicated.
    fn create(&self, titles: &[String]) -> Result<Vec<Category>>;

    fn find_or_create(&self, title: &str) -> Result<Category> {
        let title = title.to_string();
        if let Some(existing) = self.find_by_titles(std::slice::from_ref(&title))?.pop() {
            return Ok(existing);
        }
        self.create(std::slice::from_ref(&title))?
            .pop()
            .ok_or(FinanceError::UnresolvedCategory(title))
    }

    /// All categories ordered by title.
    fn list(&self) -> Result<Vec<Category>>;
}

pub trait TransactionStore {
    /// Insert all rows as one batch and return the persisted records.
    fn create_batch(&self, rows: &[NewTransaction]) -> Result<Vec<Transaction>>;

    fn create(&self, row: &NewTransaction) -> Result<Transaction> {
        let mut created = self.create_batch(std::slice::from_ref(row))?;
        created
            .pop()
            .ok_or(FinanceError::Db(rusqlite::Error::QueryReturnedNoRows))
    }

    /// All transactions, oldest first.
    fn list(&self) -> Result<Vec<Transaction>>;

    fn balance(&self) -> Result<Balance>;

    /// Returns true if a row was deleted.
    fn delete(&self, id: i64) -> Result<bool>;
}

// ---------------------------------------------------------------------------
// SQLite
// ---------------------------------------------------------------------------

pub struct SqliteCategoryStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteCategoryStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        title: row.get(1)?,
        created_at: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
    })
}

/// Stays below SQLite's bound-parameter limit (999 on older builds).
const MAX_TITLES_PER_QUERY: usize = 500;

fn placeholders(n: usize) -> String {
    (1..=n).map(|i| format!("?{i}")).collect::<Vec<_>>().join(", ")
}

impl CategoryStore for SqliteCategoryStore<'_> {
    fn find_by_titles(&self, titles: &[String]) -> Result<Vec<Category>> {
        let mut categories = Vec::new();
        for chunk in titles.chunks(MAX_TITLES_PER_QUERY) {
            let sql = format!(
                "SELECT id, title, created_at FROM categories WHERE title IN ({}) ORDER BY id",
                placeholders(chunk.len())
            );
            let mut stmt = self.conn.prepare(&sql)?;
            let found = stmt
                .query_map(params_from_iter(chunk.iter()), category_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            categories.extend(found);
        }
        Ok(categories)
    }

    fn create(&self, titles: &[String]) -> Result<Vec<Category>> {
        let mut insert = self
            .conn
            .prepare_cached("INSERT INTO categories (title) VALUES (?1) ON CONFLICT(title) DO NOTHING")?;
        let mut select = self
            .conn
            .prepare_cached("SELECT id, title, created_at FROM categories WHERE title = ?1")?;

        let mut created = Vec::with_capacity(titles.len());
        for title in titles {
            insert.execute([title])?;
            created.push(select.query_row([title], category_from_row)?);
        }
        Ok(created)
    }

    fn list(&self) -> Result<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, created_at FROM categories ORDER BY title ASC")?;
        let categories = stmt
            .query_map([], category_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(categories)
    }
}

pub struct SqliteTransactionStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteTransactionStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    fn get(&self, id: i64) -> Result<Option<Transaction>> {
        let txn = self
            .conn
            .query_row(
                &format!("{TRANSACTION_SELECT} WHERE t.id = ?1"),
                [id],
                transaction_from_row,
            )
            .optional()?;
        Ok(txn)
    }
}

const TRANSACTION_SELECT: &str = "SELECT t.id, t.title, t.kind, t.value, t.category_id, c.title, t.created_at \
     FROM transactions t JOIN categories c ON t.category_id = c.id";

fn transaction_from_row(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: row.get(0)?,
        title: row.get(1)?,
        kind: row.get(2)?,
        value: row.get(3)?,
        category_id: row.get(4)?,
        category_title: row.get(5)?,
        created_at: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
    })
}

impl TransactionStore for SqliteTransactionStore<'_> {
    fn create_batch(&self, rows: &[NewTransaction]) -> Result<Vec<Transaction>> {
        let tx = self.conn.unchecked_transaction()?;
        let mut ids = Vec::with_capacity(rows.len());
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO transactions (title, kind, value, category_id) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![row.title, row.kind, row.value, row.category_id])?;
                ids.push(tx.last_insert_rowid());
            }
        }
        tx.commit()?;

        let mut created = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(txn) = self.get(id)? {
                created.push(txn);
            }
        }
        Ok(created)
    }

    fn list(&self) -> Result<Vec<Transaction>> {
        let mut stmt = self.conn.prepare(&format!("{TRANSACTION_SELECT} ORDER BY t.id ASC"))?;
        let txns = stmt
            .query_map([], transaction_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(txns)
    }

    fn balance(&self) -> Result<Balance> {
        let (income, outcome): (f64, f64) = self.conn.query_row(
            "SELECT \
                COALESCE(SUM(CASE WHEN kind = 'income' THEN value END), 0.0), \
                COALESCE(SUM(CASE WHEN kind = 'outcome' THEN value END), 0.0) \
             FROM transactions",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(Balance {
            income,
            outcome,
            total: income - outcome,
        })
    }

    fn delete(&self, id: i64) -> Result<bool> {
        let deleted = self.conn.execute("DELETE FROM transactions WHERE id = ?1", [id])?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{get_connection, init_db};
    use crate::models::TransactionKind;

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    fn titles(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_find_by_titles_ignores_unknown() {
        let (_dir, conn) = test_db();
        let store = SqliteCategoryStore::new(&conn);
        store.create(&titles(&["Job", "Food"])).unwrap();
        let found = store.find_by_titles(&titles(&["Job", "Travel"])).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Job");
    }

    #[test]
    fn test_find_by_titles_empty_input() {
        let (_dir, conn) = test_db();
        let store = SqliteCategoryStore::new(&conn);
        assert!(store.find_by_titles(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_find_by_titles_spans_several_queries() {
        let (_dir, conn) = test_db();
        let store = SqliteCategoryStore::new(&conn);
        let names: Vec<String> = (0..MAX_TITLES_PER_QUERY * 2 + 7).map(|i| format!("cat-{i}")).collect();
        store.create(&names).unwrap();
        let found = store.find_by_titles(&names).unwrap();
        assert_eq!(found.len(), names.len());
    }

    #[test]
    fn test_create_reuses_existing_title() {
        let (_dir, conn) = test_db();
        let store = SqliteCategoryStore::new(&conn);
        let first = store.create(&titles(&["Job"])).unwrap();
        let second = store.create(&titles(&["Job"])).unwrap();
        assert_eq!(first[0].id, second[0].id);
        let count: i64 = conn.query_row("SELECT count(*) FROM categories", [], |r| r.get(0)).unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_find_or_create() {
        let (_dir, conn) = test_db();
        let store = SqliteCategoryStore::new(&conn);
        let created = store.find_or_create("Housing").unwrap();
        let found = store.find_or_create("Housing").unwrap();
        assert_eq!(created.id, found.id);
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn test_create_batch_and_balance() {
        let (_dir, conn) = test_db();
        let categories = SqliteCategoryStore::new(&conn);
        let job = categories.find_or_create("Job").unwrap();
        let housing = categories.find_or_create("Housing").unwrap();

        let store = SqliteTransactionStore::new(&conn);
        let created = store
            .create_batch(&[
                NewTransaction {
                    title: "Salary".into(),
                    kind: TransactionKind::Income,
                    value: 5000.0,
                    category_id: job.id,
                },
                NewTransaction {
                    title: "Rent".into(),
                    kind: TransactionKind::Outcome,
                    value: 1200.0,
                    category_id: housing.id,
                },
            ])
            .unwrap();
        assert_eq!(created.len(), 2);
        assert_eq!(created[0].category_title, "Job");
        assert_eq!(created[1].kind, TransactionKind::Outcome);

        let balance = store.balance().unwrap();
        assert_eq!(balance.income, 5000.0);
        assert_eq!(balance.outcome, 1200.0);
        assert_eq!(balance.total, 3800.0);
    }

    #[test]
    fn test_balance_of_empty_store() {
        let (_dir, conn) = test_db();
        let balance = SqliteTransactionStore::new(&conn).balance().unwrap();
        assert_eq!(balance, Balance::default());
    }

    #[test]
    fn test_create_batch_is_all_or_nothing() {
        let (_dir, conn) = test_db();
        let job = SqliteCategoryStore::new(&conn).find_or_create("Job").unwrap();
        let store = SqliteTransactionStore::new(&conn);
        let result = store.create_batch(&[
            NewTransaction {
                title: "Salary".into(),
                kind: TransactionKind::Income,
                value: 10.0,
                category_id: job.id,
            },
            NewTransaction {
                title: "Orphan".into(),
                kind: TransactionKind::Income,
                value: 10.0,
                category_id: job.id + 100,
            },
        ]);
        assert!(result.is_err());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_delete() {
        let (_dir, conn) = test_db();
        let job = SqliteCategoryStore::new(&conn).find_or_create("Job").unwrap();
        let store = SqliteTransactionStore::new(&conn);
        let txn = store
            .create(&NewTransaction {
                title: "Salary".into(),
                kind: TransactionKind::Income,
                value: 10.0,
                category_id: job.id,
            })
            .unwrap();
        assert!(store.delete(txn.id).unwrap());
        assert!(!store.delete(txn.id).unwrap());
    }
}
