use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{FinanceError, Result};
use crate::models::{Category, NewTransaction, Transaction, TransactionDraft};
use crate::store::{CategoryStore, TransactionStore};

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct ParsedFile {
    pub drafts: Vec<TransactionDraft>,
    /// Category name of each draft, same order as `drafts`.
    pub category_names: Vec<String>,
    pub skipped: usize,
}

/// Read every data row of a `title,type,value,category` file.
///
/// The first line is a header and is ignored. Rows that cannot form a
/// [`TransactionDraft`] are counted in `skipped` and otherwise dropped.
/// The whole file is consumed before returning.
pub fn parse_transactions_csv(file_path: &Path) -> Result<ParsedFile> {
    let file = std::fs::File::open(file_path)?;
    parse_transactions(std::io::BufReader::new(file))
}

/// Same as [`parse_transactions_csv`] over any reader. A read failure aborts
/// the parse; only undecodable rows are skipped.
pub fn parse_transactions<R: Read>(reader: R) -> Result<ParsedFile> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut parsed = ParsedFile::default();
    for (line, result) in rdr.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(err) if matches!(err.kind(), csv::ErrorKind::Utf8 { .. } | csv::ErrorKind::UnequalLengths { .. }) => {
                debug!(line = line + 2, %err, "skipping unreadable row");
                parsed.skipped += 1;
                continue;
            }
            Err(err) => return Err(err.into()),
        };
        let fields: Vec<&str> = record.iter().collect();
        match TransactionDraft::from_fields(&fields) {
            Some(draft) => {
                parsed.category_names.push(draft.category_name.clone());
                parsed.drafts.push(draft);
            }
            None => {
                debug!(line = line + 2, ?fields, "skipping incomplete row");
                parsed.skipped += 1;
            }
        }
    }
    Ok(parsed)
}

// ---------------------------------------------------------------------------
// Category reconciliation
// ---------------------------------------------------------------------------

/// `names` with duplicates removed, first-seen order kept.
pub fn distinct_titles(names: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .iter()
        .filter(|name| seen.insert(name.as_str()))
        .cloned()
        .collect()
}

/// Names from `names` with no matching title in `existing`, deduplicated in
/// first-seen order.
pub fn missing_titles(names: &[String], existing: &[Category]) -> Vec<String> {
    let known: HashSet<&str> = existing.iter().map(|c| c.title.as_str()).collect();
    let mut seen = HashSet::new();
    names
        .iter()
        .filter(|name| !known.contains(name.as_str()))
        .filter(|name| seen.insert(name.as_str()))
        .cloned()
        .collect()
}

/// Attach a category id to every draft. Fails on the first draft whose
/// category name has no entry in `lookup`.
pub fn resolve_drafts(
    drafts: &[TransactionDraft],
    lookup: &HashMap<&str, i64>,
) -> Result<Vec<NewTransaction>> {
    drafts
        .iter()
        .map(|draft| {
            let category_id = lookup
                .get(draft.category_name.as_str())
                .copied()
                .ok_or_else(|| FinanceError::UnresolvedCategory(draft.category_name.clone()))?;
            Ok(NewTransaction {
                title: draft.title.clone(),
                kind: draft.kind,
                value: draft.value,
                category_id,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Import pipeline
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ImportResult {
    /// Transactions inserted by this import.
    pub transactions: Vec<Transaction>,
    /// Categories that did not exist before this import.
    pub created_categories: Vec<Category>,
    pub skipped: usize,
}

pub struct CsvTransactionImporter<'a, C: ?Sized, T: ?Sized> {
    categories: &'a C,
    transactions: &'a T,
}

impl<'a, C, T> CsvTransactionImporter<'a, C, T>
where
    C: CategoryStore + ?Sized,
    T: TransactionStore + ?Sized,
{
    pub fn new(categories: &'a C, transactions: &'a T) -> Self {
        Self {
            categories,
            transactions,
        }
    }

    /// Import `file_path` and delete it once its transactions are stored.
    ///
    /// Categories are created before the transaction batch is written and are
    /// not rolled back if the batch fails. The file is only removed after the
    /// batch succeeds.
    pub fn import(&self, file_path: &Path) -> Result<ImportResult> {
        info!(path = %file_path.display(), "importing transactions");
        let parsed = parse_transactions_csv(file_path)?;

        let titles = distinct_titles(&parsed.category_names);
        let existing = self.categories.find_by_titles(&titles)?;
        let to_create = missing_titles(&titles, &existing);
        let created_categories = if to_create.is_empty() {
            Vec::new()
        } else {
            self.categories.create(&to_create)?
        };
        debug!(
            existing = existing.len(),
            created = created_categories.len(),
            "reconciled categories"
        );

        let lookup: HashMap<&str, i64> = existing
            .iter()
            .chain(created_categories.iter())
            .map(|c| (c.title.as_str(), c.id))
            .collect();
        let rows = resolve_drafts(&parsed.drafts, &lookup)?;

        let transactions = if rows.is_empty() {
            Vec::new()
        } else {
            self.transactions.create_batch(&rows)?
        };

        std::fs::remove_file(file_path)?;

        info!(
            imported = transactions.len(),
            skipped = parsed.skipped,
            new_categories = created_categories.len(),
            "import finished"
        );
        Ok(ImportResult {
            transactions,
            created_categories,
            skipped: parsed.skipped,
        })
    }
}
