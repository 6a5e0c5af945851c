use tracing::info;

use crate::error::{FinanceError, Result};
use crate::models::{NewTransaction, Transaction, TransactionKind, FALLBACK_CATEGORY};
use crate::store::{CategoryStore, TransactionStore};

/// Record a single transaction, creating its category on first use.
///
/// An outcome may not take the total balance below zero.
pub fn create_transaction<C, T>(
    categories: &C,
    transactions: &T,
    title: &str,
    kind: TransactionKind,
    value: f64,
    category_title: &str,
) -> Result<Transaction>
where
    C: CategoryStore + ?Sized,
    T: TransactionStore + ?Sized,
{
    let title = title.trim();
    if title.is_empty() {
        return Err(FinanceError::InvalidValue("title is required".into()));
    }
    if !value.is_finite() || value <= 0.0 {
        return Err(FinanceError::InvalidValue(format!(
            "{value} (must be a positive number)"
        )));
    }

    if kind == TransactionKind::Outcome {
        let balance = transactions.balance()?;
        if value > balance.total {
            return Err(FinanceError::InsufficientBalance {
                value,
                total: balance.total,
            });
        }
    }

    let category_title = match category_title.trim() {
        "" => FALLBACK_CATEGORY,
        t => t,
    };
    let category = categories.find_or_create(category_title)?;
    let txn = transactions.create(&NewTransaction {
        title: title.to_string(),
        kind,
        value,
        category_id: category.id,
    })?;
    info!(id = txn.id, kind = %kind, value, category = %category.title, "transaction created");
    Ok(txn)
}

pub fn delete_transaction<T: TransactionStore + ?Sized>(transactions: &T, id: i64) -> Result<()> {
    if !transactions.delete(id)? {
        return Err(FinanceError::TransactionNotFound(id));
    }
    info!(id, "transaction deleted");
    Ok(())
}
