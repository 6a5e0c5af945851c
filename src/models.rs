use std::fmt;
use std::str::FromStr;

use crate::error::FinanceError;

/// Category assigned to rows that name none.
pub const FALLBACK_CATEGORY: &str = "Uncategorized";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Income,
    Outcome,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Outcome => "outcome",
        }
    }
}

impl FromStr for TransactionKind {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(Self::Income),
            "outcome" => Ok(Self::Outcome),
            other => Err(FinanceError::UnknownKind(other.to_string())),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl rusqlite::ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl rusqlite::types::FromSql for TransactionKind {
    fn column_result(value: rusqlite::types::ValueRef<'_>) -> rusqlite::types::FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| rusqlite::types::FromSqlError::Other(Box::new(e)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: i64,
    pub title: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: i64,
    pub title: String,
    pub kind: TransactionKind,
    pub value: f64,
    pub category_id: i64,
    pub category_title: String,
    pub created_at: String,
}

/// A transaction whose category has been resolved, ready to insert.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub title: String,
    pub kind: TransactionKind,
    pub value: f64,
    pub category_id: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Balance {
    pub income: f64,
    pub outcome: f64,
    pub total: f64,
}

/// Intermediate representation of one CSV row before category resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub title: String,
    pub kind: TransactionKind,
    pub value: f64,
    pub category_name: String,
}

impl TransactionDraft {
    /// Build a draft from the raw `title, type, value, category` fields.
    ///
    /// Returns `None` when title, type or value is missing or blank, when the
    /// type is not `income`/`outcome`, or when the value is not a number.
    pub fn from_fields(fields: &[&str]) -> Option<Self> {
        let field = |i: usize| fields.get(i).map(|f| f.trim()).unwrap_or("");

        let (title, kind, value) = (field(0), field(1), field(2));
        if title.is_empty() || kind.is_empty() || value.is_empty() {
            return None;
        }
        let kind: TransactionKind = kind.parse().ok()?;
        let value: f64 = value.parse().ok()?;
        if !value.is_finite() {
            return None;
        }

        let category = field(3);
        let category_name = if category.is_empty() {
            FALLBACK_CATEGORY.to_string()
        } else {
            category.to_string()
        };

        Some(Self {
            title: title.to_string(),
            kind,
            value,
            category_name,
        })
    }
}
