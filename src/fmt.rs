use crate::models::TransactionKind;

/// Format a value as a dollar amount with thousands separators: $1,234.56
pub fn money(val: f64) -> String {
    let cents = format!("{:.2}", val.abs());
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if val < 0.0 && cents != "0.00" { "-" } else { "" };
    format!("{sign}${grouped}.{dec_part}")
}

/// Money as it reads in a ledger: outcomes are shown with a leading minus.
pub fn signed_money(kind: TransactionKind, value: f64) -> String {
    match kind {
        TransactionKind::Income => money(value),
        TransactionKind::Outcome => format!("- {}", money(value)),
    }
}
