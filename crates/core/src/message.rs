//! Chat message formatting.

use crate::amount::{normalize_amount, strip_parens};
use crate::points::PointsReading;
use crate::toll::{TollBalance, Transaction, TransactionKind, TransactionReport};

/// Points balance notification.
pub fn points_message(reading: &PointsReading) -> String {
    format!("{} Hmart points as of {}", reading.points, reading.as_of)
}

/// Toll balance notification.
pub fn balance_message(balance: &TollBalance) -> String {
    format!("E-ZPass balance is {}", balance)
}

/// Summary line for a day of transactions.
///
/// Counts every row of the table, including rows that could not be read.
pub fn summary_message(report: &TransactionReport) -> String {
    format!(
        "found {} transactions totaling {}",
        report.row_count(),
        normalize_amount(report.total.as_deref().unwrap_or_default())
    )
}

/// Itemized line for a single transaction.
///
/// Returns `None` for kinds that are not reported.
pub fn transaction_message(tx: &Transaction) -> Option<String> {
    match tx.kind {
        TransactionKind::Toll => Some(format!(
            "{} {} at {} {}",
            tx.description,
            strip_parens(&tx.amount),
            tx.location,
            tx.occurred_at
        )),
        TransactionKind::Replenish => Some(format!(
            "{} {} on {}",
            tx.description, tx.amount, tx.posted_on
        )),
        TransactionKind::Other => None,
    }
}
