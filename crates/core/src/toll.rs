//! Toll account balance and transactions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Account balance text as shown on the account summary, e.g. `$23.45`.
///
/// Kept as text: the cache compares it verbatim and the notification
/// repeats it as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TollBalance(pub String);

impl TollBalance {
    pub fn new(text: impl AsRef<str>) -> Self {
        Self(text.as_ref().trim().to_string())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn differs_from(&self, cached: Option<&str>) -> bool {
        cached.map_or(true, |previous| previous != self.0)
    }
}

impl fmt::Display for TollBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of account activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    /// A toll charged at a gantry.
    Toll,
    /// Automatic account top-up.
    Replenish,
    /// Fees, adjustments and anything else.
    Other,
}

impl TransactionKind {
    /// Classify the free-text type column of the transaction table.
    pub fn classify(type_text: &str) -> Self {
        let lowered = type_text.trim().to_lowercase();
        if lowered.contains("toll") {
            TransactionKind::Toll
        } else if lowered.contains("replenish") {
            TransactionKind::Replenish
        } else {
            TransactionKind::Other
        }
    }
}

/// One row of the transaction table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub kind: TransactionKind,
    /// Type column, lowercased and trimmed.
    pub description: String,
    /// Posting date column.
    pub posted_on: String,
    /// Transaction date/time column, fragments joined by a space.
    pub occurred_at: String,
    /// Plaza or location column.
    pub location: String,
    /// Amount column, verbatim.
    pub amount: String,
}

impl Transaction {
    pub fn new(
        description: &str,
        posted_on: impl Into<String>,
        occurred_at: impl Into<String>,
        location: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        let description = description.trim().to_lowercase();
        Self {
            kind: TransactionKind::classify(&description),
            description,
            posted_on: posted_on.into(),
            occurred_at: occurred_at.into(),
            location: location.into(),
            amount: amount.into(),
        }
    }
}

/// Transactions for a date range plus the table's total row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReport {
    pub transactions: Vec<Transaction>,
    /// Rows between header and total that could not be read.
    #[serde(default)]
    pub skipped: usize,
    /// Last cell of the total row, verbatim. `None` when the table has
    /// only a header row.
    pub total: Option<String>,
}

impl TransactionReport {
    /// A table with only a header row.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A table with a total row and no unreadable rows.
    pub fn new(transactions: Vec<Transaction>, total: impl Into<String>) -> Self {
        Self {
            transactions,
            skipped: 0,
            total: Some(total.into()),
        }
    }

    #[inline]
    pub fn has_total(&self) -> bool {
        self.total.is_some()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Parsed transactions.
    #[inline]
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Every row between header and total, readable or not.
    #[inline]
    pub fn row_count(&self) -> usize {
        self.transactions.len() + self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(TransactionKind::classify(" Toll "), TransactionKind::Toll);
        assert_eq!(
            TransactionKind::classify("TOLL - VIDEO"),
            TransactionKind::Toll
        );
        assert_eq!(
            TransactionKind::classify("Auto Replenish"),
            TransactionKind::Replenish
        );
        assert_eq!(
            TransactionKind::classify("Statement Fee"),
            TransactionKind::Other
        );
    }

    #[test]
    fn test_transaction_new_normalizes_description() {
        let tx = Transaction::new("  Toll\n", "05/01/2024", "05/01/2024 08:15", "Weston", "($1.25)");
        assert_eq!(tx.description, "toll");
        assert_eq!(tx.kind, TransactionKind::Toll);
    }

    #[test]
    fn test_balance_differs_from() {
        let balance = TollBalance::new(" $23.45 ");
        assert_eq!(balance.as_str(), "$23.45");
        assert!(balance.differs_from(None));
        assert!(!balance.differs_from(Some("$23.45")));
        assert!(balance.differs_from(Some("$24.70")));
    }

    #[test]
    fn test_report_row_count_includes_skipped_rows() {
        let mut report = TransactionReport::new(
            vec![Transaction::new("Toll", "05/02/2024", "", "Weston", "($1.25)")],
            "($1.25)",
        );
        report.skipped = 2;
        assert_eq!(report.len(), 1);
        assert_eq!(report.row_count(), 3);
        assert!(report.has_total());
        assert!(!TransactionReport::empty().has_total());
    }
}
