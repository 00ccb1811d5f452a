//! Check identifiers and per-check results.

use crate::error::CheckError;
use std::fmt;
use std::str::FromStr;

/// Which account a check looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckKind {
    /// Loyalty points balance.
    Points,
    /// Toll account balance and transactions.
    Toll,
}

impl CheckKind {
    pub const ALL: [CheckKind; 2] = [CheckKind::Points, CheckKind::Toll];

    pub fn as_str(self) -> &'static str {
        match self {
            CheckKind::Points => "points",
            CheckKind::Toll => "toll",
        }
    }

    /// Parse a comma-separated list such as `points,toll` or `all`.
    ///
    /// Duplicates are dropped; order of first mention is kept.
    pub fn parse_list(list: &str) -> Result<Vec<CheckKind>, CheckError> {
        let mut kinds = Vec::new();
        for item in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let parsed: Vec<CheckKind> = if item.eq_ignore_ascii_case("all") {
                CheckKind::ALL.to_vec()
            } else {
                vec![item.parse()?]
            };
            for kind in parsed {
                if !kinds.contains(&kind) {
                    kinds.push(kind);
                }
            }
        }
        Ok(kinds)
    }
}

impl FromStr for CheckKind {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "points" | "hmart" => Ok(CheckKind::Points),
            "toll" | "ez" | "ezpass" => Ok(CheckKind::Toll),
            other => Err(CheckError::UnknownCheck(other.to_string())),
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a successful check did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckOutcome {
    /// Messages posted to the chat.
    pub notifications: u32,
    /// Whether the cached value was overwritten.
    pub cache_updated: bool,
}

impl CheckOutcome {
    pub fn unchanged() -> Self {
        Self::default()
    }
}

/// Totals over one invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: u32,
    pub failed: u32,
    pub notifications: u32,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &CheckOutcome) {
        self.succeeded += 1;
        self.notifications += outcome.notifications;
    }

    pub fn record_failure(&mut self) {
        self.failed += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_kind_aliases() {
        assert_eq!("Points".parse::<CheckKind>().unwrap(), CheckKind::Points);
        assert_eq!("hmart".parse::<CheckKind>().unwrap(), CheckKind::Points);
        assert_eq!(" ez ".parse::<CheckKind>().unwrap(), CheckKind::Toll);
        assert!("parking".parse::<CheckKind>().is_err());
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(
            CheckKind::parse_list("toll, points").unwrap(),
            vec![CheckKind::Toll, CheckKind::Points]
        );
        assert_eq!(
            CheckKind::parse_list("all").unwrap(),
            vec![CheckKind::Points, CheckKind::Toll]
        );
        assert_eq!(
            CheckKind::parse_list("toll,all,toll").unwrap(),
            vec![CheckKind::Toll, CheckKind::Points]
        );
        assert!(CheckKind::parse_list("").unwrap().is_empty());
        assert!(CheckKind::parse_list("points,bogus").is_err());
    }

    #[test]
    fn test_run_summary() {
        let mut summary = RunSummary::default();
        summary.record(&CheckOutcome {
            notifications: 3,
            cache_updated: true,
        });
        summary.record(&CheckOutcome::unchanged());
        summary.record_failure();
        assert_eq!(
            summary,
            RunSummary {
                succeeded: 2,
                failed: 1,
                notifications: 3
            }
        );
    }
}
