//! Loyalty points readings.

use crate::amount::{parse_integer, ParseError};
use serde::{Deserialize, Serialize};

/// A points balance as reported by the loyalty program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsReading {
    /// Current point count.
    pub points: i64,
    /// Date the vendor reports the balance as of, verbatim.
    pub as_of: String,
}

impl PointsReading {
    pub fn new(points: i64, as_of: impl Into<String>) -> Self {
        Self {
            points,
            as_of: as_of.into(),
        }
    }

    /// Whether this reading differs from a cached value.
    ///
    /// A missing cached value, or one that no longer parses as an
    /// integer, always counts as a change.
    pub fn differs_from(&self, cached: Option<&str>) -> bool {
        match cached.map(parse_integer) {
            Some(Ok(previous)) => previous != self.points,
            Some(Err(_)) | None => true,
        }
    }

    /// Cache representation of the point count.
    pub fn cache_value(&self) -> String {
        self.points.to_string()
    }

    /// Parse the vendor's textual point count.
    pub fn parse(points: &str, as_of: impl Into<String>) -> Result<Self, ParseError> {
        Ok(Self::new(parse_integer(points)?, as_of))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_differs_from_missing_cache() {
        let reading = PointsReading::new(1200, "2024-05-01");
        assert!(reading.differs_from(None));
    }

    #[test]
    fn test_differs_from_compares_numerically() {
        let reading = PointsReading::new(1200, "2024-05-01");
        assert!(!reading.differs_from(Some("1200")));
        assert!(!reading.differs_from(Some("1,200")));
        assert!(reading.differs_from(Some("1150")));
    }

    #[test]
    fn test_differs_from_corrupt_cache() {
        let reading = PointsReading::new(5, "2024-05-01");
        assert!(reading.differs_from(Some("not-a-number")));
    }

    #[test]
    fn test_parse() {
        let reading = PointsReading::parse("2,310", "20240501").unwrap();
        assert_eq!(reading.points, 2310);
        assert_eq!(reading.as_of, "20240501");
        assert_eq!(reading.cache_value(), "2310");
    }
}
