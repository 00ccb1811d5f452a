//! Source traits the checks are written against.

use crate::error::ScrapeResult;
use async_trait::async_trait;
use checkbot_core::{PointsReading, TollBalance, TransactionReport};
use chrono::NaiveDate;

/// Something that reports a loyalty points balance.
#[async_trait]
pub trait PointsSource: Send + Sync {
    /// Fetch the current points balance.
    async fn fetch_points(&self) -> ScrapeResult<PointsReading>;
}

/// A toll account behind a login.
///
/// `login` must be called before `transactions`; both share one session.
#[async_trait]
pub trait TollSource: Send + Sync {
    /// Log in and return the account balance from the summary page.
    async fn login(&self) -> ScrapeResult<TollBalance>;

    /// Query transactions posted on a single day.
    async fn transactions(&self, day: NaiveDate) -> ScrapeResult<TransactionReport>;
}
