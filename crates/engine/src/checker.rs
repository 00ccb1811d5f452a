//! Fetch, compare against the cache, notify on change.

use crate::check::{CheckKind, CheckOutcome, RunSummary};
use crate::error::CheckResult;
use checkbot_alerts::Notifier;
use checkbot_core::{
    balance_message, points_message, summary_message, transaction_message,
};
use checkbot_scrapers::{PointsSource, TollSource};
use checkbot_store::Cache;
use chrono::{Days, Local, NaiveDate};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Cache keys for the two tracked values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKeys {
    pub points: String,
    pub toll_balance: String,
}

impl Default for CacheKeys {
    fn default() -> Self {
        Self {
            points: "points".to_string(),
            toll_balance: "ez_balance".to_string(),
        }
    }
}

/// One scheduled check and the source it reads from.
pub enum Check<'a> {
    Points(&'a dyn PointsSource),
    Toll(&'a dyn TollSource),
}

impl Check<'_> {
    pub fn kind(&self) -> CheckKind {
        match self {
            Check::Points(_) => CheckKind::Points,
            Check::Toll(_) => CheckKind::Toll,
        }
    }
}

/// Runs checks against a shared cache and chat sink.
pub struct Checkbot {
    cache: Arc<dyn Cache>,
    notifier: Arc<dyn Notifier>,
    keys: CacheKeys,
}

impl Checkbot {
    pub fn new(cache: Arc<dyn Cache>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            cache,
            notifier,
            keys: CacheKeys::default(),
        }
    }

    pub fn with_keys(mut self, keys: CacheKeys) -> Self {
        self.keys = keys;
        self
    }

    /// Run every check in order.
    ///
    /// A failing check is logged and does not stop the ones after it.
    pub async fn run(&self, checks: &[Check<'_>]) -> RunSummary {
        let mut summary = RunSummary::default();

        for check in checks {
            let kind = check.kind();
            let result = match check {
                Check::Points(source) => self.check_points(*source).await,
                Check::Toll(source) => self.check_toll(*source).await,
            };

            match result {
                Ok(outcome) => {
                    info!(
                        check = %kind,
                        notifications = outcome.notifications,
                        cache_updated = outcome.cache_updated,
                        "Check finished"
                    );
                    summary.record(&outcome);
                }
                Err(e) => {
                    error!(check = %kind, error = %e, "Check failed");
                    summary.record_failure();
                }
            }
        }

        summary
    }

    /// Compare the points balance with the cached one.
    pub async fn check_points(&self, source: &dyn PointsSource) -> CheckResult<CheckOutcome> {
        let reading = source.fetch_points().await?;
        let cached = self.cache.get(&self.keys.points).await?;

        if !reading.differs_from(cached.as_deref()) {
            debug!(points = reading.points, "Points unchanged");
            return Ok(CheckOutcome::unchanged());
        }

        info!(
            points = reading.points,
            cached = cached.as_deref().unwrap_or("<none>"),
            "Current points differ from cached points"
        );

        self.cache
            .set(&self.keys.points, &reading.cache_value())
            .await?;
        self.notifier.post(&points_message(&reading)).await?;

        Ok(CheckOutcome {
            notifications: 1,
            cache_updated: true,
        })
    }

    /// Compare the toll balance with the cached one, then report
    /// yesterday's transactions.
    pub async fn check_toll(&self, source: &dyn TollSource) -> CheckResult<CheckOutcome> {
        let today = Local::now().date_naive();
        let yesterday = today.checked_sub_days(Days::new(1)).unwrap_or(today);
        self.check_toll_on(source, yesterday).await
    }

    /// Like [`check_toll`](Self::check_toll) with an explicit transaction day.
    pub async fn check_toll_on(
        &self,
        source: &dyn TollSource,
        day: NaiveDate,
    ) -> CheckResult<CheckOutcome> {
        let mut outcome = CheckOutcome::unchanged();

        let balance = source.login().await?;
        let cached = self.cache.get(&self.keys.toll_balance).await?;

        if balance.differs_from(cached.as_deref()) {
            info!(
                balance = %balance,
                cached = cached.as_deref().unwrap_or("<none>"),
                "Current balance differs from cached balance"
            );
            self.cache
                .set(&self.keys.toll_balance, balance.as_str())
                .await?;
            outcome.cache_updated = true;

            self.notifier.post(&balance_message(&balance)).await?;
            outcome.notifications += 1;
        } else {
            debug!(balance = %balance, "Balance unchanged");
        }

        let report = source.transactions(day).await?;
        if !report.has_total() {
            info!(day = %day, "No transactions found");
            return Ok(outcome);
        }

        let summary = summary_message(&report);
        info!("{}", summary);
        self.notifier.post(&summary).await?;
        outcome.notifications += 1;

        for tx in &report.transactions {
            let Some(message) = transaction_message(tx) else {
                debug!(description = %tx.description, "Skipping unreported transaction type");
                continue;
            };
            info!("{}", message);
            self.notifier.post(&message).await?;
            outcome.notifications += 1;
        }

        Ok(outcome)
    }
}
