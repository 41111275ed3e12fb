//! Point-in-time dashboard numbers with month-over-month trends.
//!
//! Windows follow calendar months in UTC: the current month so far and the
//! full month before it. `pending` and `approved` count topics by their
//! *current* status, restricted by *creation* time, the same basis as `total`.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use crate::domain::{
    repository::{CreatedWindow, RepositoryError, TopicRepository, query::CountFilter},
    topic::TopicStatus,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatMetric {
    pub count: u64,
    pub previous_count: u64,
    pub trend: f64,
}

impl StatMetric {
    pub fn new(count: u64, previous_count: u64) -> Self {
        Self {
            count,
            previous_count,
            trend: trend(count, previous_count),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicStats {
    pub total: StatMetric,
    pub pending: StatMetric,
    pub approved: StatMetric,
    /// Percentage of approved topics, as an integer in `count`
    pub success_rate: StatMetric,
    pub last_updated: DateTime<Utc>,
}

/// Raw counts the report is derived from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsCounts {
    pub total_current: u64,
    pub total_previous: u64,
    pub pending_current: u64,
    pub pending_previous: u64,
    pub approved_current: u64,
    pub approved_previous: u64,
    pub total_all: u64,
    pub approved_all: u64,
}

impl StatsCounts {
    /// The success-rate trend compares the all-time rate with the rate of
    /// last month's topics only. The two sides have different bases; this is
    /// how the dashboard has always reported it.
    pub fn into_stats(self, now: DateTime<Utc>) -> TopicStats {
        let rate = success_rate(self.approved_all, self.total_all);
        let previous_rate = success_rate(self.approved_previous, self.total_previous);

        TopicStats {
            total: StatMetric::new(self.total_current, self.total_previous),
            pending: StatMetric::new(self.pending_current, self.pending_previous),
            approved: StatMetric::new(self.approved_current, self.approved_previous),
            success_rate: StatMetric::new(rate, previous_rate),
            last_updated: now,
        }
    }
}

/// Percentage change from `previous` to `current`, one decimal.
///
/// Growth from nothing reports 100, nothing from nothing reports 0.
pub fn trend(current: u64, previous: u64) -> f64 {
    if previous == 0 {
        return if current > 0 { 100.0 } else { 0.0 };
    }
    let change = (current as f64 - previous as f64) / previous as f64 * 100.0;
    round_half_up(change * 10.0) / 10.0
}

/// Integer percentage of approved over total; zero topics gives 0
pub fn success_rate(approved: u64, total: u64) -> u64 {
    let rate = approved as f64 / total.max(1) as f64 * 100.0;
    round_half_up(rate) as u64
}

// halves round towards positive infinity, so -2.5 becomes -2
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Current calendar month and the full month before it
pub fn month_windows(now: DateTime<Utc>) -> (CreatedWindow, CreatedWindow) {
    let today = now.date_naive();
    let this_month = today - Days::new(u64::from(today.day0()));
    let next_month = this_month + Months::new(1);
    let last_month = this_month - Months::new(1);

    let current = CreatedWindow {
        start: start_of(this_month),
        end: start_of(next_month),
    };
    let previous = CreatedWindow {
        start: start_of(last_month),
        end: start_of(this_month),
    };
    (current, previous)
}

fn start_of(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

/// Runs every count the report needs against the record store
pub async fn gather<R: TopicRepository>(
    repository: &R,
    now: DateTime<Utc>,
) -> Result<StatsCounts, RepositoryError> {
    let (current, previous) = month_windows(now);

    let (
        total_current,
        total_previous,
        pending_current,
        pending_previous,
        approved_current,
        approved_previous,
        total_all,
        approved_all,
    ) = futures::try_join!(
        repository.count(CountFilter::created_within(current)),
        repository.count(CountFilter::created_within(previous)),
        repository.count(CountFilter::created_within(current).with_status(TopicStatus::Pending)),
        repository.count(CountFilter::created_within(previous).with_status(TopicStatus::Pending)),
        repository.count(CountFilter::created_within(current).with_status(TopicStatus::Approved)),
        repository.count(CountFilter::created_within(previous).with_status(TopicStatus::Approved)),
        repository.count(CountFilter::all()),
        repository.count(CountFilter::all().with_status(TopicStatus::Approved)),
    )?;

    Ok(StatsCounts {
        total_current,
        total_previous,
        pending_current,
        pending_previous,
        approved_current,
        approved_previous,
        total_all,
        approved_all,
    })
}
