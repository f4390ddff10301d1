//! Time axis generation: buckets per range mode and the matching key function.

use casestats_common::{short_year, CaseRecord, RangeMode, Result, StatsError};
use casestats_config::DatasetConfig;
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument};

/// Number of month buckets in the rolling window.
pub const ROLLING_WINDOW_MONTHS: u32 = 12;

/// A calendar month, ordered chronologically.
///
/// Ordering by `(year, month)` is the same as ordering by `year * 12 + month`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthIndex {
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u32,
}

impl MonthIndex {
    /// Creates an index, `None` when the month is outside 1-12.
    #[must_use]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Months since year zero, `year * 12 + month`.
    #[must_use]
    pub fn ordinal(self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month)
    }

    fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

impl fmt::Display for MonthIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// The period a bucket covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BucketPeriod {
    /// A calendar month.
    Month {
        /// Calendar year.
        year: i32,
        /// Calendar month, 1-12.
        month: u32,
    },
    /// A calendar quarter.
    Quarter {
        /// Calendar year.
        year: i32,
        /// Quarter, 1-4.
        quarter: u32,
    },
    /// A calendar year.
    Year {
        /// Calendar year.
        year: i32,
    },
}

/// One discrete interval on the time axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBucket {
    /// Identifier unique within one generated axis.
    pub key: String,
    /// Human readable axis label.
    pub label: String,
    /// Covered period.
    pub period: BucketPeriod,
}

/// Quarter (1-4) containing a month.
#[must_use]
pub const fn quarter_of(month: u32) -> u32 {
    month.div_ceil(3)
}

/// Bucket key of a period under a range mode.
///
/// Agrees with [`TimeBucket::key`] for every bucket [`BucketGenerator`]
/// produces. The rolling window uses monthly keys.
#[must_use]
pub fn key_of(year: i32, month: u32, mode: RangeMode) -> String {
    match mode {
        RangeMode::Monthly | RangeMode::Last12 => format!("{year}-{month}"),
        RangeMode::Quarterly => format!("{year}-Q{}", quarter_of(month)),
        RangeMode::Annual => year.to_string(),
    }
}

/// Latest month carried by any countable record.
///
/// Records with another measure tag or a malformed period are ignored.
#[must_use]
pub fn latest_period(records: &[CaseRecord], dataset: &DatasetConfig) -> Option<MonthIndex> {
    records
        .iter()
        .filter(|r| dataset.is_valid_measure(r.measure.as_deref()))
        .filter_map(CaseRecord::period)
        .filter_map(|(year, month)| MonthIndex::new(year, month))
        .max()
}

/// Builds the ordered time axis for a range mode.
#[derive(Debug, Clone, Copy)]
pub struct BucketGenerator<'a> {
    dataset: &'a DatasetConfig,
}

impl<'a> BucketGenerator<'a> {
    /// Creates a generator over the configured years and month names.
    #[must_use]
    pub const fn new(dataset: &'a DatasetConfig) -> Self {
        Self { dataset }
    }

    /// Generates buckets oldest first.
    ///
    /// `latest` is only consulted for [`RangeMode::Last12`].
    ///
    /// # Errors
    ///
    /// Returns a validation error when the rolling window has no latest
    /// period to end at, or that period is outside the supported calendar.
    #[instrument(skip(self))]
    pub fn generate(&self, mode: RangeMode, latest: Option<MonthIndex>) -> Result<Vec<TimeBucket>> {
        let buckets = match mode {
            RangeMode::Monthly => self.monthly(),
            RangeMode::Quarterly => self.quarterly(),
            RangeMode::Annual => self.annual(),
            RangeMode::Last12 => {
                let latest = latest.ok_or_else(|| {
                    StatsError::validation_field(
                        "rolling window needs at least one countable record",
                        "range",
                    )
                })?;
                self.rolling(latest)?
            }
        };
        debug!(count = buckets.len(), "Generated time buckets");
        Ok(buckets)
    }

    fn monthly(&self) -> Vec<TimeBucket> {
        self.dataset
            .years_ascending()
            .into_iter()
            .flat_map(|year| (1..=12).map(move |month| (year, month)))
            .map(|(year, month)| self.month_bucket(year, month))
            .collect()
    }

    fn quarterly(&self) -> Vec<TimeBucket> {
        self.dataset
            .years_ascending()
            .into_iter()
            .flat_map(|year| {
                (1..=4).map(move |quarter| TimeBucket {
                    key: format!("{year}-Q{quarter}"),
                    label: format!("Q{quarter} '{}", short_year(year)),
                    period: BucketPeriod::Quarter { year, quarter },
                })
            })
            .collect()
    }

    fn annual(&self) -> Vec<TimeBucket> {
        self.dataset
            .years_ascending()
            .into_iter()
            .map(|year| TimeBucket {
                key: year.to_string(),
                label: year.to_string(),
                period: BucketPeriod::Year { year },
            })
            .collect()
    }

    fn rolling(&self, latest: MonthIndex) -> Result<Vec<TimeBucket>> {
        let end = latest.first_day().ok_or_else(|| {
            StatsError::validation_field(format!("latest period {latest} is out of range"), "range")
        })?;

        (0..ROLLING_WINDOW_MONTHS)
            .rev()
            .map(|back| {
                end.checked_sub_months(Months::new(back))
                    .map(|date| self.month_bucket(date.year(), date.month()))
                    .ok_or_else(|| {
                        StatsError::validation_field(
                            format!("rolling window before {latest} is out of range"),
                            "range",
                        )
                    })
            })
            .collect()
    }

    fn month_bucket(&self, year: i32, month: u32) -> TimeBucket {
        TimeBucket {
            key: key_of(year, month, RangeMode::Monthly),
            label: format!("{} '{}", self.dataset.month_name(month), short_year(year)),
            period: BucketPeriod::Month { year, month },
        }
    }
}
