//! Projection of resolved aggregates onto the bucket axis.

use crate::bucket::TimeBucket;
use crate::metric::ResolvedMetric;
use serde::Serialize;
use std::fmt;

/// Name of the series summing every group.
pub const ALL_SERIES: &str = "ALL";

/// A value on the axis; `None` is a gap where no value can be computed.
pub type SeriesValue = Option<u32>;

/// Unit of the values in a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Raw case counts.
    Cases,
    /// Whole percentages.
    Percent,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cases => "cases",
            Self::Percent => "%",
        })
    }
}

/// Renders a value for display: `"N/A"`, `"{n} cases"` or `"{n}%"`.
#[must_use]
pub fn format_value(value: SeriesValue, unit: Unit) -> String {
    match (value, unit) {
        (None, _) => "N/A".to_string(),
        (Some(n), Unit::Cases) => format!("{n} cases"),
        (Some(n), Unit::Percent) => format!("{n}%"),
    }
}

/// Rounded percentage of `numerator` over `denominator`, a gap when the
/// denominator is zero.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn percentage(numerator: u32, denominator: u32) -> SeriesValue {
    if denominator == 0 {
        return None;
    }
    let ratio = f64::from(numerator) / f64::from(denominator) * 100.0;
    Some(ratio.round() as u32)
}

/// One named line of values aligned with the bucket axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Series {
    /// `"ALL"` or the group value.
    pub name: String,
    /// Display color.
    pub color: String,
    /// One value per bucket.
    pub values: Vec<SeriesValue>,
}

impl Series {
    /// Value at the last bucket, the headline figure.
    #[must_use]
    pub fn latest(&self) -> SeriesValue {
        self.values.last().copied().flatten()
    }

    /// Whether this is the total across groups.
    #[must_use]
    pub fn is_all(&self) -> bool {
        self.name == ALL_SERIES
    }
}

/// How values are computed from the resolved metric.
#[derive(Debug, Clone, Copy)]
pub enum DisplayMode<'a> {
    /// Raw counts.
    Counts,
    /// `numerator` as a share of the resolved metric.
    Percentage {
        /// Tables supplying the numerator.
        numerator: ResolvedMetric<'a>,
    },
}

impl DisplayMode<'_> {
    /// Unit of the values this mode produces.
    #[must_use]
    pub const fn unit(&self) -> Unit {
        match self {
            Self::Counts => Unit::Cases,
            Self::Percentage { .. } => Unit::Percent,
        }
    }
}

/// Nonzero count of one group at one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakdownSlice {
    /// Group value.
    pub group: String,
    /// Count at the bucket.
    pub count: u32,
    /// Display color.
    pub color: String,
}

/// A single total line with a per-bucket group breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineBreakdown {
    /// Bucket labels.
    pub labels: Vec<String>,
    /// The ALL count series.
    pub line: Series,
    breakdowns: Vec<Vec<BreakdownSlice>>,
}

impl LineBreakdown {
    /// Nonzero group counts at a bucket, in first-seen group order.
    ///
    /// Empty when the index is past the axis.
    #[must_use]
    pub fn breakdown_at(&self, bucket_index: usize) -> &[BreakdownSlice] {
        self.breakdowns
            .get(bucket_index)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Breakdown at the last bucket, the default view.
    #[must_use]
    pub fn latest_breakdown(&self) -> &[BreakdownSlice] {
        self.breakdowns
            .last()
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of buckets on the axis.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the axis is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Builds series over a fixed bucket axis and palette.
#[derive(Debug, Clone, Copy)]
pub struct SeriesAssembler<'a> {
    buckets: &'a [TimeBucket],
    palette: &'a [String],
}

impl<'a> SeriesAssembler<'a> {
    /// Creates an assembler.
    #[must_use]
    pub const fn new(buckets: &'a [TimeBucket], palette: &'a [String]) -> Self {
        Self { buckets, palette }
    }

    /// Bucket labels in axis order.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.buckets.iter().map(|b| b.label.clone()).collect()
    }

    /// The ALL series followed by one series per group in first-seen order.
    #[must_use]
    pub fn assemble(&self, metric: &ResolvedMetric<'_>, mode: &DisplayMode<'_>) -> Vec<Series> {
        let all_values = match mode {
            DisplayMode::Counts => self.values(|key| Some(metric.base.get(key))),
            DisplayMode::Percentage { numerator } => {
                self.values(|key| percentage(numerator.base.get(key), metric.base.get(key)))
            }
        };

        let mut series = Vec::with_capacity(metric.grouped.len() + 1);
        series.push(Series {
            name: ALL_SERIES.to_string(),
            color: self.color(0),
            values: all_values,
        });

        for (i, (group, table)) in metric.grouped.iter().enumerate() {
            let values = match mode {
                DisplayMode::Counts => self.values(|key| Some(table.get(key))),
                DisplayMode::Percentage { numerator } => self.values(|key| {
                    percentage(numerator.grouped.count(group, key), table.get(key))
                }),
            };
            series.push(Series {
                name: group.to_string(),
                color: self.color(i + 1),
                values,
            });
        }

        series
    }

    /// Count line of the ALL series with the group breakdown of every bucket.
    #[must_use]
    pub fn line_breakdown(&self, metric: &ResolvedMetric<'_>) -> LineBreakdown {
        let line = Series {
            name: ALL_SERIES.to_string(),
            color: self.color(0),
            values: self.values(|key| Some(metric.base.get(key))),
        };

        let breakdowns: Vec<Vec<BreakdownSlice>> = self
            .buckets
            .iter()
            .map(|bucket| {
                metric
                    .grouped
                    .iter()
                    .map(|(group, table)| (group, table.get(&bucket.key)))
                    .filter(|&(_, count)| count > 0)
                    .enumerate()
                    .map(|(i, (group, count))| BreakdownSlice {
                        group: group.to_string(),
                        count,
                        color: self.color(i + 1),
                    })
                    .collect()
            })
            .collect();

        LineBreakdown {
            labels: self.labels(),
            line,
            breakdowns,
        }
    }

    fn values(&self, value_at: impl Fn(&str) -> SeriesValue) -> Vec<SeriesValue> {
        self.buckets.iter().map(|b| value_at(&b.key)).collect()
    }

    fn color(&self, index: usize) -> String {
        if self.palette.is_empty() {
            return String::new();
        }
        self.palette[index % self.palette.len()].clone()
    }
}
