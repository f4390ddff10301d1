//! Metric identifiers and their resolution against aggregate tables.

use crate::aggregator::{AggregateTable, Aggregates, GroupedTable};
use casestats_config::DatasetConfig;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::fmt;

static EMPTY_TABLE: Lazy<AggregateTable> = Lazy::new(AggregateTable::default);
static EMPTY_GROUPED: Lazy<GroupedTable> = Lazy::new(GroupedTable::default);

/// The aggregate selected for display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Metric {
    /// Every countable record.
    AllCases,
    /// Records with a decision.
    AllReviewed,
    /// Records with a diversion decision.
    AllDiverted,
    /// One known diversion programme.
    DiversionType(String),
    /// One known decision outcome.
    DecisionType(String),
    /// Any other id; resolves to empty tables.
    Unrecognized(String),
}

impl Metric {
    /// Metric id for every-case counts.
    pub const ALL_CASES: &'static str = "all_cases";
    /// Metric id for reviewed counts.
    pub const ALL_REVIEWED: &'static str = "all_reviewed";
    /// Metric id for diverted counts.
    pub const ALL_DIVERTED: &'static str = "all_diverted";

    /// Classifies a metric id against the dataset vocabulary.
    ///
    /// Diversion types are checked before decision types.
    #[must_use]
    pub fn from_id(id: &str, dataset: &DatasetConfig) -> Self {
        match id {
            Self::ALL_CASES => Self::AllCases,
            Self::ALL_REVIEWED => Self::AllReviewed,
            Self::ALL_DIVERTED => Self::AllDiverted,
            other if dataset.diversion_types.iter().any(|t| t == other) => {
                Self::DiversionType(other.to_string())
            }
            other if dataset.is_decision_type(other) => Self::DecisionType(other.to_string()),
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// The id this metric was parsed from.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::AllCases => Self::ALL_CASES,
            Self::AllReviewed => Self::ALL_REVIEWED,
            Self::AllDiverted => Self::ALL_DIVERTED,
            Self::DiversionType(id) | Self::DecisionType(id) | Self::Unrecognized(id) => id.as_str(),
        }
    }

    /// Decision literal the aggregation pass must select for this metric.
    #[must_use]
    pub fn selected_decision(&self) -> Option<&str> {
        match self {
            Self::DecisionType(decision) => Some(decision.as_str()),
            _ => None,
        }
    }

    /// Whether the line-with-breakdown view is offered for this metric.
    #[must_use]
    pub const fn supports_breakdown(&self) -> bool {
        matches!(
            self,
            Self::AllCases | Self::DiversionType(_) | Self::DecisionType(_)
        )
    }

    /// Every known metric id, in control order.
    #[must_use]
    pub fn known_ids(dataset: &DatasetConfig) -> Vec<&str> {
        [Self::ALL_CASES, Self::ALL_REVIEWED, Self::ALL_DIVERTED]
            .into_iter()
            .chain(dataset.diversion_types.iter().map(String::as_str))
            .chain(dataset.decision_types.iter().map(String::as_str))
            .collect()
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// The tables answering a metric.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedMetric<'a> {
    /// Ungrouped counts.
    pub base: &'a AggregateTable,
    /// Counts per dimension group.
    pub grouped: &'a GroupedTable,
}

impl ResolvedMetric<'static> {
    /// Empty tables, answering zero everywhere.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            base: &EMPTY_TABLE,
            grouped: &EMPTY_GROUPED,
        }
    }
}

/// Picks the aggregate tables that answer a metric.
pub struct MetricResolver;

impl MetricResolver {
    /// Resolves a metric against one aggregation pass.
    ///
    /// Unrecognized metrics, diversion types without a table, and decision
    /// types the pass was not built for all resolve to empty tables.
    #[must_use]
    pub fn resolve<'a>(aggregates: &'a Aggregates, metric: &Metric) -> ResolvedMetric<'a> {
        let pair = match metric {
            Metric::AllCases => Some(&aggregates.all_cases),
            Metric::AllReviewed => Some(&aggregates.all_reviewed),
            Metric::AllDiverted => Some(&aggregates.all_diverted),
            Metric::DiversionType(name) => aggregates.diversion_type(name),
            Metric::DecisionType(name)
                if aggregates.selected_decision.as_deref() == Some(name.as_str()) =>
            {
                Some(&aggregates.decision_type)
            }
            Metric::DecisionType(_) | Metric::Unrecognized(_) => None,
        };

        match pair {
            Some(pair) => ResolvedMetric {
                base: &pair.base,
                grouped: &pair.grouped,
            },
            None => ResolvedMetric::empty(),
        }
    }
}
