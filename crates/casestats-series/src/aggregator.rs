//! Single-pass aggregation of case records into keyed count tables.

use crate::bucket::key_of;
use casestats_common::{CaseRecord, RangeMode};
use casestats_config::DatasetConfig;
use serde::Serialize;
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Counts per bucket key. Missing keys read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AggregateTable {
    counts: HashMap<String, u32>,
}

impl AggregateTable {
    /// Count at a bucket key.
    #[must_use]
    pub fn get(&self, key: &str) -> u32 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Adds one at a bucket key.
    pub fn increment(&mut self, key: &str) {
        *self.counts.entry(key.to_string()).or_insert(0) += 1;
    }

    /// Sum over all keys.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    /// Whether nothing has been counted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Keys with a nonzero count, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }
}

/// Counts per group value, keeping groups in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupedTable {
    groups: Vec<(String, AggregateTable)>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl GroupedTable {
    /// Adds one for a group at a bucket key, registering the group if new.
    pub fn increment(&mut self, group: &str, key: &str) {
        let slot = match self.index.get(group) {
            Some(&slot) => slot,
            None => {
                self.groups.push((group.to_string(), AggregateTable::default()));
                let slot = self.groups.len() - 1;
                self.index.insert(group.to_string(), slot);
                slot
            }
        };
        self.groups[slot].1.increment(key);
    }

    /// Table of one group.
    #[must_use]
    pub fn get(&self, group: &str) -> Option<&AggregateTable> {
        self.index.get(group).map(|&slot| &self.groups[slot].1)
    }

    /// Count for a group at a bucket key, zero for unknown groups.
    #[must_use]
    pub fn count(&self, group: &str, key: &str) -> u32 {
        self.get(group).map_or(0, |table| table.get(key))
    }

    /// Groups and their tables in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AggregateTable)> {
        self.groups.iter().map(|(name, table)| (name.as_str(), table))
    }

    /// Group values in first-seen order.
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(name, _)| name.as_str())
    }

    /// Sum over groups at a bucket key.
    #[must_use]
    pub fn sum_at(&self, key: &str) -> u32 {
        self.groups.iter().map(|(_, table)| table.get(key)).sum()
    }

    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no group has been seen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// An ungrouped table and its per-group counterpart, updated together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TablePair {
    /// Ungrouped counts.
    pub base: AggregateTable,
    /// Counts split by dimension group.
    pub grouped: GroupedTable,
}

impl TablePair {
    fn record(&mut self, group: &str, key: &str) {
        self.base.increment(key);
        self.grouped.increment(group, key);
    }
}

/// Counters describing one aggregation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AggregationStats {
    /// Records examined.
    pub seen: usize,
    /// Records counted into all-cases.
    pub counted: usize,
    /// Records skipped for carrying another measure tag.
    pub other_measure: usize,
    /// Records skipped for a missing or malformed year/month.
    pub malformed: usize,
}

/// Every count table built by one aggregation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Aggregates {
    /// Every countable record.
    pub all_cases: TablePair,
    /// Records with a decision.
    pub all_reviewed: TablePair,
    /// Records whose decision carries the diversion marker.
    pub all_diverted: TablePair,
    /// Records whose decision equals [`Aggregates::selected_decision`].
    pub decision_type: TablePair,
    /// Decision literal the decision-type tables were built for.
    pub selected_decision: Option<String>,
    /// One pair per known diversion type, in configured order.
    pub diversion_types: Vec<(String, TablePair)>,
    /// Pass counters.
    pub stats: AggregationStats,
}

impl Aggregates {
    /// Tables of a known diversion type.
    #[must_use]
    pub fn diversion_type(&self, name: &str) -> Option<&TablePair> {
        self.diversion_types
            .iter()
            .find(|(known, _)| known == name)
            .map(|(_, pair)| pair)
    }

    fn diversion_type_mut(&mut self, name: &str) -> Option<&mut TablePair> {
        self.diversion_types
            .iter_mut()
            .find(|(known, _)| known == name)
            .map(|(_, pair)| pair)
    }
}

/// Builds [`Aggregates`] from case records.
#[derive(Debug, Clone, Copy)]
pub struct CaseAggregator<'a> {
    dataset: &'a DatasetConfig,
}

impl<'a> CaseAggregator<'a> {
    /// Creates an aggregator using the dataset vocabulary.
    #[must_use]
    pub const fn new(dataset: &'a DatasetConfig) -> Self {
        Self { dataset }
    }

    /// Counts records into every table in one pass.
    ///
    /// Records with another measure tag or a malformed period are skipped.
    /// The group of a record is its value for `dimension`, or the configured
    /// unknown label when that value is absent or empty.
    #[instrument(skip(self, records), fields(records = records.len()))]
    pub fn aggregate(
        &self,
        records: &[CaseRecord],
        dimension: &str,
        mode: RangeMode,
        selected_decision: Option<&str>,
    ) -> Aggregates {
        let dataset = self.dataset;
        let mut aggregates = Aggregates {
            selected_decision: selected_decision.map(ToString::to_string),
            diversion_types: dataset
                .diversion_types
                .iter()
                .map(|name| (name.clone(), TablePair::default()))
                .collect(),
            ..Aggregates::default()
        };
        let mut stats = AggregationStats {
            seen: records.len(),
            ..AggregationStats::default()
        };

        for record in records {
            if !dataset.is_valid_measure(record.measure.as_deref()) {
                stats.other_measure += 1;
                continue;
            }
            let Some((year, month)) = record.period() else {
                stats.malformed += 1;
                continue;
            };

            let key = key_of(year, month, mode);
            let group = record
                .field(dimension)
                .map_or_else(|| dataset.unknown_group.clone(), Cow::into_owned);

            aggregates.all_cases.record(&group, &key);
            stats.counted += 1;

            let Some(decision) = record.field("decision") else {
                continue;
            };
            aggregates.all_reviewed.record(&group, &key);
            if selected_decision == Some(&*decision) {
                aggregates.decision_type.record(&group, &key);
            }

            if dataset.is_diversion(&decision) {
                aggregates.all_diverted.record(&group, &key);
                let known = record
                    .diversion_type
                    .as_deref()
                    .and_then(|raw| dataset.known_diversion_type(raw));
                if let Some(pair) = known.and_then(|name| aggregates.diversion_type_mut(name)) {
                    pair.record(&group, &key);
                }
            }
        }

        debug!(
            seen = stats.seen,
            counted = stats.counted,
            other_measure = stats.other_measure,
            malformed = stats.malformed,
            groups = aggregates.all_cases.grouped.len(),
            "Aggregated case records"
        );
        aggregates.stats = stats;
        aggregates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casestats_common::test_utils::record_fixtures::{decided, diverted, received};

    fn aggregate(records: &[CaseRecord], selected: Option<&str>) -> Aggregates {
        let config = DatasetConfig::default();
        CaseAggregator::new(&config).aggregate(records, "region", RangeMode::Monthly, selected)
    }

    #[test]
    fn test_grouped_table_keeps_first_seen_order() {
        let mut table = GroupedTable::default();
        table.increment("South", "2024-1");
        table.increment("North", "2024-1");
        table.increment("South", "2024-2");

        let names: Vec<_> = table.group_names().collect();
        assert_eq!(names, vec!["South", "North"]);
        assert_eq!(table.count("South", "2024-1"), 1);
        assert_eq!(table.count("East", "2024-1"), 0);
        assert_eq!(table.sum_at("2024-1"), 2);
    }

    #[test]
    fn test_missing_key_reads_zero() {
        let table = AggregateTable::default();
        assert_eq!(table.get("2024-1"), 0);
        assert!(table.is_empty());
    }

    #[test]
    fn test_other_measure_counts_nowhere() {
        let records = vec![CaseRecord::new(2024, 1, "finalised")
            .with_decision("Diverted pre‑charge")
            .with_diversion_type("Other")];
        let aggregates = aggregate(&records, Some("Diverted pre‑charge"));

        assert!(aggregates.all_cases.base.is_empty());
        assert!(aggregates.all_reviewed.base.is_empty());
        assert!(aggregates.all_diverted.base.is_empty());
        assert!(aggregates.decision_type.base.is_empty());
        assert!(aggregates.diversion_types.iter().all(|(_, pair)| pair.base.is_empty()));
        assert_eq!(aggregates.stats.other_measure, 1);
    }

    #[test]
    fn test_malformed_period_is_skipped() {
        let records = vec![
            CaseRecord::new(2024, 13, "received"),
            CaseRecord {
                measure: Some("received".to_string()),
                ..CaseRecord::default()
            },
            received(2024, 1),
        ];
        let aggregates = aggregate(&records, None);
        assert_eq!(aggregates.all_cases.base.total(), 1);
        assert_eq!(aggregates.stats.malformed, 2);
        assert_eq!(aggregates.stats.counted, 1);
    }

    #[test]
    fn test_diversion_decision_partition() {
        let records = vec![diverted(2024, 1, "North", "Drug Diversion Program")];
        let aggregates = aggregate(&records, Some("Prosecuted"));

        assert_eq!(aggregates.all_reviewed.base.get("2024-1"), 1);
        assert_eq!(aggregates.all_diverted.base.get("2024-1"), 1);
        assert_eq!(aggregates.decision_type.base.get("2024-1"), 0);
        let drug = aggregates.diversion_type("Drug Diversion Program").unwrap();
        assert_eq!(drug.grouped.count("North", "2024-1"), 1);
    }

    #[test]
    fn test_selected_decision_table() {
        let records = vec![
            decided(2024, 3, "North", "Prosecuted"),
            decided(2024, 3, "South", "Prosecuted"),
            decided(2024, 3, "South", "Declined"),
        ];
        let aggregates = aggregate(&records, Some("Prosecuted"));
        assert_eq!(aggregates.decision_type.base.get("2024-3"), 2);
        assert_eq!(aggregates.all_reviewed.base.get("2024-3"), 3);
        assert_eq!(aggregates.selected_decision.as_deref(), Some("Prosecuted"));
    }

    #[test]
    fn test_diversion_type_is_trimmed_and_unknown_ignored() {
        let records = vec![
            diverted(2024, 1, "North", " Other "),
            diverted(2024, 1, "North", "Unlisted Scheme"),
        ];
        let aggregates = aggregate(&records, None);
        assert_eq!(aggregates.all_diverted.base.get("2024-1"), 2);
        assert_eq!(aggregates.diversion_type("Other").unwrap().base.get("2024-1"), 1);
        let typed: u32 = aggregates
            .diversion_types
            .iter()
            .map(|(_, pair)| pair.base.total())
            .sum();
        assert_eq!(typed, 1);
    }

    #[test]
    fn test_missing_dimension_uses_unknown_group() {
        let records = vec![received(2024, 1), received(2024, 1).with_field("region", "")];
        let aggregates = aggregate(&records, None);
        let names: Vec<_> = aggregates.all_cases.grouped.group_names().collect();
        assert_eq!(names, vec!["Unknown"]);
        assert_eq!(aggregates.all_cases.grouped.count("Unknown", "2024-1"), 2);
    }

    #[test]
    fn test_named_field_as_dimension() {
        let config = DatasetConfig::default();
        let records = vec![
            decided(2024, 1, "North", "Prosecuted"),
            decided(2024, 1, "North", "Declined"),
            received(2024, 1),
        ];
        let aggregates =
            CaseAggregator::new(&config).aggregate(&records, "decision", RangeMode::Annual, None);
        let names: Vec<_> = aggregates.all_cases.grouped.group_names().collect();
        assert_eq!(names, vec!["Prosecuted", "Declined", "Unknown"]);
        assert_eq!(aggregates.all_cases.base.get("2024"), 3);
    }
}
