//! Integration tests for the aggregation and series pipeline

use casestats_common::test_utils::property_testing::case_record_strategy;
use casestats_common::test_utils::{init_test_logging, record_fixtures};
use casestats_common::{CaseRecord, RangeMode};
use casestats_config::{Config, DatasetConfig};
use casestats_series::{
    build_dashboard, key_of, BucketGenerator, BucketPeriod, CaseAggregator, DashboardRequest,
    DashboardView, Metric, MetricResolver, Series, TablePair, Unit,
};
use proptest::prelude::*;
use std::collections::HashSet;

fn single_year_config() -> Config {
    let mut config = Config::default();
    config.dataset.years = vec![2024];
    config
}

fn grid_series(view: DashboardView) -> Vec<Series> {
    match view {
        DashboardView::Grid { series, .. } => series,
        DashboardView::LineBreakdown(_) => panic!("expected grid view"),
    }
}

fn assert_conserved(pair: &TablePair) {
    let keys: HashSet<&str> = pair
        .base
        .keys()
        .chain(pair.grouped.iter().flat_map(|(_, table)| table.keys()))
        .collect();
    for key in keys {
        assert_eq!(pair.grouped.sum_at(key), pair.base.get(key), "key {key}");
    }
}

#[test]
fn test_end_to_end_all_cases() {
    init_test_logging();
    let config = single_year_config();
    let request = DashboardRequest::from_ids("annual", "region", "all_cases");

    let view = build_dashboard(&record_fixtures::three_case_example(), &request, &config).unwrap();
    assert_eq!(view.labels(), ["2024".to_string()]);

    let series = grid_series(view);
    let named: Vec<_> = series
        .iter()
        .map(|s| (s.name.as_str(), s.values.clone()))
        .collect();
    assert_eq!(
        named,
        vec![
            ("ALL", vec![Some(3)]),
            ("North", vec![Some(2)]),
            ("South", vec![Some(1)]),
        ]
    );
}

#[test]
fn test_end_to_end_all_diverted() {
    let config = single_year_config();
    let request = DashboardRequest::from_ids("annual", "region", "all_diverted");

    let series =
        grid_series(build_dashboard(&record_fixtures::three_case_example(), &request, &config).unwrap());
    assert_eq!(series.len(), 2);
    assert_eq!(series[0].values, vec![Some(1)]);
    assert_eq!(series[1].name, "North");
    assert_eq!(series[1].values, vec![Some(1)]);
    assert!(series.iter().all(|s| s.name != "South"));
}

#[test]
fn test_monthly_axis_is_exhaustive_and_ordered() {
    let dataset = DatasetConfig::default();
    let buckets = BucketGenerator::new(&dataset)
        .generate(RangeMode::Monthly, None)
        .unwrap();

    assert_eq!(buckets.len(), 36);
    let unique: HashSet<_> = buckets.iter().map(|b| b.key.clone()).collect();
    assert_eq!(unique.len(), 36);

    let periods: Vec<(i32, u32)> = buckets
        .iter()
        .map(|b| match b.period {
            BucketPeriod::Month { year, month } => (year, month),
            other => panic!("unexpected period {other:?}"),
        })
        .collect();
    let mut sorted = periods.clone();
    sorted.sort_unstable();
    assert_eq!(periods, sorted);
}

#[test]
fn test_key_function_matches_bucket_keys() {
    let dataset = DatasetConfig::default();
    let generator = BucketGenerator::new(&dataset);

    for mode in [RangeMode::Monthly, RangeMode::Quarterly, RangeMode::Annual] {
        let keys: HashSet<_> = generator
            .generate(mode, None)
            .unwrap()
            .into_iter()
            .map(|b| b.key)
            .collect();
        for year in dataset.years_ascending() {
            for month in 1..=12 {
                assert!(keys.contains(&key_of(year, month, mode)), "{mode} {year}-{month}");
            }
        }
    }
}

#[test]
fn test_rolling_window_over_year_boundary() {
    let config = Config::default();
    let records = vec![
        record_fixtures::received(2024, 3),
        record_fixtures::received(2025, 2),
        record_fixtures::received(2025, 2),
        record_fixtures::received(2023, 12),
    ];
    let request = DashboardRequest::from_ids("last12", "region", "all_cases");
    let view = build_dashboard(&records, &request, &config).unwrap();

    assert_eq!(view.labels().first().map(String::as_str), Some("Mar '24"));
    assert_eq!(view.labels().last().map(String::as_str), Some("Feb '25"));

    let series = grid_series(view);
    assert_eq!(series[0].values.first(), Some(&Some(1)));
    assert_eq!(series[0].latest(), Some(2));
    let total: u32 = series[0].values.iter().flatten().sum();
    assert_eq!(total, 3);
}

#[test]
fn test_other_measures_are_filtered() {
    let config = Config::default();
    let records = vec![CaseRecord::new(2024, 1, "finalised")
        .with_decision("Diverted pre‑charge")
        .with_diversion_type("Other")
        .with_field("region", "North")];

    for metric in Metric::known_ids(&config.dataset) {
        let request = DashboardRequest::from_ids("annual", "region", metric);
        let series = grid_series(build_dashboard(&records, &request, &config).unwrap());
        assert_eq!(series.len(), 1, "{metric}");
        assert!(series[0].values.iter().all(|v| *v == Some(0)), "{metric}");
    }
}

#[test]
fn test_diversion_does_not_count_as_other_decision() {
    let dataset = DatasetConfig::default();
    let records = vec![record_fixtures::diverted(2024, 1, "North", "Other")];
    let aggregates = CaseAggregator::new(&dataset).aggregate(
        &records,
        "region",
        RangeMode::Monthly,
        Some("Prosecuted"),
    );

    let reviewed = MetricResolver::resolve(&aggregates, &Metric::AllReviewed);
    let diverted = MetricResolver::resolve(&aggregates, &Metric::AllDiverted);
    let prosecuted =
        MetricResolver::resolve(&aggregates, &Metric::from_id("Prosecuted", &dataset));
    assert_eq!(reviewed.base.get("2024-1"), 1);
    assert_eq!(diverted.base.get("2024-1"), 1);
    assert_eq!(prosecuted.base.get("2024-1"), 0);
}

#[test]
fn test_percentage_gap_for_empty_denominator() {
    let config = single_year_config();
    let records = vec![record_fixtures::decided(2024, 1, "North", "Prosecuted")];
    let request = DashboardRequest::from_ids("monthly", "region", "all_diverted")
        .with_numerator("all_diverted");

    let view = build_dashboard(&records, &request, &config).unwrap();
    let DashboardView::Grid { unit, series, .. } = view else {
        panic!("expected grid view");
    };
    assert_eq!(unit, Unit::Percent);
    assert_eq!(series.len(), 1);
    assert!(series[0].values.iter().all(Option::is_none));
}

#[test]
fn test_breakdown_view_for_diversion_type() {
    let config = single_year_config();
    let records = record_fixtures::mixed_dataset();
    let request = DashboardRequest::from_ids("annual", "region", "Drug Diversion Program")
        .with_breakdown(true);

    let view = build_dashboard(&records, &request, &config).unwrap();
    let DashboardView::LineBreakdown(breakdown) = view else {
        panic!("expected line breakdown view");
    };
    assert_eq!(breakdown.line.values, vec![Some(0)]);
    assert!(breakdown.latest_breakdown().is_empty());
}

#[test]
fn test_mixed_dataset_decision_metric() {
    let config = Config::default();
    let records = record_fixtures::mixed_dataset();
    let request = DashboardRequest::from_ids("annual", "region", "Prosecuted").with_breakdown(true);

    let view = build_dashboard(&records, &request, &config).unwrap();
    let DashboardView::LineBreakdown(breakdown) = view else {
        panic!("expected line breakdown view");
    };
    assert_eq!(breakdown.line.values, vec![Some(0), Some(1), Some(1)]);
    let slices = breakdown.breakdown_at(1);
    assert_eq!(slices.len(), 1);
    assert_eq!(slices[0].group, "North");
    assert_eq!(slices[0].color, "#e91e63");
    assert_eq!(breakdown.latest_breakdown()[0].group, "South");
}

proptest! {
    #[test]
    fn prop_grouped_counts_sum_to_ungrouped(
        records in prop::collection::vec(case_record_strategy(), 0..60),
        mode in prop::sample::select(RangeMode::ALL.to_vec()),
        selected in prop::option::of(prop::sample::select(vec!["Prosecuted", "Declined"])),
    ) {
        let dataset = DatasetConfig::default();
        let aggregates = CaseAggregator::new(&dataset).aggregate(&records, "region", mode, selected);

        assert_conserved(&aggregates.all_cases);
        assert_conserved(&aggregates.all_reviewed);
        assert_conserved(&aggregates.all_diverted);
        assert_conserved(&aggregates.decision_type);
        for (_, pair) in &aggregates.diversion_types {
            assert_conserved(pair);
        }

        let counted = u32::try_from(aggregates.stats.counted).unwrap();
        prop_assert_eq!(aggregates.all_cases.base.total(), counted);
        prop_assert!(aggregates.all_reviewed.base.total() <= counted);
        prop_assert!(aggregates.all_diverted.base.total() <= aggregates.all_reviewed.base.total());
        let typed: u32 = aggregates.diversion_types.iter().map(|(_, p)| p.base.total()).sum();
        prop_assert!(typed <= aggregates.all_diverted.base.total());
    }

    #[test]
    fn prop_monthly_series_sum_to_counted_records(
        records in prop::collection::vec(case_record_strategy(), 0..60),
    ) {
        let mut config = Config::default();
        config.dataset.years = (2022..=2026).collect();
        let request = DashboardRequest::from_ids("monthly", "region", "all_cases");
        let series = grid_series(build_dashboard(&records, &request, &config).unwrap());

        let expected = records
            .iter()
            .filter(|r| r.measure.as_deref() == Some("received") && r.period().is_some())
            .count();
        let total: u32 = series[0].values.iter().flatten().sum();
        prop_assert_eq!(total as usize, expected);

        for (i, _) in series[0].values.iter().enumerate() {
            let grouped: u32 = series[1..].iter().filter_map(|s| s.values[i]).sum();
            prop_assert_eq!(Some(grouped), series[0].values[i]);
        }
    }
}
