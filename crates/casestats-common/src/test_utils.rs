//! Test utilities and shared fixtures for the casestats workspace.
//!
//! Enabled for this crate's own tests and, through the `testing` feature, for
//! the unit and integration tests of the other workspace crates.

use crate::CaseRecord;
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize logging for tests once per test binary.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(filter)
            .try_init();
    });
}

/// Record fixtures shaped like the source spreadsheets.
pub mod record_fixtures {
    use super::CaseRecord;

    /// The valid measure tag used by the default configuration.
    pub const RECEIVED: &str = "received";

    /// A received case with no decision yet.
    pub fn received(year: i32, month: u32) -> CaseRecord {
        CaseRecord::new(year, month, RECEIVED)
    }

    /// A received case in a region with the given decision.
    pub fn decided(year: i32, month: u32, region: &str, decision: &str) -> CaseRecord {
        received(year, month)
            .with_field("region", region)
            .with_decision(decision)
    }

    /// A received case diverted pre-charge into the given programme.
    pub fn diverted(year: i32, month: u32, region: &str, programme: &str) -> CaseRecord {
        decided(year, month, region, "Diverted pre‑charge").with_diversion_type(programme)
    }

    /// The three-record example used across the end-to-end tests.
    pub fn three_case_example() -> Vec<CaseRecord> {
        vec![
            diverted(2024, 1, "North", "Drug Diversion Program"),
            decided(2024, 1, "South", "Prosecuted"),
            received(2024, 1).with_field("region", "North"),
        ]
    }

    /// A mixed record set spanning several years, measures and outcomes.
    pub fn mixed_dataset() -> Vec<CaseRecord> {
        vec![
            diverted(2023, 11, "North", "Mental Health Diversion (MHD)"),
            diverted(2024, 2, "East", "Restorative Justice Program"),
            decided(2024, 2, "North", "Prosecuted"),
            decided(2024, 5, "South", "Declined"),
            decided(2024, 7, "East", "Diverted post‑charge").with_diversion_type(" Other "),
            received(2024, 12),
            decided(2025, 1, "South", "Prosecuted"),
            diverted(2025, 2, "North", "Drug Diversion Program"),
            CaseRecord::new(2025, 2, "finalised").with_field("region", "North"),
            CaseRecord::default().with_field("region", "Nowhere"),
        ]
    }
}

/// Property-based testing strategies using proptest.
#[cfg(any(test, feature = "proptest"))]
pub mod property_testing {
    use super::CaseRecord;
    use proptest::prelude::*;

    /// Strategy for arbitrary, partly malformed case records.
    pub fn case_record_strategy() -> impl Strategy<Value = CaseRecord> {
        (
            prop_oneof![Just(None), (2022i32..=2026).prop_map(Some)],
            prop_oneof![Just(None), (0u32..=13).prop_map(Some)],
            prop_oneof![3 => Just("received"), 1 => Just("finalised")],
            prop_oneof![
                Just(None),
                Just(Some("Prosecuted")),
                Just(Some("Declined")),
                Just(Some("Diverted pre‑charge")),
                Just(Some("Diverted post‑charge")),
            ],
            prop_oneof![
                Just(None),
                Just(Some("Drug Diversion Program")),
                Just(Some("Other")),
                Just(Some("Unlisted Scheme")),
            ],
            prop_oneof![Just(None), Just(Some("")), Just(Some("North")), Just(Some("South"))],
        )
            .prop_map(|(year, month, measure, decision, programme, region)| {
                let mut record = CaseRecord {
                    year,
                    month,
                    measure: Some(measure.to_string()),
                    ..CaseRecord::default()
                };
                if let Some(decision) = decision {
                    record = record.with_decision(decision);
                }
                if let Some(programme) = programme {
                    record = record.with_diversion_type(programme);
                }
                if let Some(region) = region {
                    record = record.with_field("region", region);
                }
                record
            })
    }
}
