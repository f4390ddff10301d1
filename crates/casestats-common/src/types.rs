//! Case record model shared by ingestion and the aggregation pipeline.

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::StatsError;

/// Time granularity of the dashboard axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeMode {
    /// One bucket per calendar month across the configured years.
    #[default]
    Monthly,
    /// One bucket per calendar quarter across the configured years.
    Quarterly,
    /// One bucket per configured year.
    Annual,
    /// Rolling twelve months ending at the latest month present in the data.
    Last12,
}

impl RangeMode {
    /// Every mode, in control order.
    pub const ALL: [Self; 4] = [Self::Monthly, Self::Quarterly, Self::Annual, Self::Last12];

    /// Control identifier of the mode.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Annual => "annual",
            Self::Last12 => "last12",
        }
    }

    /// Parse a control identifier, treating anything unknown as monthly.
    #[must_use]
    pub fn from_id_lenient(id: &str) -> Self {
        id.parse().unwrap_or_default()
    }
}

impl fmt::Display for RangeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for RangeMode {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.id() == s.trim())
            .ok_or_else(|| StatsError::validation_field(format!("unknown range mode '{s}'"), "range"))
    }
}

/// A loosely typed cell value as produced by spreadsheet ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Empty cell.
    Null,
    /// Boolean cell.
    Bool(bool),
    /// Whole number cell.
    Integer(i64),
    /// Fractional number cell.
    Float(f64),
    /// Text cell.
    Text(String),
}

impl FieldValue {
    /// Text form of the value, `None` for null or empty text.
    #[must_use]
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Null => None,
            Self::Text(s) if s.is_empty() => None,
            Self::Text(s) => Some(Cow::Borrowed(s)),
            Self::Bool(b) => Some(Cow::Owned(b.to_string())),
            Self::Integer(n) => Some(Cow::Owned(n.to_string())),
            Self::Float(f) => Some(Cow::Owned(format_float(*f))),
        }
    }

    /// Integer form of the value, accepting whole floats and numeric text.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            Self::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(*f as i64),
            Self::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        (f as i64).to_string()
    } else {
        f.to_string()
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_text().as_deref().unwrap_or(""))
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

/// One row of case data.
///
/// `year`, `month` and `measure` are required for a record to be counted;
/// when they are missing or unparseable the record deserializes anyway and is
/// skipped by the aggregation pass. Any field not named here lands in
/// [`CaseRecord::fields`] and can be used as a grouping dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CaseRecord {
    /// Calendar year of the period the record belongs to.
    pub year: Option<i32>,
    /// Calendar month, 1-12.
    pub month: Option<u32>,
    /// Measure tag; only the configured valid measure is counted.
    pub measure: Option<String>,
    /// Decision outcome, absent while undecided.
    pub decision: Option<String>,
    /// Diversion programme, meaningful only for diversion decisions.
    pub diversion_type: Option<String>,
    /// Open set of dimension fields.
    #[serde(flatten)]
    pub fields: BTreeMap<String, FieldValue>,
    /// Column names in the order they were read or set, empty cells included.
    #[serde(skip)]
    pub columns: Vec<String>,
}

/// Names of the typed fields that `CaseRecord::field` also answers for.
pub const NAMED_FIELDS: [&str; 5] = ["year", "month", "measure", "decision", "diversion_type"];

impl CaseRecord {
    /// Create a record for the given period and measure.
    pub fn new(year: i32, month: u32, measure: impl Into<String>) -> Self {
        Self {
            year: Some(year),
            month: Some(month),
            measure: Some(measure.into()),
            columns: NAMED_FIELDS[..3].iter().map(ToString::to_string).collect(),
            ..Self::default()
        }
    }

    /// Set the decision outcome.
    #[must_use]
    pub fn with_decision(mut self, decision: impl Into<String>) -> Self {
        self.set("decision".to_string(), FieldValue::Text(decision.into()));
        self
    }

    /// Set the diversion type.
    #[must_use]
    pub fn with_diversion_type(mut self, diversion_type: impl Into<String>) -> Self {
        self.set("diversion_type".to_string(), FieldValue::Text(diversion_type.into()));
        self
    }

    /// Set an arbitrary dimension field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(name.into(), value.into());
        self
    }

    /// Store one cell, converting named fields leniently.
    ///
    /// The column is listed once, at its first appearance; a repeated name
    /// overwrites the value.
    pub fn set(&mut self, name: String, value: FieldValue) {
        if !self.columns.contains(&name) {
            self.columns.push(name.clone());
        }
        match name.as_str() {
            "year" => self.year = value.as_integer().and_then(|n| i32::try_from(n).ok()),
            "month" => self.month = value.as_integer().and_then(|n| u32::try_from(n).ok()),
            "measure" => self.measure = text_of(&value),
            "decision" => self.decision = text_of(&value),
            "diversion_type" => self.diversion_type = text_of(&value),
            _ => {
                self.fields.insert(name, value);
            }
        }
    }

    /// The (year, month) period of the record, if well formed.
    #[must_use]
    pub fn period(&self) -> Option<(i32, u32)> {
        match (self.year, self.month) {
            (Some(year), Some(month)) if (1..=12).contains(&month) => Some((year, month)),
            _ => None,
        }
    }

    /// Look up any field by name as text.
    ///
    /// Empty values read as absent.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        let value = match name {
            "year" => self.year.map(|y| Cow::Owned(y.to_string())),
            "month" => self.month.map(|m| Cow::Owned(m.to_string())),
            "measure" => self.measure.as_deref().map(Cow::Borrowed),
            "decision" => self.decision.as_deref().map(Cow::Borrowed),
            "diversion_type" => self.diversion_type.as_deref().map(Cow::Borrowed),
            other => self.fields.get(other).and_then(FieldValue::as_text),
        };
        value.filter(|v| !v.is_empty())
    }

    /// Names of the columns on this record in source order.
    ///
    /// A column counts as present even when its cell is empty. Values assigned
    /// directly to the public fields without going through [`CaseRecord::set`]
    /// are listed after the tracked columns.
    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        let listed = |name: &str| self.columns.iter().any(|column| column == name);
        let untracked = NAMED_FIELDS
            .iter()
            .copied()
            .filter(|name| self.field(name).is_some())
            .chain(self.fields.keys().map(String::as_str))
            .filter(|name| !listed(*name));

        self.columns.iter().map(String::as_str).chain(untracked).collect()
    }
}

impl<'de> Deserialize<'de> for CaseRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CaseRecordVisitor)
    }
}

struct CaseRecordVisitor;

impl<'de> Visitor<'de> for CaseRecordVisitor {
    type Value = CaseRecord;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a case record object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut record = CaseRecord::default();
        while let Some((name, value)) = map.next_entry::<String, FieldValue>()? {
            record.set(name, value);
        }
        Ok(record)
    }
}

fn text_of(value: &FieldValue) -> Option<String> {
    value.as_text().map(Cow::into_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_mode_ids() {
        for mode in RangeMode::ALL {
            assert_eq!(mode.id().parse::<RangeMode>().unwrap(), mode);
        }
        assert!("weekly".parse::<RangeMode>().is_err());
        assert_eq!(RangeMode::from_id_lenient("weekly"), RangeMode::Monthly);
        assert_eq!(RangeMode::from_id_lenient("last12"), RangeMode::Last12);
        assert_eq!(serde_json::to_string(&RangeMode::Last12).unwrap(), "\"last12\"");
    }

    #[test]
    fn test_deserialize_flat_row() {
        let json = r#"{
            "year": 2024, "month": "3", "measure": "received",
            "decision": "Prosecuted", "region": "North", "count": 1, "flag": null
        }"#;
        let record: CaseRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.period(), Some((2024, 3)));
        assert_eq!(record.measure.as_deref(), Some("received"));
        assert_eq!(record.decision.as_deref(), Some("Prosecuted"));
        assert_eq!(record.diversion_type, None);
        assert_eq!(record.field("region").as_deref(), Some("North"));
        assert_eq!(record.field("count").as_deref(), Some("1"));
        assert_eq!(record.field("flag"), None);
    }

    #[test]
    fn test_malformed_period_is_none() {
        let record: CaseRecord =
            serde_json::from_str(r#"{"year": "soon", "month": 13, "measure": "received"}"#).unwrap();
        assert_eq!(record.year, None);
        assert_eq!(record.period(), None);

        let record = CaseRecord::new(2024, 0, "received");
        assert_eq!(record.period(), None);
    }

    #[test]
    fn test_empty_decision_reads_as_absent() {
        let record: CaseRecord =
            serde_json::from_str(r#"{"year": 2024, "month": 1, "decision": ""}"#).unwrap();
        assert_eq!(record.decision, None);

        let record = CaseRecord::new(2024, 1, "received").with_decision("");
        assert_eq!(record.field("decision"), None);
    }

    #[test]
    fn test_field_lookup_covers_named_fields() {
        let record = CaseRecord::new(2025, 2, "received")
            .with_decision("Diverted pre‑charge")
            .with_diversion_type("Other")
            .with_field("region", "South")
            .with_field("age", 42_i64);

        assert_eq!(record.field("decision").as_deref(), Some("Diverted pre‑charge"));
        assert_eq!(record.field("diversion_type").as_deref(), Some("Other"));
        assert_eq!(record.field("year").as_deref(), Some("2025"));
        assert_eq!(record.field("age").as_deref(), Some("42"));
        assert_eq!(record.field("missing"), None);
    }

    #[test]
    fn test_field_names_order() {
        let record = CaseRecord::new(2025, 2, "received")
            .with_decision("Declined")
            .with_field("zone", "A")
            .with_field("area", "B");

        assert_eq!(
            record.field_names(),
            vec!["year", "month", "measure", "decision", "zone", "area"]
        );
    }

    #[test]
    fn test_empty_columns_keep_their_place() {
        let json = r#"{"id": 1, "region": "", "year": "2024", "month": 1.0,
            "measure": "received", "decision": "", "diversion_type": "", "court": "Central"}"#;
        let record: CaseRecord = serde_json::from_str(json).unwrap();

        assert_eq!(
            record.field_names(),
            vec!["id", "region", "year", "month", "measure", "decision", "diversion_type", "court"]
        );
        assert_eq!(record.decision, None);
        assert_eq!(record.field("region"), None);
        assert_eq!(record.period(), Some((2024, 1)));
    }

    #[test]
    fn test_directly_assigned_fields_are_listed_after_columns() {
        let mut record = CaseRecord::new(2024, 1, "received").with_field("region", "North");
        record.decision = Some("Prosecuted".to_string());
        record.fields.insert("court".to_string(), FieldValue::from("Central"));

        assert_eq!(
            record.field_names(),
            vec!["year", "month", "measure", "region", "decision", "court"]
        );
    }

    #[test]
    fn test_repeated_key_is_listed_once() {
        let record: CaseRecord =
            serde_json::from_str(r#"{"region": "North", "year": 2024, "region": "South"}"#).unwrap();
        assert_eq!(record.field_names(), vec!["region", "year"]);
        assert_eq!(record.field("region").as_deref(), Some("South"));
    }

    #[test]
    fn test_non_object_row_is_rejected() {
        assert!(serde_json::from_str::<CaseRecord>("[1, 2]").is_err());
    }

    #[test]
    fn test_whole_float_renders_as_integer() {
        assert_eq!(FieldValue::Float(3.0).as_text().as_deref(), Some("3"));
        assert_eq!(FieldValue::Float(2.5).as_text().as_deref(), Some("2.5"));
        assert_eq!(FieldValue::Float(12.0).as_integer(), Some(12));
        assert_eq!(FieldValue::Bool(true).as_integer(), None);
    }
}
