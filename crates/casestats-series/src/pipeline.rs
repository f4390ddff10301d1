//! End-to-end dashboard computation from records and control selections.

use crate::aggregator::{Aggregates, CaseAggregator};
use crate::bucket::{latest_period, BucketGenerator};
use crate::metric::{Metric, MetricResolver};
use crate::series::{DisplayMode, LineBreakdown, Series, SeriesAssembler, Unit};
use casestats_common::{CaseRecord, RangeMode, Result};
use casestats_config::Config;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// The dashboard control selections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardRequest {
    /// Time granularity.
    pub range: RangeMode,
    /// Record field to group by.
    pub dimension: String,
    /// Metric id to display.
    pub metric: String,
    /// Metric id shown as a percentage of `metric`, if any.
    #[serde(default)]
    pub numerator: Option<String>,
    /// Whether the line-with-breakdown view is wanted.
    #[serde(default)]
    pub breakdown: bool,
}

impl DashboardRequest {
    /// Builds a request from raw control ids; an unknown range id means monthly.
    pub fn from_ids(range: &str, dimension: impl Into<String>, metric: impl Into<String>) -> Self {
        Self {
            range: RangeMode::from_id_lenient(range),
            dimension: dimension.into(),
            metric: metric.into(),
            numerator: None,
            breakdown: false,
        }
    }

    /// Shows `numerator` as a percentage of the metric.
    #[must_use]
    pub fn with_numerator(mut self, numerator: impl Into<String>) -> Self {
        self.numerator = Some(numerator.into());
        self
    }

    /// Requests the line-with-breakdown view.
    #[must_use]
    pub const fn with_breakdown(mut self, breakdown: bool) -> Self {
        self.breakdown = breakdown;
        self
    }
}

/// What the renderer draws.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum DashboardView {
    /// One chart per series over shared labels.
    Grid {
        /// Bucket labels.
        labels: Vec<String>,
        /// Unit of every value.
        unit: Unit,
        /// ALL first, then one series per group.
        series: Vec<Series>,
    },
    /// A single total line with a selectable per-bucket breakdown.
    LineBreakdown(LineBreakdown),
}

impl DashboardView {
    /// Bucket labels of the view.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        match self {
            Self::Grid { labels, .. } => labels,
            Self::LineBreakdown(view) => &view.labels,
        }
    }
}

/// Computes the dashboard for one set of control selections.
///
/// Every call recomputes from `records`; nothing is retained.
///
/// # Errors
///
/// Returns a validation error when the rolling window is requested and no
/// countable record exists.
#[instrument(skip(records, config), fields(records = records.len()))]
pub fn build_dashboard(
    records: &[CaseRecord],
    request: &DashboardRequest,
    config: &Config,
) -> Result<DashboardView> {
    let dataset = &config.dataset;
    let metric = Metric::from_id(&request.metric, dataset);

    let latest = match request.range {
        RangeMode::Last12 => latest_period(records, dataset),
        _ => None,
    };
    let buckets = BucketGenerator::new(dataset).generate(request.range, latest)?;

    let aggregator = CaseAggregator::new(dataset);
    let aggregates = aggregator.aggregate(
        records,
        &request.dimension,
        request.range,
        metric.selected_decision(),
    );
    let resolved = MetricResolver::resolve(&aggregates, &metric);
    let assembler = SeriesAssembler::new(&buckets, &config.dashboard.palette);

    if request.breakdown && metric.supports_breakdown() {
        info!(metric = %metric, "Built line breakdown view");
        return Ok(DashboardView::LineBreakdown(assembler.line_breakdown(&resolved)));
    }

    let numerator = request
        .numerator
        .as_deref()
        .map(|id| Metric::from_id(id, dataset));
    // A decision-type numerator other than the metric needs its own pass.
    let numerator_pass: Option<Aggregates> = numerator
        .as_ref()
        .and_then(Metric::selected_decision)
        .filter(|&decision| metric.selected_decision() != Some(decision))
        .map(|decision| {
            debug!(decision, "Aggregating numerator separately");
            aggregator.aggregate(records, &request.dimension, request.range, Some(decision))
        });

    let mode = match &numerator {
        Some(numerator) => DisplayMode::Percentage {
            numerator: MetricResolver::resolve(
                numerator_pass.as_ref().unwrap_or(&aggregates),
                numerator,
            ),
        },
        None => DisplayMode::Counts,
    };

    let series = assembler.assemble(&resolved, &mode);
    info!(metric = %metric, series = series.len(), unit = %mode.unit(), "Built grid view");
    Ok(DashboardView::Grid {
        labels: assembler.labels(),
        unit: mode.unit(),
        series,
    })
}
