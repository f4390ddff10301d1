//! Rendering of dashboard views as JSON or plain text tables.

use crate::cli::OutputFormat;
use crate::error::{DashboardError, DashboardResult};
use casestats_series::{format_value, DashboardView, DimensionOption, LineBreakdown, Unit};

/// Renders a view in the requested format.
///
/// `bucket` selects which breakdown a line view prints; the latest bucket
/// when unset.
///
/// # Errors
///
/// Fails when the bucket index is past the axis or JSON encoding fails.
pub fn render_view(
    view: &DashboardView,
    format: OutputFormat,
    bucket: Option<usize>,
) -> DashboardResult<String> {
    if let (Some(index), DashboardView::LineBreakdown(line)) = (bucket, view) {
        if index >= line.len() {
            return Err(DashboardError::BucketOutOfRange {
                index,
                len: line.len(),
            });
        }
    }

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(view)?),
        OutputFormat::Table => Ok(match view {
            DashboardView::Grid { labels, unit, series } => {
                let header: Vec<&str> = series.iter().map(|s| s.name.as_str()).collect();
                let rows = labels
                    .iter()
                    .enumerate()
                    .map(|(i, label)| {
                        std::iter::once(label.clone())
                            .chain(series.iter().map(|s| format_value(s.values[i], *unit)))
                            .collect()
                    })
                    .collect::<Vec<Vec<String>>>();
                table("bucket", &header, &rows)
            }
            DashboardView::LineBreakdown(line) => render_breakdown(line, bucket),
        }),
    }
}

fn render_breakdown(line: &LineBreakdown, bucket: Option<usize>) -> String {
    let rows = line
        .labels
        .iter()
        .zip(&line.line.values)
        .map(|(label, value)| vec![label.clone(), format_value(*value, Unit::Cases)])
        .collect::<Vec<_>>();
    let mut out = table("bucket", &[line.line.name.as_str()], &rows);

    let (index, slices) = match bucket {
        Some(index) => (index, line.breakdown_at(index)),
        None => (line.len().saturating_sub(1), line.latest_breakdown()),
    };
    let label = line.labels.get(index).map_or("", String::as_str);
    out.push_str(&format!("\nBreakdown for {label}:\n"));
    if slices.is_empty() {
        out.push_str("  no cases\n");
    }
    for slice in slices {
        let count = format_value(Some(slice.count), Unit::Cases);
        out.push_str(&format!("  {} ({}): {count}\n", slice.group, slice.color));
    }
    out
}

/// Renders the selectable dimensions.
///
/// # Errors
///
/// Fails when JSON encoding fails.
pub fn render_dimensions(
    options: &[DimensionOption],
    format: OutputFormat,
) -> DashboardResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(options)?),
        OutputFormat::Table => {
            let rows = options
                .iter()
                .map(|o| vec![o.field.clone(), o.label.clone()])
                .collect::<Vec<_>>();
            Ok(table("field", &["label"], &rows))
        }
    }
}

/// Left-aligned text table with a leading key column.
fn table(key_header: &str, headers: &[&str], rows: &[Vec<String>]) -> String {
    let columns = headers.len() + 1;
    let mut widths = vec![0; columns];
    widths[0] = key_header.chars().count();
    for (i, header) in headers.iter().enumerate() {
        widths[i + 1] = header.chars().count();
    }
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header_row = std::iter::once(key_header).chain(headers.iter().copied());
    push_row(&mut out, header_row, &widths);
    for row in rows {
        push_row(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}
