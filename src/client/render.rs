use std::fmt::Write;

use tabled::{Table, Tabled};

use super::view::DashboardView;
use crate::model::DataPoint;

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

#[derive(Tabled)]
struct PointRow {
    #[tabled(rename = "Timestamp")]
    timestamp: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Category")]
    category: String,
}

impl From<&DataPoint> for PointRow {
    fn from(point: &DataPoint) -> Self {
        Self {
            timestamp: point.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            value: format!("{:.2}", point.value),
            category: point.category.clone(),
        }
    }
}

/// One bar per value, scaled between the smallest and largest.
pub fn sparkline(values: &[f64]) -> String {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    let span = max - min;
    values
        .iter()
        .map(|v| {
            if span <= 0.0 {
                BARS[BARS.len() / 2]
            } else {
                let idx = ((v - min) / span * (BARS.len() - 1) as f64).round() as usize;
                BARS[idx.min(BARS.len() - 1)]
            }
        })
        .collect()
}

/// Draw the whole dashboard as text.
pub fn render(view: &DashboardView) -> String {
    if view.is_loading() {
        return "Loading analytics dashboard...\n".to_string();
    }

    let mut out = String::new();
    let last_update = view
        .last_update()
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());

    let _ = writeln!(out, "InsightHub Analytics Dashboard");
    let _ = writeln!(
        out,
        "Total Data Points: {}  |  Total Reports: {}  |  Last Update: {}",
        view.total_data_points(),
        view.report_count(),
        last_update
    );

    let _ = writeln!(out, "\nReal-Time Data Visualization");
    if view.live().len() == 0 {
        let _ = writeln!(out, "  (waiting for data)");
    } else {
        // Buffer is newest first; draw oldest on the left.
        let values: Vec<f64> = view.live().rev().map(|p| p.value).collect();
        let _ = writeln!(out, "  {}", sparkline(&values));
    }

    let _ = writeln!(out, "\nAnalytics Reports");
    if view.reports().is_empty() {
        let _ = writeln!(out, "  No reports available");
    }
    for (i, report) in view.reports().iter().enumerate() {
        let _ = writeln!(out, "  [{}] {} ({})", i + 1, report.title, report.chart_type);
        if !report.description.is_empty() {
            let _ = writeln!(out, "      {}", report.description);
        }
    }

    if let Some(dataset_id) = view.selected() {
        let _ = writeln!(out, "\nDataset: {dataset_id}");
        match view.selected_rows() {
            Some(rows) => {
                let rows: Vec<PointRow> = rows.iter().map(PointRow::from).collect();
                let _ = writeln!(out, "{}", Table::new(rows));
            }
            None => {
                let _ = writeln!(out, "  Loading...");
            }
        }
    }

    out
}
