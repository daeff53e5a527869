use std::path::Path;

use crate::analysis::{
    category_counts, category_histogram, category_totals, filter_between, monthly_totals,
    pie_slices, positive_totals, sorted_desc,
};
use crate::charts::{self, ChartSize};
use crate::cli::{ChartKind, InputArgs, WindowArgs};
use crate::error::Result;
use crate::settings::load_settings;

pub fn run(
    kind: ChartKind,
    input: &InputArgs,
    window: &WindowArgs,
    focus: Option<&str>,
    all: bool,
    output: &Path,
) -> Result<()> {
    let settings = load_settings();
    let size = ChartSize {
        width: settings.chart_width,
        height: settings.chart_height,
    };
    let txns = input.load()?;

    // Monthly charts always span the whole file
    let (rows, scope) = if all || kind == ChartKind::Monthly {
        (txns, "full period".to_string())
    } else {
        let (from, to) = window.resolve(&settings)?;
        let scope = format!("{} to {}", from.format("%m/%d/%Y"), to.format("%m/%d/%Y"));
        (filter_between(&txns, from, to), scope)
    };

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    match kind {
        ChartKind::Histogram => {
            let title = format!("Transactions per category ({scope})");
            charts::histogram(&category_histogram(&rows), &title, output, size)?;
        }
        ChartKind::Counts => {
            let title = format!("Most frequent categories ({scope})");
            charts::count_plot(&category_counts(&rows), &title, output, size)?;
        }
        ChartKind::Bars => {
            let title = format!("Spending by category ({scope})");
            let totals = sorted_desc(&positive_totals(&category_totals(&rows)));
            charts::bar_chart(&totals, &title, output, size)?;
        }
        ChartKind::Pie => {
            let title = format!("Share of spending ({scope})");
            let slices = pie_slices(&positive_totals(&category_totals(&rows)));
            charts::pie_chart(&slices, &title, output, size)?;
        }
        ChartKind::Monthly => {
            let category = focus.unwrap_or(&settings.focus_category);
            let title = format!("Monthly {category} spending");
            charts::monthly_bar_chart(&monthly_totals(&rows, category), &title, output, size)?;
        }
    }
    println!("Wrote {}", output.display());
    Ok(())
}
