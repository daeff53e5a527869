use std::f64::consts::TAU;
use std::path::{Path, PathBuf};

use log::info;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::error::{Result, SpendError};
use crate::explore::Exploration;
use crate::models::{CategoryCount, CategoryTotal, MonthTotal, PieSlice};

type DrawResult<T> = std::result::Result<T, Box<dyn std::error::Error>>;

const BAR_COLOR: RGBColor = RGBColor(76, 114, 176);
const COUNT_COLOR: RGBColor = RGBColor(85, 168, 104);
const MONTH_COLOR: RGBColor = RGBColor(196, 78, 82);
const FONT: &str = "sans-serif";

#[derive(Debug, Clone, Copy)]
pub struct ChartSize {
    pub width: u32,
    pub height: u32,
}

/// One labelled bar, the common shape of every bar-style chart.
#[derive(Debug, Clone, PartialEq)]
pub struct BarDatum {
    pub label: String,
    pub value: f64,
}

impl From<&CategoryCount> for BarDatum {
    fn from(c: &CategoryCount) -> Self {
        Self {
            label: c.category.clone(),
            value: c.count as f64,
        }
    }
}

impl From<&CategoryTotal> for BarDatum {
    fn from(t: &CategoryTotal) -> Self {
        Self {
            label: t.category.clone(),
            value: t.total,
        }
    }
}

impl From<&MonthTotal> for BarDatum {
    fn from(m: &MonthTotal) -> Self {
        Self {
            label: m.month.to_string(),
            value: m.total,
        }
    }
}

// ---------------------------------------------------------------------------
// Public renderers
// ---------------------------------------------------------------------------

pub fn histogram(counts: &[CategoryCount], title: &str, path: &Path, size: ChartSize) -> Result<()> {
    let bars: Vec<BarDatum> = counts.iter().map(BarDatum::from).collect();
    finish(path, draw_bars(path, size, title, "Count", &bars, BAR_COLOR))
}

/// Count plot: callers pass counts already in descending order.
pub fn count_plot(counts: &[CategoryCount], title: &str, path: &Path, size: ChartSize) -> Result<()> {
    let bars: Vec<BarDatum> = counts.iter().map(BarDatum::from).collect();
    finish(path, draw_bars(path, size, title, "Count", &bars, COUNT_COLOR))
}

pub fn bar_chart(totals: &[CategoryTotal], title: &str, path: &Path, size: ChartSize) -> Result<()> {
    let bars: Vec<BarDatum> = totals.iter().map(BarDatum::from).collect();
    finish(path, draw_bars(path, size, title, "Amount ($)", &bars, BAR_COLOR))
}

pub fn monthly_bar_chart(months: &[MonthTotal], title: &str, path: &Path, size: ChartSize) -> Result<()> {
    let bars: Vec<BarDatum> = months.iter().map(BarDatum::from).collect();
    finish(path, draw_bars(path, size, title, "Amount ($)", &bars, MONTH_COLOR))
}

pub fn pie_chart(slices: &[PieSlice], title: &str, path: &Path, size: ChartSize) -> Result<()> {
    finish(path, draw_pie(path, size, title, slices))
}

fn finish(path: &Path, result: DrawResult<()>) -> Result<()> {
    result.map_err(|e| SpendError::Chart(format!("{}: {e}", path.display())))?;
    info!("Wrote {}", path.display());
    Ok(())
}

/// Write the whole walkthrough as numbered SVG files and return their paths.
pub fn render_exploration(ex: &Exploration, out_dir: &Path, size: ChartSize) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)?;
    let file = |name: &str| out_dir.join(name);
    let mut written = Vec::new();

    let path = file("01-histogram-all.svg");
    histogram(&ex.histogram_all, "Transactions per category (all)", &path, size)?;
    written.push(path);

    let path = file("02-histogram-window.svg");
    let title = format!("Transactions per category ({})", ex.window);
    histogram(&ex.histogram_window, &title, &path, size)?;
    written.push(path);

    let path = file("03-counts-window.svg");
    let title = format!("Most frequent categories ({})", ex.window);
    count_plot(&ex.counts_window, &title, &path, size)?;
    written.push(path);

    let path = file("04-bars-window.svg");
    let title = format!("Spending by category ({})", ex.window);
    bar_chart(&ex.window_bars, &title, &path, size)?;
    written.push(path);

    let path = file("05-pie-window.svg");
    let title = format!("Share of spending ({})", ex.window);
    pie_chart(&ex.window_pie, &title, &path, size)?;
    written.push(path);

    let path = file("06-pie-period.svg");
    pie_chart(&ex.period_pie, "Share of spending (full period)", &path, size)?;
    written.push(path);

    let path = file(&format!("07-monthly-{}.svg", slug(&ex.focus)));
    let title = format!("Monthly {} spending", ex.focus);
    monthly_bar_chart(&ex.monthly_focus, &title, &path, size)?;
    written.push(path);

    Ok(written)
}

/// File-name friendly form of a category, e.g. `Travel/Entertainment` -> `travel-entertainment`.
pub fn slug(name: &str) -> String {
    let mut out = String::new();
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    let trimmed = out.trim_matches('-');
    if trimmed.is_empty() {
        "category".to_string()
    } else {
        trimmed.to_string()
    }
}

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

fn draw_bars(
    path: &Path,
    size: ChartSize,
    title: &str,
    y_desc: &str,
    bars: &[BarDatum],
    color: RGBColor,
) -> DrawResult<()> {
    let root = SVGBackend::new(path, (size.width, size.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let n = bars.len().max(1) as i32;
    let y_max = bars.iter().map(|b| b.value).fold(0.0, f64::max);
    let y_min = bars.iter().map(|b| b.value).fold(0.0, f64::min);
    let y_max = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };
    let y_min = y_min * 1.1;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT, 24))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d((0..n).into_segmented(), y_min..y_max)?;

    let label_for = |v: &SegmentValue<i32>| match v {
        SegmentValue::CenterOf(i) => bars
            .get(*i as usize)
            .map(|b| b.label.clone())
            .unwrap_or_default(),
        _ => String::new(),
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(bars.len().max(1))
        .x_label_formatter(&label_for)
        .x_label_style((FONT, 12))
        .y_desc(y_desc)
        .draw()?;

    chart.draw_series(bars.iter().enumerate().map(|(i, b)| {
        let i = i as i32;
        let mut bar = Rectangle::new(
            [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), b.value)],
            color.filled(),
        );
        bar.set_margin(0, 0, 6, 6);
        bar
    }))?;

    root.present()?;
    Ok(())
}

fn point_at(center: (i32, i32), radius: f64, angle: f64) -> (i32, i32) {
    (
        center.0 + (radius * angle.cos()).round() as i32,
        center.1 - (radius * angle.sin()).round() as i32,
    )
}

fn draw_pie(path: &Path, size: ChartSize, title: &str, slices: &[PieSlice]) -> DrawResult<()> {
    let root = SVGBackend::new(path, (size.width, size.height)).into_drawing_area();
    root.fill(&WHITE)?;
    let area = root.titled(title, (FONT, 24))?;

    let (w, h) = area.dim_in_pixel();
    let center = (w as i32 / 2, h as i32 / 2);
    let radius = f64::from(w.min(h)) * 0.35;
    let centered = TextStyle::from((FONT, 14.0).into_font()).pos(Pos::new(HPos::Center, VPos::Center));

    let total: f64 = slices.iter().map(|s| s.total).sum();
    if slices.is_empty() || total <= 0.0 {
        area.draw(&Text::new("No spending in range", center, centered))?;
        root.present()?;
        return Ok(());
    }

    // Wedges run counter-clockwise from three o'clock
    let mut start = 0.0f64;
    for (i, slice) in slices.iter().enumerate() {
        let sweep = slice.total / total * TAU;
        let steps = ((sweep / TAU) * 180.0).ceil().max(2.0) as usize;
        let mut points = vec![center];
        for k in 0..=steps {
            points.push(point_at(center, radius, start + sweep * k as f64 / steps as f64));
        }
        area.draw(&Polygon::new(points, Palette99::pick(i).filled()))?;

        let mid = start + sweep / 2.0;
        area.draw(&Text::new(
            slice.category.clone(),
            point_at(center, radius * 1.18, mid),
            centered.clone(),
        ))?;
        area.draw(&Text::new(
            slice.label.clone(),
            point_at(center, radius * 0.6, mid),
            centered.clone(),
        ))?;
        start += sweep;
    }

    root.present()?;
    Ok(())
}
