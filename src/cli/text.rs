use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::explore::Exploration;
use crate::fmt::money;
use crate::models::{CategoryCount, CategoryTotal, MonthTotal, PieSlice, RawRow, Transaction};

// ---------------------------------------------------------------------------
// Pure formatting functions (tables → String)
// ---------------------------------------------------------------------------

pub fn format_preview(rows: &[Transaction]) -> String {
    let mut table = Table::new();
    table.set_header(RawRow::COLUMNS.to_vec());
    for t in rows {
        let amt = if t.amount < 0.0 {
            money(t.amount).red().to_string()
        } else {
            money(t.amount)
        };
        table.add_row(vec![
            Cell::new(t.date.format("%m/%d/%Y")),
            Cell::new(&t.description),
            Cell::new(amt),
            Cell::new(&t.category),
        ]);
    }
    table.to_string()
}

pub fn format_counts(title: &str, counts: &[CategoryCount]) -> String {
    if counts.is_empty() {
        return format!("{title}\nNo transactions found.");
    }
    let mut table = Table::new();
    table.set_header(vec!["Category", "Count"]);
    for c in counts {
        table.add_row(vec![Cell::new(&c.category), Cell::new(c.count)]);
    }
    format!("{title}\n{table}")
}

pub fn format_totals(title: &str, totals: &[CategoryTotal]) -> String {
    if totals.is_empty() {
        return format!("{title}\nNo spending found.");
    }
    let mut table = Table::new();
    table.set_header(vec!["Category", "Amount"]);
    for t in totals {
        table.add_row(vec![Cell::new(&t.category), Cell::new(money(t.total))]);
    }
    let total: f64 = totals.iter().map(|t| t.total).sum();
    table.add_row(vec![Cell::new("Total".bold()), Cell::new(money(total).bold())]);
    format!("{title}\n{table}")
}

pub fn format_pie(title: &str, slices: &[PieSlice]) -> String {
    if slices.is_empty() {
        return format!("{title}\nNo spending found.");
    }
    let mut table = Table::new();
    table.set_header(vec!["Category", "Amount", "Share"]);
    for s in slices {
        table.add_row(vec![
            Cell::new(&s.category),
            Cell::new(money(s.total)),
            Cell::new(&s.label),
        ]);
    }
    format!("{title}\n{table}")
}

pub fn format_monthly(category: &str, months: &[MonthTotal]) -> String {
    let title = format!("Monthly {category} spending");
    if months.is_empty() {
        return format!("{title}\nNo {category} transactions found.");
    }
    let mut table = Table::new();
    table.set_header(vec!["Month", "Amount"]);
    for m in months {
        table.add_row(vec![Cell::new(m.month), Cell::new(money(m.total))]);
    }
    format!("{title}\n{table}")
}

pub fn format_total_line(label: &str, total: f64) -> String {
    format!("{label}: {}", money(total).bold())
}

/// What stays on the console once the chart deck closes.
pub fn format_window_summary(ex: &Exploration, fingerprint: &str) -> String {
    [
        format_totals(&format!("Spending by category, {}", ex.window), &ex.window_totals),
        format_total_line("Total expenses for the window", ex.window_total),
        format!("Fingerprint: {}", fingerprint.dimmed()),
    ]
    .join("\n\n")
}

/// The full walkthrough as console text, in pipeline order.
pub fn format_exploration(ex: &Exploration, fingerprint: &str) -> String {
    let sections = [
        format!(
            "{} transactions loaded\n{}",
            ex.row_count,
            format_preview(&ex.preview)
        ),
        format_counts("Transactions per category (all)", &ex.histogram_all),
        format_counts(
            &format!("Most frequent categories, {} ({} rows)", ex.window, ex.window_rows),
            &ex.counts_window,
        ),
        format_totals(&format!("Spending by category, {}", ex.window), &ex.window_totals),
        format_total_line("Total expenses for the window", ex.window_total),
        format_pie(&format!("Share of spending, {}", ex.window), &ex.window_pie),
        format_pie("Share of spending, full period", &ex.period_pie),
        format_total_line("Total expenses for the full period", ex.period_total),
        format_monthly(&ex.focus, &ex.monthly_focus),
        format!("Fingerprint: {}", fingerprint.dimmed()),
    ];
    sections.join("\n\n")
}
