use crate::analysis::{
    category_counts, category_totals, filter_between, grand_total, monthly_totals, pie_slices,
    positive_totals,
};
use crate::cli::{text, InputArgs, WindowArgs};
use crate::error::Result;
use crate::models::Transaction;
use crate::settings::load_settings;

/// Rows in the window, or every row with `--all`. Returns the rows and a scope label.
fn scoped(input: &InputArgs, window: &WindowArgs, all: bool) -> Result<(Vec<Transaction>, String)> {
    let settings = load_settings();
    let txns = input.load()?;
    if all {
        return Ok((txns, "full period".to_string()));
    }
    let (from, to) = window.resolve(&settings)?;
    let label = format!(
        "{} to {}",
        from.format("%m/%d/%Y"),
        to.format("%m/%d/%Y")
    );
    Ok((filter_between(&txns, from, to), label))
}

pub fn summary(input: &InputArgs, window: &WindowArgs, all: bool) -> Result<()> {
    let (txns, scope) = scoped(input, window, all)?;
    let totals = positive_totals(&category_totals(&txns));
    println!(
        "{}",
        text::format_totals(&format!("Spending by category, {scope}"), &totals)
    );
    println!();
    println!("{}", text::format_total_line("Total expenses", grand_total(&totals)));
    println!();
    println!(
        "{}",
        text::format_pie(&format!("Share of spending, {scope}"), &pie_slices(&totals))
    );
    Ok(())
}

pub fn counts(input: &InputArgs, window: &WindowArgs, all: bool) -> Result<()> {
    let (txns, scope) = scoped(input, window, all)?;
    println!(
        "{}",
        text::format_counts(&format!("Most frequent categories, {scope}"), &category_counts(&txns))
    );
    Ok(())
}

pub fn monthly(input: &InputArgs, focus: Option<&str>) -> Result<()> {
    let settings = load_settings();
    let category = focus.unwrap_or(&settings.focus_category);
    let txns = input.load()?;
    println!("{}", text::format_monthly(category, &monthly_totals(&txns, category)));
    Ok(())
}
