use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use regex::Regex;

use crate::fmt::pct_label;
use crate::models::{CategoryCount, CategoryTotal, MonthTotal, PieSlice, Transaction, YearMonth};

// ---------------------------------------------------------------------------
// Row filters
// ---------------------------------------------------------------------------

pub fn filter_categories(txns: &[Transaction], categories: &[String]) -> Vec<Transaction> {
    txns.iter()
        .filter(|t| categories.iter().any(|c| *c == t.category))
        .cloned()
        .collect()
}

pub fn filter_max_amount(txns: &[Transaction], max: f64) -> Vec<Transaction> {
    txns.iter().filter(|t| t.amount <= max).cloned().collect()
}

pub fn filter_description(txns: &[Transaction], pattern: &Regex) -> Vec<Transaction> {
    txns.iter()
        .filter(|t| pattern.is_match(&t.description))
        .cloned()
        .collect()
}

/// Rows with `lower < date < upper`. Both bounds are exclusive.
pub fn filter_between(txns: &[Transaction], lower: NaiveDate, upper: NaiveDate) -> Vec<Transaction> {
    txns.iter()
        .filter(|t| t.date > lower && t.date < upper)
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Counts
// ---------------------------------------------------------------------------

/// Transactions per category, in order of first appearance.
pub fn category_histogram(txns: &[Transaction]) -> Vec<CategoryCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<CategoryCount> = Vec::new();
    for t in txns {
        match index.get(t.category.as_str()) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(&t.category, counts.len());
                counts.push(CategoryCount {
                    category: t.category.clone(),
                    count: 1,
                });
            }
        }
    }
    counts
}

/// Transactions per category, most frequent first. Ties keep first-appearance order.
pub fn category_counts(txns: &[Transaction]) -> Vec<CategoryCount> {
    let mut counts = category_histogram(txns);
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

// ---------------------------------------------------------------------------
// Totals
// ---------------------------------------------------------------------------

/// Sum of amounts per category, sorted by category name.
pub fn category_totals(txns: &[Transaction]) -> Vec<CategoryTotal> {
    let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
    for t in txns {
        *sums.entry(&t.category).or_default() += t.amount;
    }
    sums.into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_string(),
            total,
        })
        .collect()
}

/// Drop categories whose net sum is zero or negative (payments, refunds).
pub fn positive_totals(totals: &[CategoryTotal]) -> Vec<CategoryTotal> {
    totals.iter().filter(|t| t.total > 0.0).cloned().collect()
}

pub fn sorted_desc(totals: &[CategoryTotal]) -> Vec<CategoryTotal> {
    let mut sorted = totals.to_vec();
    sorted.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });
    sorted
}

pub fn grand_total(totals: &[CategoryTotal]) -> f64 {
    totals.iter().map(|t| t.total).sum()
}

/// Share of the grand total per category, labelled to zero decimals.
/// Returns nothing unless the grand total is positive.
pub fn pie_slices(totals: &[CategoryTotal]) -> Vec<PieSlice> {
    let total = grand_total(totals);
    if total <= 0.0 {
        return Vec::new();
    }
    totals
        .iter()
        .map(|t| {
            let pct = t.total / total * 100.0;
            PieSlice {
                category: t.category.clone(),
                total: t.total,
                pct,
                label: pct_label(pct),
            }
        })
        .collect()
}

/// Monthly sums for one category, oldest month first.
pub fn monthly_totals(txns: &[Transaction], category: &str) -> Vec<MonthTotal> {
    let mut sums: BTreeMap<YearMonth, f64> = BTreeMap::new();
    for t in txns.iter().filter(|t| t.category == category) {
        *sums.entry(YearMonth::of(t.date)).or_default() += t.amount;
    }
    sums.into_iter()
        .map(|(month, total)| MonthTotal { month, total })
        .collect()
}
