use chrono::NaiveDate;
use log::{debug, info};
use regex::Regex;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::analysis::*;
use crate::error::{Result, SpendError};
use crate::loader::head;
use crate::models::{CategoryCount, CategoryTotal, MonthTotal, PieSlice, Transaction};

const PREVIEW_ROWS: usize = 5;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Optional cleaning applied right after load, before any aggregation.
#[derive(Debug, Clone, Default)]
pub struct Filters {
    pub categories: Vec<String>,
    pub max_amount: Option<f64>,
    pub pattern: Option<Regex>,
}

impl Filters {
    pub fn new(categories: Vec<String>, max_amount: Option<f64>, pattern: Option<&str>) -> Result<Self> {
        let pattern = pattern.map(Regex::new).transpose()?;
        Ok(Self {
            categories,
            max_amount,
            pattern,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.max_amount.is_none() && self.pattern.is_none()
    }

    pub fn apply(&self, txns: &[Transaction]) -> Vec<Transaction> {
        let mut out = txns.to_vec();
        if !self.categories.is_empty() {
            out = filter_categories(&out, &self.categories);
        }
        if let Some(max) = self.max_amount {
            out = filter_max_amount(&out, max);
        }
        if let Some(re) = &self.pattern {
            out = filter_description(&out, re);
        }
        if !self.is_empty() {
            debug!("Filters kept {} of {} rows", out.len(), txns.len());
        }
        out
    }
}

#[derive(Debug, Clone)]
pub struct ExploreOptions {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub focus: String,
    pub filters: Filters,
}

/// Both bounds are exclusive, so `from` must fall strictly before `to`.
pub fn check_window(from: NaiveDate, to: NaiveDate) -> Result<()> {
    if from >= to {
        return Err(SpendError::Other(format!(
            "--from ({}) must be before --to ({})",
            from.format("%m/%d/%Y"),
            to.format("%m/%d/%Y")
        )));
    }
    Ok(())
}

impl ExploreOptions {
    pub fn validate(&self) -> Result<()> {
        check_window(self.from, self.to)
    }

    pub fn window_label(&self) -> String {
        format!(
            "{} to {}",
            self.from.format("%m/%d/%Y"),
            self.to.format("%m/%d/%Y")
        )
    }
}

// ---------------------------------------------------------------------------
// Exploration
// ---------------------------------------------------------------------------

/// Every table the walkthrough produces, in the order it produces them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exploration {
    pub window: String,
    pub focus: String,
    pub row_count: usize,
    pub preview: Vec<Transaction>,
    pub histogram_all: Vec<CategoryCount>,
    pub window_rows: usize,
    pub histogram_window: Vec<CategoryCount>,
    pub counts_window: Vec<CategoryCount>,
    /// Positive window totals, largest first.
    pub window_bars: Vec<CategoryTotal>,
    /// Positive window totals, by category name.
    pub window_totals: Vec<CategoryTotal>,
    pub window_total: f64,
    pub window_pie: Vec<PieSlice>,
    pub period_totals: Vec<CategoryTotal>,
    pub period_total: f64,
    pub period_pie: Vec<PieSlice>,
    pub monthly_focus: Vec<MonthTotal>,
}

pub fn explore(txns: &[Transaction], opts: &ExploreOptions) -> Result<Exploration> {
    opts.validate()?;
    let data = opts.filters.apply(txns);

    let window = filter_between(&data, opts.from, opts.to);
    info!(
        "Window {} holds {} of {} transactions",
        opts.window_label(),
        window.len(),
        data.len()
    );

    let window_totals = positive_totals(&category_totals(&window));
    let window_total = grand_total(&window_totals);
    let period_totals = positive_totals(&category_totals(&data));
    let period_total = grand_total(&period_totals);

    let monthly_focus = monthly_totals(&data, &opts.focus);
    if monthly_focus.is_empty() {
        info!("No '{}' transactions to chart by month", opts.focus);
    }

    Ok(Exploration {
        window: opts.window_label(),
        focus: opts.focus.clone(),
        row_count: data.len(),
        preview: head(&data, PREVIEW_ROWS).to_vec(),
        histogram_all: category_histogram(&data),
        window_rows: window.len(),
        histogram_window: category_histogram(&window),
        counts_window: category_counts(&window),
        window_bars: sorted_desc(&window_totals),
        window_pie: pie_slices(&window_totals),
        window_totals,
        window_total,
        period_pie: pie_slices(&period_totals),
        period_totals,
        period_total,
        monthly_focus,
    })
}

/// SHA-256 over the serialized aggregate tables. Equal input gives an equal digest.
pub fn fingerprint(exploration: &Exploration) -> Result<String> {
    let json = serde_json::to_vec(exploration).map_err(|e| SpendError::Other(e.to_string()))?;
    let mut hasher = Sha256::new();
    hasher.update(&json);
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::read_csv;

    const SAMPLE: &str = "\
Trans. Date,Posted Date,Description,Amount,Category
10/05/2023,10/06/2023,CLEMSON GROCERY,60.00,Supermarkets
11/12/2023,11/13/2023,KING SOOPERS,140.00,Supermarkets
12/18/2023,12/19/2023,REI BOULDER,210.00,Merchandise
01/03/2024,01/04/2024,KING SOOPERS,250.00,Supermarkets
01/09/2024,01/10/2024,TARGET,115.00,Merchandise
01/12/2024,01/13/2024,KING SOOPERS,240.00,Supermarkets
01/14/2024,01/15/2024,DENVER AIRPORT PARKING,140.00,Travel/Entertainment
01/20/2024,01/20/2024,INTERNET PAYMENT - THANK YOU,-1000.00,Payments and Credits
01/22/2024,01/23/2024,AMAZON,115.00,Merchandise
01/28/2024,01/29/2024,CINEMA,140.00,Travel/Entertainment
02/01/2024,02/02/2024,KING SOOPERS,90.00,Supermarkets
";

    fn options() -> ExploreOptions {
        ExploreOptions {
            from: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            focus: "Supermarkets".to_string(),
            filters: Filters::default(),
        }
    }

    #[test]
    fn test_explore_window_tables() {
        let txns = read_csv(SAMPLE.as_bytes()).unwrap();
        let ex = explore(&txns, &options()).unwrap();

        assert_eq!(ex.row_count, 11);
        assert_eq!(ex.preview.len(), 5);
        assert_eq!(ex.window_rows, 7);
        assert_eq!(ex.counts_window[0].category, "Supermarkets");
        assert_eq!(ex.counts_window[0].count, 2);

        // Payments are netted out of the window totals
        assert!(ex.window_totals.iter().all(|t| t.category != "Payments and Credits"));
        assert_eq!(ex.window_total, 1000.0);
        let bar_order: Vec<&str> = ex.window_bars.iter().map(|t| t.category.as_str()).collect();
        assert_eq!(bar_order, ["Supermarkets", "Travel/Entertainment", "Merchandise"]);

        let labels: Vec<(&str, &str)> = ex
            .window_pie
            .iter()
            .map(|s| (s.category.as_str(), s.label.as_str()))
            .collect();
        assert_eq!(
            labels,
            [("Merchandise", "23%"), ("Supermarkets", "49%"), ("Travel/Entertainment", "28%")]
        );
    }

    #[test]
    fn test_explore_period_and_monthly() {
        let txns = read_csv(SAMPLE.as_bytes()).unwrap();
        let ex = explore(&txns, &options()).unwrap();

        assert_eq!(ex.period_totals.len(), 3);
        assert_eq!(ex.period_total, 1500.0);
        let months: Vec<String> = ex.monthly_focus.iter().map(|m| m.month.to_string()).collect();
        assert_eq!(months, ["2023-10", "2023-11", "2024-01", "2024-02"]);
        assert_eq!(ex.monthly_focus[2].total, 490.0);
    }

    #[test]
    fn test_explore_is_deterministic() {
        let txns = read_csv(SAMPLE.as_bytes()).unwrap();
        let first = explore(&txns, &options()).unwrap();
        let second = explore(&read_csv(SAMPLE.as_bytes()).unwrap(), &options()).unwrap();
        assert_eq!(first, second);
        assert_eq!(fingerprint(&first).unwrap(), fingerprint(&second).unwrap());
        assert_eq!(fingerprint(&first).unwrap().len(), 64);
    }

    #[test]
    fn test_fingerprint_changes_with_input() {
        let txns = read_csv(SAMPLE.as_bytes()).unwrap();
        let base = explore(&txns, &options()).unwrap();
        let fewer = explore(&txns[1..], &options()).unwrap();
        assert_ne!(fingerprint(&base).unwrap(), fingerprint(&fewer).unwrap());
    }

    #[test]
    fn test_explore_applies_filters_first() {
        let txns = read_csv(SAMPLE.as_bytes()).unwrap();
        let mut opts = options();
        opts.filters = Filters::new(vec!["Merchandise".into()], None, None).unwrap();
        let ex = explore(&txns, &opts).unwrap();
        assert_eq!(ex.row_count, 3);
        assert_eq!(ex.window_total, 230.0);
        assert!(ex.monthly_focus.is_empty());
    }

    #[test]
    fn test_explore_rejects_inverted_window() {
        let txns = read_csv(SAMPLE.as_bytes()).unwrap();
        let mut opts = options();
        std::mem::swap(&mut opts.from, &mut opts.to);
        let err = explore(&txns, &opts).unwrap_err();
        assert!(err.to_string().contains("must be before"), "got: {err}");
    }

    #[test]
    fn test_filters_reject_bad_pattern() {
        let err = Filters::new(Vec::new(), None, Some("(")).unwrap_err();
        assert!(matches!(err, SpendError::InvalidRegex(_)));
    }
}
