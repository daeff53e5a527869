use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// A cleaned card transaction: `Trans. Date` renamed to `date`, `Posted Date` dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    pub category: String,
}

/// The four kept export columns, still as text, in output order.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub date: String,
    pub description: String,
    pub amount: String,
    pub category: String,
}

impl RawRow {
    pub const COLUMNS: [&'static str; 4] = ["Date", "Description", "Amount", "Category"];

    #[cfg(test)]
    pub fn fields(&self) -> [&str; 4] {
        [&self.date, &self.description, &self.amount, &self.category]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub category: String,
    pub total: f64,
    pub pct: f64,
    pub label: String,
}

/// Calendar month used as the Month_Year grouping key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthTotal {
    pub month: YearMonth,
    pub total: f64,
}
