use std::path::Path;

use chrono::NaiveDate;
use log::{debug, info};

use crate::error::{Result, SpendError};
use crate::models::{RawRow, Transaction};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Header names in the card export, in the order the cleaned table keeps them.
/// `Trans. Date` is renamed to `Date` on selection.
pub const EXPORT_COLUMNS: [&str; 4] = ["Trans. Date", "Description", "Amount", "Category"];

pub fn parse_amount(raw: &str) -> Option<f64> {
    let s = raw.replace([',', '"', '$'], "");
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Some(inner) = s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        return inner.trim().parse::<f64>().ok().filter(|v| v.is_finite()).map(|v| -v);
    }
    // f64's parser also takes NaN and inf, which no ledger amount can be
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn parse_date_mdy(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%m/%d/%Y").ok()
}

/// Parse a user-supplied window bound, e.g. `--from 01/01/2024`.
pub fn parse_bound(raw: &str) -> Result<NaiveDate> {
    parse_date_mdy(raw).ok_or_else(|| SpendError::InvalidDate(raw.to_string()))
}

#[cfg(feature = "xlsx")]
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    // Excel epoch is 1899-12-30 (accounting for the 1900 leap year bug)
    if !serial.is_finite() {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    base.checked_add_signed(chrono::Duration::try_days(serial as i64)?)
}

// ---------------------------------------------------------------------------
// Column selection
// ---------------------------------------------------------------------------

/// Positions of the kept columns within an export header row.
#[derive(Debug, Clone, Copy)]
pub struct ColumnMap {
    date: usize,
    description: usize,
    amount: usize,
    category: usize,
}

impl ColumnMap {
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.as_ref().trim() == name)
                .ok_or_else(|| SpendError::MissingColumn(name.to_string()))
        };
        let [date, description, amount, category] = EXPORT_COLUMNS;
        Ok(Self {
            date: find(date)?,
            description: find(description)?,
            amount: find(amount)?,
            category: find(category)?,
        })
    }

    fn width(&self) -> usize {
        [self.date, self.description, self.amount, self.category]
            .into_iter()
            .max()
            .unwrap_or(0)
            + 1
    }

    /// Project a record onto Date, Description, Amount, Category.
    pub fn select<S: AsRef<str>>(&self, record: &[S]) -> Option<RawRow> {
        if record.len() < self.width() {
            return None;
        }
        let field = |i: usize| record[i].as_ref().trim().to_string();
        Some(RawRow {
            date: field(self.date),
            description: field(self.description),
            amount: field(self.amount),
            category: field(self.category),
        })
    }
}

fn clean_row(raw: RawRow, line: usize) -> Result<Transaction> {
    let date = parse_date_mdy(&raw.date).ok_or_else(|| SpendError::InvalidRow {
        line,
        reason: format!("invalid date '{}'", raw.date),
    })?;
    let amount = parse_amount(&raw.amount).ok_or_else(|| SpendError::InvalidRow {
        line,
        reason: format!("invalid amount '{}'", raw.amount),
    })?;
    Ok(Transaction {
        date,
        description: raw.description,
        amount,
        category: raw.category,
    })
}

fn is_blank<S: AsRef<str>>(record: &[S]) -> bool {
    record.iter().all(|f| f.as_ref().trim().is_empty())
}

// ---------------------------------------------------------------------------
// load_transactions
// ---------------------------------------------------------------------------

/// Load and clean a card export. `.xlsx` files go through calamine, anything
/// else is read as CSV.
pub fn load_transactions(file_path: &Path) -> Result<Vec<Transaction>> {
    let is_xlsx = file_path
        .extension()
        .map_or(false, |e| e.eq_ignore_ascii_case("xlsx"));
    let txns = if is_xlsx {
        load_xlsx(file_path)?
    } else {
        load_csv(file_path)?
    };
    info!("Loaded {} transactions from {}", txns.len(), file_path.display());
    Ok(txns)
}

pub fn load_csv(file_path: &Path) -> Result<Vec<Transaction>> {
    let file = std::fs::File::open(file_path)?;
    read_csv(std::io::BufReader::new(file))
}

pub fn read_csv<R: std::io::Read>(reader: R) -> Result<Vec<Transaction>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let columns = ColumnMap::from_headers(&headers)?;
    debug!("Export columns: {headers:?}");

    let mut txns = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map_or(0, |p| p.line() as usize);
        let fields: Vec<&str> = record.iter().collect();
        if is_blank(&fields) {
            continue;
        }
        let raw = columns.select(&fields).ok_or_else(|| SpendError::InvalidRow {
            line,
            reason: format!("expected at least {} fields, found {}", columns.width(), fields.len()),
        })?;
        txns.push(clean_row(raw, line)?);
    }
    Ok(txns)
}

#[cfg(feature = "xlsx")]
fn load_xlsx(file_path: &Path) -> Result<Vec<Transaction>> {
    use calamine::{Data, Reader};

    let mut workbook = calamine::open_workbook_auto(file_path)
        .map_err(|e| SpendError::Xlsx(format!("Failed to open XLSX: {e}")))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SpendError::Xlsx("workbook has no sheets".to_string()))?
        .map_err(|e| SpendError::Xlsx(e.to_string()))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(|c| c.to_string()).collect(),
        None => return Ok(Vec::new()),
    };
    let columns = ColumnMap::from_headers(&headers)?;

    let mut txns = Vec::new();
    for (i, row) in rows.enumerate() {
        let line = i + 2;
        let fields: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(col, cell)| {
                if col != columns.date {
                    return cell.to_string();
                }
                // Date cells may hold an Excel serial instead of text
                let serial = match cell {
                    Data::Float(f) => Some(*f),
                    Data::Int(n) => Some(*n as f64),
                    Data::DateTime(dt) => Some(dt.as_f64()),
                    _ => None,
                };
                serial
                    .and_then(excel_serial_to_date)
                    .map(|d| d.format("%m/%d/%Y").to_string())
                    .unwrap_or_else(|| cell.to_string())
            })
            .collect();
        if is_blank(&fields) {
            continue;
        }
        let raw = columns.select(&fields).ok_or_else(|| SpendError::InvalidRow {
            line,
            reason: format!("expected at least {} fields, found {}", columns.width(), fields.len()),
        })?;
        txns.push(clean_row(raw, line)?);
    }
    Ok(txns)
}

#[cfg(not(feature = "xlsx"))]
fn load_xlsx(_file_path: &Path) -> Result<Vec<Transaction>> {
    Err(SpendError::Other(
        "XLSX import requires the 'xlsx' feature; build with `cargo build --features xlsx`".into(),
    ))
}

/// First `n` rows of the cleaned table.
pub fn head(txns: &[Transaction], n: usize) -> &[Transaction] {
    &txns[..n.min(txns.len())]
}
