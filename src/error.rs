use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "xlsx")]
    #[error("XLSX error: {0}")]
    Xlsx(String),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Line {line}: {reason}")]
    InvalidRow { line: usize, reason: String },

    #[error("Invalid date '{0}' (expected MM/DD/YYYY)")]
    InvalidDate(String),

    #[error("Invalid pattern: {0}")]
    InvalidRegex(#[from] regex::Error),

    #[error("Chart error: {0}")]
    Chart(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, SpendError>;
