pub mod chart;
pub mod config;
pub mod explore;
pub mod summary;
pub mod text;
pub mod view;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::debug;

use crate::error::Result;
use crate::explore::{check_window, ExploreOptions, Filters};
use crate::loader::{load_transactions, parse_bound};
use crate::models::Transaction;
use crate::settings::Settings;

#[derive(Parser)]
#[command(
    name = "spendscope",
    version,
    about = "Explore a year of credit-card spending by category and by month."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Export file plus the optional cleaning applied before any aggregation.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Card export (CSV or XLSX) with Trans. Date, Description, Amount, Category columns
    pub file: PathBuf,
    /// Keep only these categories (repeatable)
    #[arg(long = "category")]
    pub categories: Vec<String>,
    /// Keep only transactions with an amount at or below this value
    #[arg(long = "max-amount", allow_hyphen_values = true)]
    pub max_amount: Option<f64>,
    /// Keep only transactions whose description matches this regex
    #[arg(long = "match")]
    pub pattern: Option<String>,
}

impl InputArgs {
    pub fn filters(&self) -> Result<Filters> {
        Filters::new(self.categories.clone(), self.max_amount, self.pattern.as_deref())
    }

    /// Load the export and apply the cleaning filters.
    pub fn load(&self) -> Result<Vec<Transaction>> {
        let txns = load_transactions(&self.file)?;
        Ok(self.filters()?.apply(&txns))
    }
}

/// Detail window; both bounds are exclusive.
#[derive(Args, Debug, Clone, Default)]
pub struct WindowArgs {
    /// Window start, exclusive: MM/DD/YYYY (default from settings)
    #[arg(long = "from")]
    pub from_date: Option<String>,
    /// Window end, exclusive: MM/DD/YYYY (default from settings)
    #[arg(long = "to")]
    pub to_date: Option<String>,
}

impl WindowArgs {
    pub fn resolve(&self, settings: &Settings) -> Result<(chrono::NaiveDate, chrono::NaiveDate)> {
        let from = parse_bound(self.from_date.as_deref().unwrap_or(&settings.window_from))?;
        let to = parse_bound(self.to_date.as_deref().unwrap_or(&settings.window_to))?;
        check_window(from, to)?;
        debug!("Window bounds: {from} .. {to}");
        Ok((from, to))
    }
}

pub(crate) fn explore_options(
    input: &InputArgs,
    window: &WindowArgs,
    focus: Option<&str>,
    settings: &Settings,
) -> Result<ExploreOptions> {
    let (from, to) = window.resolve(settings)?;
    let opts = ExploreOptions {
        from,
        to,
        focus: focus.unwrap_or(&settings.focus_category).to_string(),
        filters: input.filters()?,
    };
    opts.validate()?;
    Ok(opts)
}

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
pub enum OutputMode {
    /// Interactive terminal charts
    View,
    /// Plain text tables on stdout
    Text,
    /// SVG charts written to the output directory
    Export,
}

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
pub enum ChartKind {
    /// Transactions per category, in order of first appearance
    Histogram,
    /// Transactions per category, most frequent first
    Counts,
    /// Positive spending per category, largest first
    Bars,
    /// Share of positive spending per category
    Pie,
    /// Monthly spending for the focus category
    Monthly,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full walkthrough: counts, totals, shares and monthly trend.
    Explore {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        window: WindowArgs,
        /// Category to follow month by month (default from settings)
        #[arg(long)]
        focus: Option<String>,
        /// Directory for SVG charts (implies --mode export)
        #[arg(long = "out")]
        out_dir: Option<PathBuf>,
        /// Output mode (default: view on a terminal, text otherwise)
        #[arg(long, value_enum)]
        mode: Option<OutputMode>,
    },
    /// Positive spending per category for the window, with total and shares.
    Summary {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        window: WindowArgs,
        /// Summarize the whole file instead of the window
        #[arg(long)]
        all: bool,
    },
    /// Transaction counts per category, most frequent first.
    Counts {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        window: WindowArgs,
        /// Count the whole file instead of the window
        #[arg(long)]
        all: bool,
    },
    /// Monthly spending for one category.
    Monthly {
        #[command(flatten)]
        input: InputArgs,
        /// Category to follow (default from settings)
        #[arg(long)]
        focus: Option<String>,
    },
    /// Render a single chart to an SVG file.
    Chart {
        /// Chart to draw
        #[arg(value_enum)]
        kind: ChartKind,
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        window: WindowArgs,
        /// Category for the monthly chart (default from settings)
        #[arg(long)]
        focus: Option<String>,
        /// Chart the whole file instead of the window
        #[arg(long)]
        all: bool,
        /// Output SVG path
        #[arg(long)]
        output: PathBuf,
    },
    /// Show or change settings.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the current settings and where they live.
    Show,
    /// Set one value, e.g. `config set focus_category Restaurants`.
    Set {
        /// One of: window_from, window_to, focus_category, output_dir, chart_width, chart_height
        key: String,
        value: String,
    },
}
