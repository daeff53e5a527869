use std::io::IsTerminal;
use std::path::PathBuf;

use log::info;

use crate::charts::{render_exploration, ChartSize};
use crate::cli::{explore_options, text, view, InputArgs, OutputMode, WindowArgs};
use crate::error::Result;
use crate::explore::{explore, fingerprint};
use crate::loader::load_transactions;
use crate::settings::load_settings;

pub fn run(
    input: &InputArgs,
    window: &WindowArgs,
    focus: Option<&str>,
    out_dir: Option<PathBuf>,
    mode: Option<OutputMode>,
) -> Result<()> {
    let settings = load_settings();
    let opts = explore_options(input, window, focus, &settings)?;
    let txns = load_transactions(&input.file)?;
    let exploration = explore(&txns, &opts)?;
    let digest = fingerprint(&exploration)?;
    info!("Aggregate fingerprint {digest}");

    let mode = match (mode, &out_dir) {
        (Some(m), _) => m,
        (None, Some(_)) => OutputMode::Export,
        (None, None) if std::io::stdout().is_terminal() => OutputMode::View,
        (None, None) => OutputMode::Text,
    };

    match mode {
        OutputMode::View => {
            view::show(&exploration)?;
            println!("{}", text::format_window_summary(&exploration, &digest));
            Ok(())
        }
        OutputMode::Text => {
            println!("{}", text::format_exploration(&exploration, &digest));
            Ok(())
        }
        OutputMode::Export => {
            let dir = out_dir.unwrap_or_else(|| PathBuf::from(&settings.output_dir));
            let size = ChartSize {
                width: settings.chart_width,
                height: settings.chart_height,
            };
            let written = render_exploration(&exploration, &dir, size)?;
            println!("{}", text::format_exploration(&exploration, &digest));
            println!();
            for path in written {
                println!("Wrote {}", path.display());
            }
            Ok(())
        }
    }
}
