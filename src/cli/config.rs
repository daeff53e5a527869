use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::settings::{load_settings, save_settings, settings_path, Settings};

fn settings_table(settings: &Settings) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Key", "Value"]);
    let rows = [
        ("window_from", settings.window_from.clone()),
        ("window_to", settings.window_to.clone()),
        ("focus_category", settings.focus_category.clone()),
        ("output_dir", settings.output_dir.clone()),
        ("chart_width", settings.chart_width.to_string()),
        ("chart_height", settings.chart_height.to_string()),
    ];
    for (key, value) in rows {
        table.add_row(vec![Cell::new(key), Cell::new(value)]);
    }
    table
}

pub fn show() -> Result<()> {
    let settings = load_settings();
    println!("Settings ({})\n{}", settings_path().display(), settings_table(&settings));
    Ok(())
}

pub fn set(key: &str, value: &str) -> Result<()> {
    let mut settings = load_settings();
    settings.set(key, value)?;
    save_settings(&settings)?;
    println!("Set {key} = {value}");
    Ok(())
}
