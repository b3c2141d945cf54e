pub mod analysis;
pub mod commands;
pub mod models;

use std::path::Path;

/// Headless entry point: load a data directory, build the initial dataset
/// for the default mode, and emit the chart view-model as JSON on stdout.
/// The interactive frontend drives the same command layer through its own
/// event loop.
pub fn run(data_dir: &Path) -> Result<(), String> {
    let mut state = commands::data::open_data_dir(data_dir)?;
    let mut rng = rand::rng();

    commands::data::regenerate(&mut state, &mut rng)?;
    let view = commands::chart::build_chart_view(&state)?;

    let json = serde_json::to_string_pretty(&view)
        .map_err(|e| format!("Failed to serialize chart view: {e}"))?;
    println!("{json}");

    Ok(())
}
