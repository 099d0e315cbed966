use comfy_table::Table;
use voxcast_core::{PresetCatalog, DEFAULT_PRESET};

use crate::error::Result;
use crate::style::Theme;

pub fn execute(theme: &Theme) -> Result<()> {
    let catalog = PresetCatalog::builtin();

    let mut table = Table::new();
    table.set_header(vec![
        "Preset", "Language", "Region", "Pitch (oct)", "Speed", "Robotic",
    ]);
    for name in catalog.names() {
        let preset = catalog.resolve(name);
        table.add_row(vec![
            name.to_string(),
            preset.language.clone(),
            preset.region_variant.clone(),
            format!("{:+.2}", preset.pitch_octaves),
            format!("{:.2}x", preset.speed_factor),
            if preset.robotic { "yes" } else { "no" }.to_string(),
        ]);
    }
    println!("{table}");

    theme.info(&format!(
        "{} presets; unknown names fall back to '{}'",
        catalog.names().len(),
        DEFAULT_PRESET
    ));
    Ok(())
}
