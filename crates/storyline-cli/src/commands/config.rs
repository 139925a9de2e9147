//! Config command implementation

use crate::output::OutputWriter;
use crate::output_types::ConfigRow;
use anyhow::Result;
use storyline_core::config::LayeredConfig;

pub fn execute(settings: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let mut rows: Vec<ConfigRow> = settings
        .to_inspection_map()
        .into_iter()
        .map(|(key, (value, source))| ConfigRow::new(key, value, source))
        .collect();
    rows.sort_by(|a, b| a.key.cmp(&b.key));

    if output.is_json() {
        output.result(rows)?;
    } else {
        output.section("Configuration");
        output.table(rows);
        if settings.api_url.value.is_none() {
            output.warning("api_url is not set; pass --api-url or set STORYLINE_API_URL");
        }
    }

    Ok(())
}
