//! List command implementation

use crate::output::OutputWriter;
use crate::output_types::{ListOutput, StoryRow};
use crate::progress::{finish_error, finish_success, PreloadProgress};
use anyhow::Result;
use std::sync::Arc;
use storyline_core::config::LayeredConfig;
use storyline_core::ports::MemoryFragment;

use super::connect;
use crate::errors;

pub async fn execute(settings: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let loaders = connect(settings, Arc::new(MemoryFragment::new()))?;

    let progress = PreloadProgress::start(
        loaders.preloader.subscribe(),
        "Loading stories and covers...",
        output.is_json(),
    );
    let result = loaders.catalog.load().await;
    let (bar, covers) = progress.stop().await;

    let catalog = match result {
        Ok(catalog) => {
            finish_success(
                &bar,
                &format!("Loaded {} stories ({} covers)", catalog.len(), covers),
            );
            catalog
        }
        Err(error) => {
            finish_error(&bar, "Story list unavailable");
            return Err(errors::from_loader(error));
        }
    };

    let rows: Vec<StoryRow> = catalog
        .stories
        .iter()
        .enumerate()
        .map(|(index, story)| StoryRow::new(index, story))
        .collect();

    if output.is_json() {
        output.result(ListOutput {
            total: rows.len(),
            stories: rows,
        })?;
    } else {
        output.section("Stories");
        let total = rows.len();
        output.table(rows);
        if total > 0 {
            output.info("Open one with: storyline show <ID>");
        }
    }

    Ok(())
}
