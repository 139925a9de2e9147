//! Show command implementation

use crate::cli::ShowArgs;
use crate::errors;
use crate::output::OutputWriter;
use crate::output_types::{MediaRow, ShowOutput, TrackRow};
use crate::progress::{finish_error, finish_success, PreloadProgress};
use anyhow::Result;
use std::sync::Arc;
use storyline_core::config::LayeredConfig;
use storyline_core::ports::MemoryFragment;

use super::connect;

pub async fn execute(args: ShowArgs, settings: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let loaders = connect(settings, Arc::new(MemoryFragment::with_value(args.id.clone())))?;

    let catalog = loaders.catalog.load().await.map_err(errors::from_loader)?;
    let Some(story) = catalog.position(&args.id).map(|index| &catalog.stories[index]) else {
        let known: Vec<String> = catalog.stories.iter().map(|s| s.id.clone()).collect();
        return Err(errors::story_not_found(&args.id, &known).into());
    };

    let progress = PreloadProgress::start(
        loaders.preloader.subscribe(),
        &format!("Loading '{}'...", story.id),
        output.is_json(),
    );
    let result = loaders.detail.load(story).await;
    let (bar, medias_loaded) = progress.stop().await;

    let detail = match result {
        Ok(detail) => {
            finish_success(
                &bar,
                &format!("Loaded {} medias ({} preloaded)", detail.media_count(), medias_loaded),
            );
            detail
        }
        Err(error) => {
            finish_error(&bar, "Story unavailable");
            return Err(errors::from_loader(error));
        }
    };

    let medias: Vec<MediaRow> = detail
        .medias
        .iter()
        .enumerate()
        .map(|(index, media)| MediaRow::new(index, media))
        .collect();
    let tracks: Vec<TrackRow> = detail
        .stats
        .iter()
        .enumerate()
        .filter_map(|(index, stat)| TrackRow::new(index, stat))
        .collect();

    if output.is_json() {
        return output.result(ShowOutput {
            story,
            medias,
            tracks,
        });
    }

    output.section(story.title().unwrap_or(&story.id));
    output.kv("ID", &story.id);
    let date = if story.formatted_date.is_empty() {
        "-"
    } else {
        story.formatted_date.as_str()
    };
    output.kv("Date", date);
    output.kv("Medias", detail.media_count());

    output.section("Medias");
    output.table(medias);

    if !tracks.is_empty() {
        output.section("Tracks");
        output.table(tracks);
        if !loaders.detail.map_features() {
            output.info("Tracks were not fetched (map features disabled)");
        }
    }

    Ok(())
}
