//! Browse command implementation
//!
//! Loading runs in a background task while the prompt drives navigation.
//! Stories show up as they finish loading; one that never loads stays
//! unreachable.

use crate::cli::BrowseArgs;
use crate::errors::{self, CliError};
use crate::output::OutputWriter;
use crate::progress::{create_spinner, finish_error, finish_success};
use anyhow::Result;
use dialoguer::Select;
use std::sync::{Arc, PoisonError, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use storyline_core::config::LayeredConfig;
use storyline_core::models::MediaKind;
use storyline_core::navigation::{Direction, NavigationState, SharedNavigation};
use storyline_core::ports::{FragmentStore, MemoryFragment};
use storyline_core::StorylineError;
use storyline_loader::LoadSummary;
use tokio::task::JoinHandle;

use super::connect;

type Loading = JoinHandle<std::result::Result<LoadSummary, StorylineError>>;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    NextMedia,
    PrevMedia,
    NextStory,
    PrevStory,
    Jump,
    Open,
    Close,
    Refresh,
    Quit,
}

impl Action {
    fn label(self) -> &'static str {
        match self {
            Action::NextMedia => "Next media",
            Action::PrevMedia => "Previous media",
            Action::NextStory => "Next story",
            Action::PrevStory => "Previous story",
            Action::Jump => "Jump to story...",
            Action::Open => "Open media",
            Action::Close => "Close media",
            Action::Refresh => "Refresh",
            Action::Quit => "Quit",
        }
    }
}

pub async fn execute(args: BrowseArgs, settings: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    if output.is_json() {
        return Err(CliError::new("browse is interactive")
            .with_context("JSON output is not available for browse.")
            .with_suggestion("Use: storyline list --json")
            .with_suggestion("Or: storyline show <ID> --json")
            .into());
    }

    let requested = args.story.clone();
    let fragment = Arc::new(match args.story {
        Some(id) => MemoryFragment::with_value(id),
        None => MemoryFragment::new(),
    });

    let loaders = connect(settings, fragment.clone())?;
    let state = NavigationState::new(fragment.clone()).into_shared();
    let orchestrator = loaders.into_orchestrator(state.clone());
    let mut loading: Option<Loading> = Some(tokio::spawn(async move { orchestrator.run().await }));

    let spinner = create_spinner("Loading stories...");
    loop {
        if loading.as_ref().is_some_and(JoinHandle::is_finished) {
            break;
        }
        if first_story_ready(&read(&state)) {
            break;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }

    if let Some(handle) = take_finished(&mut loading) {
        match handle.await? {
            Ok(summary) => report_failures(&summary, output),
            Err(error) => {
                finish_error(&spinner, "Story list unavailable");
                return Err(errors::from_loader(error));
            }
        }
    }

    if read(&state).is_empty() {
        finish_success(&spinner, "No stories");
        return Ok(());
    }
    finish_success(&spinner, "Ready");

    if let Some(requested) = requested {
        if fragment.read().as_deref() != Some(requested.as_str()) {
            output.warning(format!("Story '{}' not found, showing the newest", requested));
        }
    }

    loop {
        if let Some(handle) = take_finished(&mut loading) {
            match handle.await? {
                Ok(summary) => report_failures(&summary, output),
                Err(error) => output.warning(error),
            }
        }

        render(&read(&state), output);

        let actions = available_actions(&read(&state));
        let labels: Vec<String> = actions.iter().map(|a| a.label().to_string()).collect();
        let action = actions[prompt("Navigate", labels, 0).await?];

        match action {
            Action::Quit => break,
            Action::Jump => {
                let (labels, current) = story_labels(&read(&state));
                let index = prompt("Story", labels, current).await?;

                let mut nav = write(&state);
                if nav.select_story(index) {
                    nav.reset_media_index_except_current();
                } else if nav.is_loading(index) {
                    output.warning("That story is still loading");
                }
            }
            other => {
                if !apply(&mut write(&state), other) {
                    output.warning("Nothing to show there yet");
                }
            }
        }
    }

    let nav = read(&state);
    let viewed = (0..nav.len()).filter(|&i| nav.is_viewed(i)).count();
    output.success(format!("Viewed {} of {} stories", viewed, nav.len()));
    Ok(())
}

fn first_story_ready(nav: &NavigationState) -> bool {
    !nav.is_empty() && !nav.initial_loading()
}

fn take_finished(loading: &mut Option<Loading>) -> Option<Loading> {
    if loading.as_ref().is_some_and(JoinHandle::is_finished) {
        loading.take()
    } else {
        None
    }
}

fn report_failures(summary: &LoadSummary, output: &OutputWriter) {
    if !summary.failed.is_empty() {
        output.warning(format!(
            "{} of {} stories could not be loaded",
            summary.failed.len(),
            summary.total
        ));
    }
}

fn available_actions(nav: &NavigationState) -> Vec<Action> {
    let media = if nav.active_media().is_some() {
        Action::Close
    } else {
        Action::Open
    };
    vec![
        Action::NextMedia,
        Action::PrevMedia,
        Action::NextStory,
        Action::PrevStory,
        media,
        Action::Jump,
        Action::Refresh,
        Action::Quit,
    ]
}

/// Returns whether anything changed
fn apply(nav: &mut NavigationState, action: Action) -> bool {
    match action {
        Action::NextMedia => nav.next_media(),
        Action::PrevMedia => nav.prev_media(),
        Action::NextStory => nav.next_story(),
        Action::PrevStory => nav.prev_story(),
        Action::Open => nav.open_active_media(),
        Action::Close => {
            nav.close_active_media();
            true
        }
        Action::Refresh | Action::Jump | Action::Quit => true,
    }
}

fn story_labels(nav: &NavigationState) -> (Vec<String>, usize) {
    let labels = nav
        .stories()
        .iter()
        .enumerate()
        .map(|(index, story)| {
            let name = story.title().unwrap_or(&story.id);
            let status = if nav.is_loading(index) {
                " (loading)"
            } else if nav.is_viewed(index) {
                " (viewed)"
            } else {
                ""
            };
            format!("{} {}{}", story.formatted_date, name, status)
        })
        .collect();
    (labels, nav.current_story_index())
}

fn render(nav: &NavigationState, output: &OutputWriter) {
    let Some(story) = nav.current_story() else {
        return;
    };

    let arrow = match nav.transition_direction() {
        Direction::Forward => "→",
        Direction::Backward => "←",
    };
    output.section(format!(
        "{} Story {}/{}: {}",
        arrow,
        nav.current_story_index() + 1,
        nav.len(),
        story.title().unwrap_or(&story.id)
    ));
    if !story.formatted_date.is_empty() {
        output.kv("Date", &story.formatted_date);
    }

    match nav.current_detail() {
        None => output.info("Still loading..."),
        Some(detail) => {
            output.kv(
                "Media",
                format!("{}/{}", nav.current_media_index() + 1, detail.media_count()),
            );
            if let Some(media) = nav.current_media() {
                let kind = match media.kind {
                    MediaKind::Photo => "photo",
                    MediaKind::Video => "video",
                };
                output.kv("Source", format!("{} ({})", media.src, kind));
                if let Some(captured) = media.formatted_date().filter(|d| !d.is_empty()) {
                    output.kv("Captured", captured);
                }
            }
            let tracks = detail.stats.iter().filter(|stat| stat.has_path()).count();
            if tracks > 0 {
                output.kv("Tracks", tracks);
            }
        }
    }

    if let Some(active) = nav.active_media() {
        output.kv("Viewing", &active.src);
    }
    output.kv("Loaded", format!("{}/{} stories", nav.loaded_count(), nav.len()));
}

async fn prompt(title: &str, items: Vec<String>, default: usize) -> Result<usize> {
    let title = title.to_string();
    let choice = tokio::task::spawn_blocking(move || {
        Select::new()
            .with_prompt(title)
            .items(&items)
            .default(default)
            .interact()
    })
    .await??;
    Ok(choice)
}

fn read(state: &SharedNavigation) -> RwLockReadGuard<'_, NavigationState> {
    state.read().unwrap_or_else(PoisonError::into_inner)
}

fn write(state: &SharedNavigation) -> RwLockWriteGuard<'_, NavigationState> {
    state.write().unwrap_or_else(PoisonError::into_inner)
}
