//! Navigation state of the viewer
//!
//! Single source of truth for "where is the user now" and "what has loaded".
//! Every operation is synchronous. Navigation towards a story that is still
//! loading is suppressed rather than reported as an error.

use serde::Serialize;
use std::fmt;
use std::sync::{Arc, RwLock};

use crate::models::{Catalog, Media, Story, StoryDetail};
use crate::ports::FragmentStore;

/// Navigation state shared between the loading orchestrator and the front end
pub type SharedNavigation = Arc<RwLock<NavigationState>>;

/// Direction of the last transition, used by the front end to pick an animation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    /// `+1` for forward, `-1` for backward
    pub fn sign(self) -> i8 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

pub struct NavigationState {
    stories: Vec<Story>,
    details: Vec<Option<StoryDetail>>,
    current_story_index: usize,
    media_index_per_story: Vec<usize>,
    transition_direction: Direction,
    stories_loading: Vec<bool>,
    story_viewed: Vec<bool>,
    initial_loading: bool,
    priority_index: Option<usize>,
    active_media: Option<Media>,
    fragment: Arc<dyn FragmentStore>,
}

impl NavigationState {
    /// Empty state, waiting for a catalog
    pub fn new(fragment: Arc<dyn FragmentStore>) -> Self {
        Self {
            stories: Vec::new(),
            details: Vec::new(),
            current_story_index: 0,
            media_index_per_story: Vec::new(),
            transition_direction: Direction::Forward,
            stories_loading: Vec::new(),
            story_viewed: Vec::new(),
            initial_loading: true,
            priority_index: None,
            active_media: None,
            fragment,
        }
    }

    /// Wrap into the shared handle used by the loaders
    pub fn into_shared(self) -> SharedNavigation {
        Arc::new(RwLock::new(self))
    }

    /// Replace the story list. Every story starts out loading and the
    /// priority story becomes the current one.
    pub fn install_catalog(&mut self, catalog: Catalog) {
        let count = catalog.stories.len();
        let priority = catalog
            .priority
            .filter(|&p| p < count)
            .or(if count > 0 { Some(0) } else { None });

        self.stories = catalog.stories;
        self.details = vec![None; count];
        self.media_index_per_story = vec![0; count];
        self.stories_loading = vec![true; count];
        self.story_viewed = vec![false; count];
        self.current_story_index = priority.unwrap_or(0);
        self.priority_index = priority;
        self.transition_direction = Direction::Forward;
        self.initial_loading = count > 0;
        self.active_media = None;

        if let Some(p) = priority {
            self.story_viewed[p] = true;
        }

        tracing::debug!(stories = count, priority = ?priority, "catalog installed");
    }

    /// Publish a loaded story. Clears the initial loading flag once the
    /// priority story is in.
    pub fn complete_story(&mut self, index: usize, detail: StoryDetail) -> bool {
        if index >= self.stories.len() {
            tracing::warn!(index, stories = self.stories.len(), "ignoring detail for unknown story");
            return false;
        }

        let last = detail.medias.len().saturating_sub(1);
        self.media_index_per_story[index] = self.media_index_per_story[index].min(last);
        self.details[index] = Some(detail);
        self.stories_loading[index] = false;

        if self.priority_index == Some(index) {
            self.initial_loading = false;
        }

        tracing::debug!(index, story_id = %self.stories[index].id, "story ready");
        true
    }

    /// Jump to a story. No-op when it is already current, out of range, or
    /// still loading. Returns whether the state changed.
    pub fn select_story(&mut self, index: usize) -> bool {
        if index >= self.stories.len()
            || index == self.current_story_index
            || self.is_loading(index)
        {
            return false;
        }

        self.go_to_story(index, true);
        true
    }

    pub fn next_story(&mut self) -> bool {
        let next = self.current_story_index + 1;
        if next >= self.stories.len() {
            return false;
        }
        self.select_story(next)
    }

    pub fn prev_story(&mut self) -> bool {
        match self.current_story_index.checked_sub(1) {
            Some(prev) => self.select_story(prev),
            None => false,
        }
    }

    /// Step to the next media; past the last one, move on to the next story
    pub fn next_media(&mut self) -> bool {
        let current = self.current_story_index;
        let Some(count) = self.loaded_media_count(current) else {
            return false;
        };

        let index = self.media_index_per_story[current];
        if index + 1 < count {
            self.media_index_per_story[current] = index + 1;
            self.transition_direction = Direction::Forward;
            self.active_media = None;
            true
        } else {
            self.next_story()
        }
    }

    /// Step to the previous media; before the first one, move back to the
    /// previous story where the user left it
    pub fn prev_media(&mut self) -> bool {
        let current = self.current_story_index;
        if self.loaded_media_count(current).is_none() {
            return false;
        }

        let index = self.media_index_per_story[current];
        if index > 0 {
            self.media_index_per_story[current] = index - 1;
            self.transition_direction = Direction::Backward;
            self.active_media = None;
            return true;
        }

        match current.checked_sub(1) {
            Some(prev) if !self.is_loading(prev) => {
                self.go_to_story(prev, false);
                true
            }
            _ => false,
        }
    }

    /// Forget the media position of every story but the current one
    pub fn reset_media_index_except_current(&mut self) {
        let current = self.current_story_index;
        for (i, index) in self.media_index_per_story.iter_mut().enumerate() {
            if i != current {
                *index = 0;
            }
        }
    }

    /// Show the current media full screen
    pub fn open_active_media(&mut self) -> bool {
        match self.current_media().cloned() {
            Some(media) => {
                self.active_media = Some(media);
                true
            }
            None => false,
        }
    }

    pub fn close_active_media(&mut self) {
        self.active_media = None;
    }

    fn go_to_story(&mut self, index: usize, reset_media: bool) {
        self.transition_direction = if index > self.current_story_index {
            Direction::Forward
        } else {
            Direction::Backward
        };
        if reset_media {
            self.media_index_per_story[index] = 0;
        }
        self.current_story_index = index;
        self.story_viewed[index] = true;
        self.active_media = None;

        let id = &self.stories[index].id;
        self.fragment.write(id);
        tracing::debug!(index, story_id = %id, direction = ?self.transition_direction, "story selected");
    }

    fn loaded_media_count(&self, index: usize) -> Option<usize> {
        if self.is_loading(index) {
            return None;
        }
        self.detail(index).map(StoryDetail::media_count)
    }

    pub fn stories(&self) -> &[Story] {
        &self.stories
    }

    pub fn story(&self, index: usize) -> Option<&Story> {
        self.stories.get(index)
    }

    pub fn len(&self) -> usize {
        self.stories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }

    pub fn current_story_index(&self) -> usize {
        self.current_story_index
    }

    pub fn current_story(&self) -> Option<&Story> {
        self.stories.get(self.current_story_index)
    }

    pub fn detail(&self, index: usize) -> Option<&StoryDetail> {
        self.details.get(index).and_then(Option::as_ref)
    }

    pub fn current_detail(&self) -> Option<&StoryDetail> {
        self.detail(self.current_story_index)
    }

    /// Media position of a story; 0 for stories never visited
    pub fn media_index(&self, index: usize) -> usize {
        self.media_index_per_story.get(index).copied().unwrap_or(0)
    }

    pub fn current_media_index(&self) -> usize {
        self.media_index(self.current_story_index)
    }

    pub fn current_media(&self) -> Option<&Media> {
        self.current_detail()
            .and_then(|d| d.medias.get(self.current_media_index()))
    }

    pub fn transition_direction(&self) -> Direction {
        self.transition_direction
    }

    pub fn is_loading(&self, index: usize) -> bool {
        self.stories_loading.get(index).copied().unwrap_or(false)
    }

    pub fn is_viewed(&self, index: usize) -> bool {
        self.story_viewed.get(index).copied().unwrap_or(false)
    }

    /// True until the priority story has loaded
    pub fn initial_loading(&self) -> bool {
        self.initial_loading
    }

    pub fn priority_index(&self) -> Option<usize> {
        self.priority_index
    }

    pub fn active_media(&self) -> Option<&Media> {
        self.active_media.as_ref()
    }

    pub fn loaded_count(&self) -> usize {
        self.stories_loading.iter().filter(|loading| !**loading).count()
    }
}

impl fmt::Debug for NavigationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationState")
            .field("stories", &self.stories.len())
            .field("current_story_index", &self.current_story_index)
            .field("media_index_per_story", &self.media_index_per_story)
            .field("transition_direction", &self.transition_direction)
            .field("stories_loading", &self.stories_loading)
            .field("story_viewed", &self.story_viewed)
            .field("initial_loading", &self.initial_loading)
            .finish_non_exhaustive()
    }
}
