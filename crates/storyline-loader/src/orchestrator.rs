use serde::Serialize;
use std::sync::{PoisonError, RwLockReadGuard, RwLockWriteGuard};
use storyline_core::navigation::{NavigationState, SharedNavigation};
use storyline_core::ports::{AssetProbe, StoryApi};
use storyline_core::Result;

use crate::catalog::CatalogLoader;
use crate::detail::DetailLoader;

/// Outcome of a full loading pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub total: usize,
    pub priority: Option<usize>,
    /// Story indices in the order they finished loading
    pub loaded: Vec<usize>,
    /// Story indices whose detail could not be fetched; they stay loading
    pub failed: Vec<usize>,
}

/// Sequences catalog, priority story and remaining stories
pub struct LoadingOrchestrator<A, P> {
    catalog: CatalogLoader<A, P>,
    detail: DetailLoader<A, P>,
    state: SharedNavigation,
}

impl<A, P> LoadingOrchestrator<A, P>
where
    A: StoryApi,
    P: AssetProbe,
{
    pub fn new(catalog: CatalogLoader<A, P>, detail: DetailLoader<A, P>, state: SharedNavigation) -> Self {
        Self {
            catalog,
            detail,
            state,
        }
    }

    pub fn state(&self) -> &SharedNavigation {
        &self.state
    }

    pub fn catalog_loader(&self) -> &CatalogLoader<A, P> {
        &self.catalog
    }

    pub fn detail_loader(&self) -> &DetailLoader<A, P> {
        &self.detail
    }

    /// Load everything: the catalog, then the priority story, then every
    /// other story one at a time in catalog order.
    ///
    /// Only a catalog failure is returned. A story that fails stays flagged
    /// as loading and the pass moves on. Fetches are never cancelled; their
    /// results land in the navigation state even if the user moved elsewhere.
    pub async fn run(&self) -> Result<LoadSummary> {
        let catalog = self.catalog.load().await?;
        let total = catalog.len();

        self.write_state().install_catalog(catalog);
        let priority = self.read_state().priority_index();

        let mut summary = LoadSummary {
            total,
            priority,
            ..LoadSummary::default()
        };

        for index in load_order(total, priority) {
            match self.load_story(index).await {
                Ok(()) => summary.loaded.push(index),
                Err(error) => {
                    tracing::error!(index, %error, "story stays unavailable");
                    summary.failed.push(index);
                }
            }
        }

        tracing::info!(
            total = summary.total,
            loaded = summary.loaded.len(),
            failed = summary.failed.len(),
            "loading finished"
        );
        Ok(summary)
    }

    /// Load one story of the installed catalog and publish it
    pub async fn load_story(&self, index: usize) -> Result<()> {
        let story = self.read_state().story(index).cloned();
        let Some(story) = story else {
            tracing::warn!(index, "no such story, nothing to load");
            return Ok(());
        };

        let detail = self.detail.load(&story).await?;
        self.write_state().complete_story(index, detail);
        Ok(())
    }

    fn read_state(&self) -> RwLockReadGuard<'_, NavigationState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, NavigationState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Priority story first, then every other story in catalog order
pub fn load_order(total: usize, priority: Option<usize>) -> Vec<usize> {
    let priority = priority.filter(|&p| p < total);
    priority
        .into_iter()
        .chain((0..total).filter(|&i| Some(i) != priority))
        .collect()
}
