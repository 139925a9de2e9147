//! Asset preloading with process-lifetime deduplication
//!
//! Each distinct URL is probed at most once per [`Preloader`]. A failed probe
//! counts as settled too: it is logged, never retried, and never fails the
//! batch it belongs to.

use futures::future::join_all;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};
use storyline_core::ports::AssetProbe;
use storyline_core::StorylineError;
use tokio::sync::{broadcast, OnceCell};

/// Extensions probed as videos
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "m4v", "mov", "webm"];

const EVENT_CAPACITY: usize = 256;

/// How an asset is warmed up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    Video,
}

impl AssetKind {
    /// Classify by file extension, ignoring query string and fragment
    pub fn from_url(url: &str) -> Self {
        let path = url.split(&['?', '#'][..]).next().unwrap_or(url);
        let file = path.rsplit('/').next().unwrap_or(path);

        match file.rsplit_once('.') {
            Some((_, ext))
                if VIDEO_EXTENSIONS
                    .iter()
                    .any(|video| ext.eq_ignore_ascii_case(video)) =>
            {
                AssetKind::Video
            }
            _ => AssetKind::Image,
        }
    }
}

/// Notification sent for every asset that loaded successfully
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLoaded {
    pub url: String,
    pub kind: AssetKind,
}

/// What a [`Preloader::load`] call did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreloadReport {
    /// Distinct URLs in the request
    pub requested: usize,
    /// Probed by this call and loaded
    pub loaded: usize,
    /// Probed by this call and failed
    pub failed: usize,
    /// Already settled (or being settled) by an earlier call
    pub cached: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Loaded,
    Failed,
}

pub struct Preloader<P> {
    probe: P,
    settled: Mutex<HashMap<String, Arc<OnceCell<Outcome>>>>,
    events: broadcast::Sender<AssetLoaded>,
}

impl<P: AssetProbe> Preloader<P> {
    pub fn new(probe: P) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            probe,
            settled: Mutex::new(HashMap::new()),
            events,
        }
    }

    /// Receive an [`AssetLoaded`] for every asset loaded from now on
    pub fn subscribe(&self) -> broadcast::Receiver<AssetLoaded> {
        self.events.subscribe()
    }

    /// Whether `url` has loaded or failed already
    pub fn is_settled(&self, url: &str) -> bool {
        self.cells()
            .get(url)
            .is_some_and(|cell| cell.initialized())
    }

    /// Resolve once every URL has settled. Overlapping URLs of earlier or
    /// concurrent calls are not probed again.
    pub async fn load(&self, urls: &[String]) -> PreloadReport {
        let mut seen = HashSet::new();
        let distinct: Vec<&str> = urls
            .iter()
            .map(String::as_str)
            .filter(|url| seen.insert(*url))
            .collect();

        let outcomes = join_all(distinct.iter().map(|url| self.settle(url))).await;

        let mut report = PreloadReport {
            requested: distinct.len(),
            ..PreloadReport::default()
        };
        for (probed, outcome) in outcomes {
            match (probed, outcome) {
                (false, _) => report.cached += 1,
                (true, Outcome::Loaded) => report.loaded += 1,
                (true, Outcome::Failed) => report.failed += 1,
            }
        }

        tracing::debug!(
            requested = report.requested,
            loaded = report.loaded,
            failed = report.failed,
            cached = report.cached,
            "preload settled"
        );
        report
    }

    async fn settle(&self, url: &str) -> (bool, Outcome) {
        let cell = self
            .cells()
            .entry(url.to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone();

        let mut probed = false;
        let flag = &mut probed;
        let outcome = *cell
            .get_or_init(move || async move {
                *flag = true;
                self.probe_asset(url).await
            })
            .await;

        (probed, outcome)
    }

    async fn probe_asset(&self, url: &str) -> Outcome {
        let kind = AssetKind::from_url(url);
        let result = match kind {
            AssetKind::Image => self.probe.probe_image(url).await,
            AssetKind::Video => self.probe.probe_video(url).await,
        };

        match result {
            Ok(()) => {
                tracing::trace!(url, ?kind, "asset loaded");
                // no subscribers is fine
                let _ = self.events.send(AssetLoaded {
                    url: url.to_string(),
                    kind,
                });
                Outcome::Loaded
            }
            Err(source) => {
                let error = StorylineError::AssetLoad {
                    url: url.to_string(),
                    reason: source.to_string(),
                };
                tracing::warn!(%error, "could not preload asset");
                Outcome::Failed
            }
        }
    }

    fn cells(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<OnceCell<Outcome>>>> {
        self.settled.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
