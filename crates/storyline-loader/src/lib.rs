//! Storyline Loader - fetching, preloading and load orchestration
//!
//! This crate implements the HTTP adapters for the core ports and the
//! loaders that sequence catalog, story and asset fetches.

pub mod catalog;
pub mod detail;
pub mod http;
pub mod orchestrator;
pub mod preloader;
pub mod probe;
pub mod services;
pub mod urls;

// Re-export main types
pub use catalog::CatalogLoader;
pub use detail::DetailLoader;
pub use http::HttpStoryApi;
pub use orchestrator::{load_order, LoadSummary, LoadingOrchestrator};
pub use preloader::{AssetKind, AssetLoaded, PreloadReport, Preloader};
pub use probe::HttpAssetProbe;
pub use services::HttpLoaders;
pub use urls::MediaUrlBuilder;
