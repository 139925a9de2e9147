//! Port trait definitions
//!
//! These traits define the interfaces that adapters must implement.

pub mod fetch;
pub mod fragment;

pub use fetch::{AssetProbe, StoryApi};
pub use fragment::{FragmentStore, MemoryFragment};
