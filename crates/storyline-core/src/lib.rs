//! Storyline Core - Domain models, navigation state, and configuration
//!
//! This crate contains the core domain logic and port definitions for the Storyline viewer.

pub mod config;
pub mod dates;
pub mod error;
pub mod models;
pub mod navigation;
pub mod ports;
pub mod tracks;

pub use error::{FetchError, Result, StorylineError};
pub use navigation::{Direction, NavigationState, SharedNavigation};
