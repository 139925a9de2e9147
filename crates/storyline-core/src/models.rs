pub mod media;
pub mod stat;
pub mod story;

pub use media::{compare_sequence, sequence_key, Exif, Media, MediaKind, StoryDetail};
pub use stat::Stat;
pub use story::{sort_newest_first, Catalog, Revision, Story};
