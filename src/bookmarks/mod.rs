//! Bookmark records, their JSON store and the tag index

pub mod model;
pub mod store;
pub mod tags;

pub use model::Bookmark;
pub use store::{BookmarkStore, Collection};
pub use tags::{count_tags, TagCount};
