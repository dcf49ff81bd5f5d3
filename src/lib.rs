//! notethisurl library
//!
//! Saves tagged bookmarks to a local JSON file and mirrors that file to a
//! GitHub repository.

pub mod bookmarks;
pub mod commands;
pub mod config;
pub mod prompt;
pub mod remote;
pub mod timezone;
