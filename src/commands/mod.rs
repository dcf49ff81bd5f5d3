//! CLI commands

pub mod add;
pub mod setup;
pub mod sync;
pub mod tags;
pub mod urls;
