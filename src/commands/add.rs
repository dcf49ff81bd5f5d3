//! Add command - Save a bookmark and mirror the file remotely

use anyhow::Result;
use owo_colors::OwoColorize;
use std::path::Path;
use url::Url;

use super::sync;
use crate::bookmarks::{Bookmark, BookmarkStore};
use crate::remote::{RemoteError, SyncOutcome};

/// Execute the add command
///
/// The bookmark is saved locally before `push` runs. A failed push is
/// reported and the local save stands. `remote_filename` names the pushed
/// file in the report.
pub fn execute<F>(
    store: &BookmarkStore,
    remote_filename: &str,
    url: &str,
    tags: &str,
    push: F,
) -> Result<Bookmark>
where
    F: FnOnce(&Path) -> Result<SyncOutcome, RemoteError>,
{
    if Url::parse(url).is_err() {
        eprintln!(
            "{} '{}' does not look like an absolute URL; saving it anyway.",
            "Warning:".yellow(),
            url
        );
    }

    let mut collection = store.load_collection()?;
    let bookmark = Bookmark::new(url, tags);
    collection.push(bookmark.clone());
    store.save_collection(&collection)?;

    let result = push(store.path());
    sync::report(&result, remote_filename);

    println!("Bookmark added: {}", url);
    Ok(bookmark)
}
