//! JSON file persistence for the bookmark collection
//!
//! The whole collection is read for every command and rewritten on every
//! change. There is no locking; one process at a time is assumed.

use anyhow::{bail, Context, Result};
use log::debug;
use owo_colors::OwoColorize;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use super::Bookmark;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
enum Record {
    Bookmark(Bookmark),
    /// Did not decode as a bookmark; written back exactly as read
    Unreadable(Value),
}

/// Every record of a bookmark file, in file order
///
/// Records that fail to decode are carried along untouched so that saving
/// after an append never drops them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    records: Vec<Record>,
}

impl Collection {
    /// Decoded bookmarks, in file order
    pub fn bookmarks(&self) -> Vec<Bookmark> {
        self.records
            .iter()
            .filter_map(|record| match record {
                Record::Bookmark(bookmark) => Some(bookmark.clone()),
                Record::Unreadable(_) => None,
            })
            .collect()
    }

    pub fn push(&mut self, bookmark: Bookmark) {
        self.records.push(Record::Bookmark(bookmark));
    }

    /// Number of records that could not be decoded
    pub fn unreadable(&self) -> usize {
        self.records
            .iter()
            .filter(|record| matches!(record, Record::Unreadable(_)))
            .count()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<Bookmark>> for Collection {
    fn from(bookmarks: Vec<Bookmark>) -> Self {
        Self {
            records: bookmarks.into_iter().map(Record::Bookmark).collect(),
        }
    }
}

/// Bookmark collection stored as a JSON array
pub struct BookmarkStore {
    path: PathBuf,
}

impl BookmarkStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the decoded bookmarks in insertion order
    pub fn load(&self) -> Result<Vec<Bookmark>> {
        Ok(self.load_collection()?.bookmarks())
    }

    /// Load every record, including ones that do not decode
    ///
    /// A missing, blank or non-JSON file yields an empty collection; the
    /// non-JSON case prints a warning. Records that fail to decode are kept
    /// and reported. A JSON document that is not an array is an error, so
    /// the file is never overwritten with a fresh list.
    pub fn load_collection(&self) -> Result<Collection> {
        if !self.path.exists() {
            debug!("No bookmark file at {}", self.path.display());
            return Ok(Collection::default());
        }

        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read: {}", self.path.display()))?;
        if data.trim().is_empty() {
            return Ok(Collection::default());
        }

        let document: Value = match serde_json::from_str(&data) {
            Ok(document) => document,
            Err(e) => {
                eprintln!(
                    "{} {} is not a valid bookmark file ({}). Starting with an empty list.",
                    "Warning:".yellow(),
                    self.path.display(),
                    e
                );
                return Ok(Collection::default());
            }
        };
        let Value::Array(items) = document else {
            bail!(
                "{} holds JSON that is not a list of bookmarks; fix or move it first",
                self.path.display()
            );
        };

        let records = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match Bookmark::deserialize(&item) {
                Ok(bookmark) => Record::Bookmark(bookmark),
                Err(e) => {
                    eprintln!(
                        "{} record {} in {} is not a valid bookmark ({}). It is kept but not shown.",
                        "Warning:".yellow(),
                        index + 1,
                        self.path.display(),
                        e
                    );
                    Record::Unreadable(item)
                }
            })
            .collect();
        Ok(Collection { records })
    }

    /// Overwrite the file with `bookmarks` only
    pub fn save(&self, bookmarks: &[Bookmark]) -> Result<()> {
        self.save_collection(&Collection::from(bookmarks.to_vec()))
    }

    /// Overwrite the file with every record of `collection`
    pub fn save_collection(&self, collection: &Collection) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create: {}", parent.display()))?;
        }
        let data = serde_json::to_string_pretty(&collection.records)
            .context("Failed to serialize bookmarks")?;
        fs::write(&self.path, data)
            .with_context(|| format!("Failed to write: {}", self.path.display()))?;
        debug!("Saved {} record(s) to {}", collection.len(), self.path.display());
        Ok(())
    }
}
