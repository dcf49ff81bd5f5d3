//! Sync command - Push the bookmark file to the configured repository

use anyhow::Result;
use owo_colors::OwoColorize;
use std::path::Path;

use crate::config::Config;
use crate::remote::{self, GithubClient, RemoteError, RepoId, SyncOutcome};

/// Build the GitHub client described by `config`
pub fn connect(config: &Config) -> Result<GithubClient, RemoteError> {
    let repo: RepoId = config.repo.parse().map_err(RemoteError::Other)?;
    GithubClient::new(&config.token, repo)
}

/// Connect and push `local` to the configured filename
pub fn push_configured(config: &Config, local: &Path) -> Result<SyncOutcome, RemoteError> {
    let client = connect(config)?;
    remote::push(&client, &config.filename, local)
}

/// Print the result of a push; failures are reported, never raised
pub fn report(result: &Result<SyncOutcome, RemoteError>, filename: &str) {
    match result {
        Ok(outcome) => println!("{} {} ({})", "Synced:".green(), filename, outcome),
        Err(e) => eprintln!("{} failed to sync bookmarks: {}", "Warning:".yellow(), e),
    }
}

/// Execute the sync command
pub fn execute(config: &Config, local: &Path) -> Result<()> {
    if !local.exists() {
        println!("Nothing to sync: {} does not exist.", local.display());
        return Ok(());
    }
    let result = push_configured(config, local);
    report(&result, &config.filename);
    Ok(())
}
