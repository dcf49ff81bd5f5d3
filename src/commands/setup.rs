//! Setup command - Create or rewrite the configuration

use anyhow::Result;

use crate::config::{Config, ConfigStore};
use crate::prompt::Prompt;

/// Execute the setup command: always prompt for every field
pub fn execute(store: &ConfigStore, prompt: &mut dyn Prompt) -> Result<()> {
    store.initialize(true, prompt)?;
    Ok(())
}

/// Make sure a complete config exists and load it
///
/// Prompts only when the config is missing or incomplete. If the user
/// declines to fix an incomplete config the load error is returned.
pub fn ensure(store: &ConfigStore, prompt: &mut dyn Prompt) -> Result<Config> {
    store.initialize(false, prompt)?;
    Ok(store.load()?)
}
