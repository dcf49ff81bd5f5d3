//! Application paths and the config file
//!
//! The config lives at `~/.nhn/notethisurl/config.json` unless another
//! directory is given on the command line. The bookmark file sits next to it.

use anyhow::{bail, Context, Result};
use log::{debug, info};
use owo_colors::OwoColorize;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

use crate::prompt::Prompt;
use crate::remote::RepoId;
use crate::timezone::{Zone, DEFAULT_TIMEZONE};

/// Bookmark filename used when none is configured
pub const DEFAULT_FILENAME: &str = "bookmarks.json";

const CONFIG_FILENAME: &str = "config.json";

const KEY_TOKEN: &str = "GITHUB_TOKEN";
const KEY_REPO: &str = "GITHUB_REPO";
const KEY_FILENAME: &str = "FILENAME";
const KEY_TIMEZONE: &str = "TIMEZONE";

/// Invalid answers tolerated per question before setup gives up
const MAX_ATTEMPTS: usize = 5;

/// Get the default config directory (~/.nhn/notethisurl/)
pub fn default_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".nhn").join("notethisurl"))
}

/// Locations of the files the tool reads and writes
#[derive(Debug, Clone)]
pub struct AppPaths {
    config_dir: PathBuf,
}

impl AppPaths {
    pub fn new(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Use `override_dir` if given, the default directory otherwise
    pub fn resolve(override_dir: Option<PathBuf>) -> Result<Self> {
        let config_dir = match override_dir {
            Some(dir) => dir,
            None => default_config_dir()?,
        };
        debug!("Using config directory {}", config_dir.display());
        Ok(Self::new(config_dir))
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILENAME)
    }

    /// The local bookmark file; `ConfigStore::load` keeps `filename` relative
    pub fn bookmarks_file(&self, config: &Config) -> PathBuf {
        self.config_dir.join(&config.filename)
    }
}

/// Check that a bookmark filename stays inside the config directory
///
/// Subdirectories are fine (`links/bookmarks.json`); absolute paths and
/// `..` components are not.
pub fn check_filename(filename: &str) -> Result<(), String> {
    let path = Path::new(filename);
    let relative = path
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if relative && path.file_name().is_some() {
        Ok(())
    } else {
        Err(format!(
            "Invalid filename '{}': use a relative path without '..'.",
            filename
        ))
    }
}

/// Complete configuration, every field present
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// GitHub personal access token
    pub token: String,
    /// Repository in `owner/name` form
    pub repo: String,
    /// Bookmark filename, both locally and in the repository
    pub filename: String,
    /// Display timezone for `urls`
    pub timezone: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("repo", &self.repo)
            .field("filename", &self.filename)
            .field("timezone", &self.timezone)
            .finish()
    }
}

/// Config errors callers may want to tell apart
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No configuration found at {}. Run `notethisurl setup` to create one.", .path.display())]
    Missing { path: PathBuf },

    #[error(
        "Configuration at {} is missing: {}. Run `notethisurl setup` to complete it.",
        .path.display(),
        .missing.join(", ")
    )]
    Incomplete {
        path: PathBuf,
        missing: Vec<&'static str>,
    },

    #[error(
        "Configuration at {} has an unusable FILENAME. {reason} Run `notethisurl setup` to fix it.",
        .path.display()
    )]
    InvalidFilename { path: PathBuf, reason: String },

    #[error("Failed to parse configuration {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to read configuration {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
}

/// Config file contents as stored, possibly incomplete
///
/// Keys other than the four known ones are kept so a rewrite does not drop
/// them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawConfig {
    #[serde(rename = "GITHUB_TOKEN", default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,

    #[serde(rename = "GITHUB_REPO", default, skip_serializing_if = "Option::is_none")]
    repo: Option<String>,

    #[serde(rename = "FILENAME", default, skip_serializing_if = "Option::is_none")]
    filename: Option<String>,

    #[serde(rename = "TIMEZONE", default, skip_serializing_if = "Option::is_none")]
    timezone: Option<String>,

    #[serde(flatten)]
    extra: Map<String, Value>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl RawConfig {
    fn missing_keys(&self) -> Vec<&'static str> {
        [
            (KEY_TOKEN, &self.token),
            (KEY_REPO, &self.repo),
            (KEY_FILENAME, &self.filename),
            (KEY_TIMEZONE, &self.timezone),
        ]
        .into_iter()
        .filter(|(_, value)| present(value).is_none())
        .map(|(key, _)| key)
        .collect()
    }

    fn to_config(&self) -> Option<Config> {
        Some(Config {
            token: present(&self.token)?.to_string(),
            repo: present(&self.repo)?.to_string(),
            filename: present(&self.filename)?.to_string(),
            timezone: present(&self.timezone)?.to_string(),
        })
    }
}

/// Reads, validates and (re)writes the config file
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load a complete configuration
    pub fn load(&self) -> Result<Config, ConfigError> {
        let raw = self.read_raw()?.ok_or_else(|| ConfigError::Missing {
            path: self.path.clone(),
        })?;
        let config = raw.to_config().ok_or_else(|| ConfigError::Incomplete {
            path: self.path.clone(),
            missing: raw.missing_keys(),
        })?;
        check_filename(&config.filename).map_err(|reason| ConfigError::InvalidFilename {
            path: self.path.clone(),
            reason,
        })?;
        Ok(config)
    }

    /// Make sure a usable config exists, prompting when needed
    ///
    /// Returns whether the file was written. A valid config is left alone
    /// unless `force_setup` is set. An incomplete one is only rewritten if the
    /// user agrees.
    pub fn initialize(&self, force_setup: bool, prompt: &mut dyn Prompt) -> Result<bool> {
        let existing = match self.read_raw() {
            Ok(raw) => raw,
            Err(ConfigError::Parse { path, source }) => {
                eprintln!(
                    "{} {} is not valid JSON ({}).",
                    "Warning:".yellow(),
                    path.display(),
                    source
                );
                Some(RawConfig::default())
            }
            Err(e) => return Err(e.into()),
        };

        let raw = match existing {
            None => {
                println!("No configuration found. Let's create one.");
                prompt_fields(prompt, RawConfig::default())?
            }
            Some(raw) if force_setup => prompt_fields(prompt, raw)?,
            Some(raw) => {
                let missing = raw.missing_keys();
                if missing.is_empty() {
                    return Ok(false);
                }

                eprintln!(
                    "{} configuration at {} is missing: {}",
                    "Warning:".yellow(),
                    self.path.display(),
                    missing.join(", ")
                );
                if !prompt.confirm("Update the configuration now?")? {
                    println!("Configuration left unchanged.");
                    return Ok(false);
                }
                prompt_fields(prompt, raw)?
            }
        };

        self.write_raw(&raw)?;
        println!("{} {}", "Saved configuration:".green(), self.path.display());
        Ok(true)
    }

    fn read_raw(&self) -> Result<Option<RawConfig>, ConfigError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    fn write_raw(&self, raw: &RawConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create: {}", parent.display()))?;
                info!("Created directory {}", parent.display());
            }
        }
        let content = serde_json::to_string_pretty(raw).context("Failed to serialize config")?;
        fs::write(&self.path, content + "\n")
            .with_context(|| format!("Failed to write: {}", self.path.display()))?;
        Ok(())
    }
}

/// Ask for every field, offering current values as defaults
fn prompt_fields(prompt: &mut dyn Prompt, mut raw: RawConfig) -> Result<RawConfig> {
    let current_token = present(&raw.token).map(str::to_string);
    let token = ask_token(prompt, current_token)?;

    let current_repo = present(&raw.repo).map(str::to_string);
    let repo = ask_valid(
        prompt,
        "GitHub repository (owner/name)",
        current_repo.as_deref(),
        |answer| answer.parse::<RepoId>().map(|repo| repo.to_string()),
    )?;

    let current_timezone = present(&raw.timezone).unwrap_or(DEFAULT_TIMEZONE).to_string();
    let timezone = ask_valid(prompt, "Timezone", Some(&current_timezone), |answer| {
        answer
            .parse::<Zone>()
            .map(|_| answer.to_string())
            .map_err(|e| e.to_string())
    })?;

    let current_filename = present(&raw.filename).unwrap_or(DEFAULT_FILENAME).to_string();
    let filename = ask_valid(prompt, "Bookmarks filename", Some(&current_filename), |answer| {
        check_filename(answer).map(|()| answer.to_string())
    })?;

    raw.token = Some(token);
    raw.repo = Some(repo);
    raw.timezone = Some(timezone);
    raw.filename = Some(filename);
    Ok(raw)
}

fn ask_token(prompt: &mut dyn Prompt, current: Option<String>) -> Result<String> {
    for _ in 0..MAX_ATTEMPTS {
        match prompt.ask_secret("GitHub personal access token", current.is_some())? {
            Some(token) => return Ok(token),
            None => match &current {
                Some(token) => return Ok(token.clone()),
                None => eprintln!("A token is required."),
            },
        }
    }
    bail!("No token given after {} attempts", MAX_ATTEMPTS)
}

/// Ask until `parse` accepts the answer, up to `MAX_ATTEMPTS` times
fn ask_valid<T>(
    prompt: &mut dyn Prompt,
    question: &str,
    default: Option<&str>,
    parse: impl Fn(&str) -> Result<T, String>,
) -> Result<T> {
    for _ in 0..MAX_ATTEMPTS {
        let answer = prompt.ask(question, default)?;
        match parse(&answer) {
            Ok(value) => return Ok(value),
            Err(e) => eprintln!("{}", e),
        }
    }
    bail!("No valid answer for '{}' after {} attempts", question, MAX_ATTEMPTS)
}
