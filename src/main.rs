//! notethisurl: save bookmarks to a JSON file mirrored on GitHub

use anyhow::Result;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::path::PathBuf;

use notethisurl::bookmarks::BookmarkStore;
use notethisurl::commands;
use notethisurl::config::{AppPaths, Config, ConfigStore};
use notethisurl::prompt::StdinPrompt;

#[derive(Parser)]
#[command(name = "notethisurl")]
#[command(about = "Manage bookmarks saved to a GitHub-hosted JSON file", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding config.json and the bookmark file
    #[arg(long, global = true, env = "NOTETHISURL_DIR", value_name = "DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new bookmark
    Add {
        /// URL to save
        url: String,

        /// Comma-separated tags for the URL
        #[arg(long, default_value = "")]
        tags: String,
    },

    /// List tags sorted by frequency
    Tags,

    /// List URLs in a table
    Urls {
        /// Only show bookmarks with this tag
        #[arg(long)]
        tag: Option<String>,
    },

    /// Create or rewrite the configuration
    Setup,

    /// Push the bookmark file to GitHub without adding anything
    Sync,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let paths = AppPaths::resolve(cli.config_dir)?;
    let config_store = ConfigStore::new(paths.config_file());
    let mut prompt = StdinPrompt;

    match cli.command {
        Commands::Setup => {
            commands::setup::execute(&config_store, &mut prompt)?;
        }

        Commands::Add { url, tags } => {
            let (config, store) = open(&paths, &config_store, &mut prompt)?;
            commands::add::execute(&store, &config.filename, &url, &tags, |path| {
                commands::sync::push_configured(&config, path)
            })?;
        }

        Commands::Tags => {
            let (_, store) = open(&paths, &config_store, &mut prompt)?;
            let bookmarks = store.load()?;
            println!("{}", commands::tags::execute(&bookmarks));
        }

        Commands::Urls { tag } => {
            let (config, store) = open(&paths, &config_store, &mut prompt)?;
            let bookmarks = store.load()?;
            let rendered = commands::urls::execute(&bookmarks, &config.timezone, tag.as_deref());
            if let Some(warning) = rendered.warning {
                eprintln!("{} {}", "Warning:".yellow(), warning);
            }
            println!("{}", rendered.table);
        }

        Commands::Sync => {
            let (config, store) = open(&paths, &config_store, &mut prompt)?;
            commands::sync::execute(&config, store.path())?;
        }
    }

    Ok(())
}

/// Make sure a config exists, then open the bookmark file it names
fn open(
    paths: &AppPaths,
    config_store: &ConfigStore,
    prompt: &mut StdinPrompt,
) -> Result<(Config, BookmarkStore)> {
    let config = commands::setup::ensure(config_store, prompt)?;
    let store = BookmarkStore::new(paths.bookmarks_file(&config));
    Ok((config, store))
}
