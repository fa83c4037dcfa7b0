#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod helpers;
pub mod id;
pub mod logging;
pub mod models;
pub mod output;
pub mod similarity;

use anyhow::{Context, Result, anyhow};
use std::path::PathBuf;

use cli::{Cli, Commands, ItemCommands, ListCommands};
use commands::item::NewItem;
use commands::matches::MatchSource;
use config::Config;
use db::Database;
use output::Output;

pub const PANTRY_DIR: &str = ".pantry";
pub const REDIRECT_FILE: &str = "redirect";

/// Finds the `.pantry/` directory by walking up from the current directory.
/// Returns `None` if no `.pantry/` directory is found.
pub fn find_pantry_dir() -> Option<PathBuf> {
    let current_dir = std::env::current_dir().ok()?;
    let mut dir = current_dir.as_path();

    loop {
        let pantry_path = dir.join(PANTRY_DIR);
        if pantry_path.is_dir() {
            return Some(pantry_path);
        }

        dir = dir.parent()?;
    }
}

/// Resolves the final pantry directory, following any redirect file.
/// A redirect file contains a path (absolute or relative) to another `.pantry/` directory,
/// which lets several projects share one set of lists.
pub fn resolve_pantry_dir() -> Option<PathBuf> {
    let pantry_dir = find_pantry_dir()?;
    let redirect_path = pantry_dir.join(REDIRECT_FILE);

    if redirect_path.is_file() {
        let target = std::fs::read_to_string(&redirect_path).ok()?;
        let target = target.trim();

        let target_path = if PathBuf::from(target).is_absolute() {
            PathBuf::from(target)
        } else {
            pantry_dir.parent()?.join(target)
        };

        if target_path.is_dir() {
            tracing::debug!(target = %target_path.display(), "following pantry redirect");
            return Some(target_path);
        }
        tracing::warn!(target = %target_path.display(), "ignoring redirect to missing directory");
    }

    Some(pantry_dir)
}

fn ensure_initialized() -> Result<(Database, Config)> {
    let pantry_dir = resolve_pantry_dir()
        .ok_or_else(|| anyhow!("Pantry not initialized. Run 'pt init' first."))?;

    let config = Config::load(&pantry_dir)?;
    let db = Database::open(&pantry_dir).context("Failed to open database")?;
    Ok((db, config))
}

fn run_list(list_cmd: ListCommands, db: &mut Database) -> Result<()> {
    match list_cmd {
        ListCommands::Create { name, json } => {
            let list = commands::list::create(name, db)?;
            Output::new(json).list_created(&list)
        }
        ListCommands::Ls { json } => {
            let lists = commands::list::list(db);
            Output::new(json).list_overview(&lists)
        }
    }
}

fn run_item(item_cmd: ItemCommands, config: &Config, db: &mut Database) -> Result<()> {
    match item_cmd {
        ItemCommands::Add {
            list_id,
            name,
            quantity,
            unit,
            category,
            json,
        } => {
            let new = NewItem {
                name,
                quantity,
                unit,
                category,
            };
            let result = commands::item::add(&list_id, new, config, db)?;
            Output::new(json).item_added(&result)
        }
        ItemCommands::Ls {
            list_id,
            json,
            verbose,
        } => {
            let items = commands::item::list(&list_id, config, db)?;
            let list = db
                .get_list(&list_id)
                .ok_or_else(|| anyhow!("List not found: {list_id}"))?;
            Output::with_verbose(json, verbose).item_list(&items, list)
        }
        ItemCommands::Buy { item_id, json } => {
            let result = commands::item::buy(&item_id, config, db)?;
            Output::new(json).item_transitioned("Bought item:", &result)
        }
        ItemCommands::Skip { item_id, json } => {
            let result = commands::item::skip(&item_id, config, db)?;
            Output::new(json).item_transitioned("Skipped item:", &result)
        }
        ItemCommands::Restore { item_id, json } => {
            let result = commands::item::restore(&item_id, config, db)?;
            Output::new(json).item_transitioned("Restored item:", &result)
        }
        ItemCommands::Note {
            item_id,
            text,
            json,
        } => {
            let item = commands::item::note(&item_id, text, config, db)?;
            Output::new(json).item_noted(&item)
        }
    }
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { stealth } => commands::init::run(stealth),
        Commands::List(list_cmd) => {
            let (mut db, _config) = ensure_initialized()?;
            run_list(list_cmd, &mut db)
        }
        Commands::Item(item_cmd) => {
            let (mut db, config) = ensure_initialized()?;
            run_item(item_cmd, &config, &mut db)
        }
        Commands::Status {
            list,
            item,
            json,
            concise,
        } => {
            let (db, config) = ensure_initialized()?;
            let result = commands::status::run(list, item, &config, &db)?;
            Output::with_concise(json, concise).status(&result)
        }
        Commands::Summary { list, by, json } => {
            let (db, config) = ensure_initialized()?;
            let summary = commands::summary::run(list, by, &config, &db)?;
            Output::new(json).summary(&summary)
        }
        Commands::Match {
            term,
            list,
            from,
            top,
            json,
        } => {
            let (db, config) = ensure_initialized()?;
            let source = match from {
                Some(path) => MatchSource::File(path),
                None => MatchSource::Items(list),
            };
            let top_n = top.map(cli::top_limit);
            let result = commands::matches::run(term, source, top_n, &config, &db)?;
            Output::new(json).matches(&result)
        }
        Commands::Export { list_id, output } => {
            let (db, config) = ensure_initialized()?;
            let to_file = output.clone();
            let rows = commands::export::run(&list_id, output, &config, &db)?;
            if let Some(path) = to_file {
                Output::new(false).exported(rows, &path)?;
            }
            Ok(())
        }
    }
}
