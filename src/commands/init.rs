use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::PANTRY_DIR;
use crate::config::Config;
use crate::db::Database;

pub fn run(stealth: bool) -> Result<()> {
    let pantry_dir = PathBuf::from(PANTRY_DIR);

    if pantry_dir.exists() {
        println!("Pantry already initialized in {}", pantry_dir.display());
        return Ok(());
    }

    fs::create_dir_all(&pantry_dir).context("Failed to create .pantry directory")?;
    Config::write_default(&pantry_dir)?;

    Database::open(&pantry_dir)?;

    if stealth {
        add_to_git_exclude(Path::new("."))?;
    }

    println!("Initialized pantry in {}", pantry_dir.display());
    Ok(())
}

/// Adds `.pantry` to git exclusions under `root`.
/// Prefers `.git/info/exclude` if it exists (truly local), otherwise uses `.gitignore`.
/// Returns the file that was written, if any.
pub fn add_to_git_exclude(root: &Path) -> Result<Option<PathBuf>> {
    let exclude_path = root.join(".git/info/exclude");
    let gitignore_path = root.join(".gitignore");

    let target_path = if exclude_path.exists() {
        exclude_path
    } else if gitignore_path.exists() || root.join(".git").is_dir() {
        gitignore_path
    } else {
        // Not a git repo
        return Ok(None);
    };

    let content = fs::read_to_string(&target_path).unwrap_or_default();
    if content
        .lines()
        .any(|line| line.trim() == PANTRY_DIR || line.trim() == ".pantry/")
    {
        return Ok(None);
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&target_path)
        .context("Failed to open git exclusion file")?;

    if !content.is_empty() && !content.ends_with('\n') {
        writeln!(file)?;
    }
    writeln!(file, "{PANTRY_DIR}")?;

    println!(
        "Added {PANTRY_DIR} to {}",
        target_path.strip_prefix(root).unwrap_or(&target_path).display()
    );
    Ok(Some(target_path))
}
