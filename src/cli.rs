use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::summary::GroupBy;

#[derive(Parser)]
#[command(name = "pantry")]
#[command(about = "Grocery lists with fuzzy item matching", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize pantry in the current project
    Init {
        /// Initialize without committing to the repo (adds .pantry to .gitignore or .git/info/exclude)
        #[arg(long)]
        stealth: bool,
    },

    /// Manage grocery lists
    #[command(subcommand)]
    List(ListCommands),

    /// Manage items on a list
    #[command(subcommand)]
    Item(ItemCommands),

    /// Show status of lists and items
    Status {
        /// Show status of a specific list
        #[arg(long)]
        list: Option<String>,

        /// Show status of a specific item
        #[arg(long)]
        item: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Hide notes in output
        #[arg(long)]
        concise: bool,
    },

    /// Summarize items grouped by category, name or state
    Summary {
        /// Only summarize this list
        #[arg(long)]
        list: Option<String>,

        /// Grouping key (defaults to summary.group_by in config.toml)
        #[arg(long, value_enum)]
        by: Option<GroupBy>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Find the items whose names are closest to a search term
    Match {
        /// The search term
        term: String,

        /// Only search this list
        #[arg(long, conflicts_with = "from")]
        list: Option<String>,

        /// Read candidates from a JSON array of {"id", "name"} objects instead
        #[arg(long)]
        from: Option<PathBuf>,

        /// Number of matches to show; zero or negative shows none
        #[arg(long, allow_negative_numbers = true)]
        top: Option<i64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export a list as CSV
    Export {
        /// The list ID to export
        list_id: String,

        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

/// Clamp a signed `--top` value; zero and negatives select nothing.
pub fn top_limit(top: i64) -> usize {
    usize::try_from(top).unwrap_or(0)
}

#[derive(Subcommand)]
pub enum ListCommands {
    /// Create a new list
    Create {
        /// The list name
        name: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show all lists
    Ls {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ItemCommands {
    /// Add an item to a list
    Add {
        /// The list ID to add to
        list_id: String,

        /// Item name
        name: String,

        /// How many (defaults to 1)
        #[arg(long, short)]
        quantity: Option<f64>,

        /// Unit for the quantity, e.g. kg or l
        #[arg(long, short)]
        unit: Option<String>,

        /// Category used for grouping, e.g. dairy
        #[arg(long, short)]
        category: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show items on a list
    Ls {
        /// The list ID
        list_id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Show notes for each item
        #[arg(long)]
        verbose: bool,
    },

    /// Mark an item as bought
    Buy {
        /// The item ID
        item_id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Mark an item as skipped
    Skip {
        /// The item ID
        item_id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Put a bought or skipped item back on the list
    Restore {
        /// The item ID
        item_id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a note to an item
    Note {
        /// The item ID
        item_id: String,

        /// The note text
        text: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
