//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use rd_checklist_lib::catalog::OwnedFilter;

#[derive(Parser)]
#[command(name = "rd-checklist")]
#[command(about = "Track a Rush Duel card collection", long_about = None)]
pub(crate) struct Cli {
    /// Path to the checklist database (overrides RD_CHECKLIST_DB and settings.toml)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Field edits shared by `sets edit` and `cards edit`.
#[derive(Args, Clone)]
pub(crate) struct FieldEditArgs {
    /// Override a field: FIELD=VALUE (repeatable)
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    pub assignments: Vec<String>,

    /// Override a field with an explicit empty value (repeatable)
    #[arg(long, value_name = "FIELD")]
    pub clear: Vec<String>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// List product types with their set counts
    ProductTypes,

    /// Browse and edit card sets
    Sets {
        #[command(subcommand)]
        action: SetAction,
    },

    /// Show and edit individual cards
    Cards {
        #[command(subcommand)]
        action: CardAction,
    },

    /// Set how many copies of one card variant you own
    Own {
        /// Card id (e.g., RD/KP01-JP001)
        card_id: String,

        /// Rarity of the variant (e.g., N, SR, UR)
        rarity: String,

        /// Number of copies owned
        #[arg(allow_negative_numbers = true)]
        count: i64,
    },

    /// Apply ownership counts from a JSON file in one transaction
    OwnBatch {
        /// JSON array of {"card_id", "rarity", "owned_count"} objects
        file: PathBuf,
    },

    /// Show ownership statistics for a set, or for the whole collection
    Stats {
        /// Set id (omit for collection-wide totals)
        set_id: Option<String>,
    },

    /// Search cards by text, facets, and ownership
    Search(SearchArgs),

    /// Import card sets from a JSON file
    Import {
        /// JSON array of sets, each with a "cards" array
        file: PathBuf,
    },

    /// Manage rd-checklist configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum SetAction {
    /// List card sets, newest first
    List {
        /// Only sets of this product type (e.g., booster)
        #[arg(short, long)]
        product_type: Option<String>,
    },

    /// Show a set with all of its cards
    Show {
        set_id: String,

        /// Print the resolved set as JSON
        #[arg(long)]
        json: bool,
    },

    /// Override fields of a set
    Edit {
        set_id: String,

        #[command(flatten)]
        fields: FieldEditArgs,
    },

    /// List the overrides stored for a set
    Overrides { set_id: String },

    /// Remove an override, restoring the imported value
    Reset { set_id: String, field: String },

    /// Show the edit history of a set
    History {
        set_id: String,

        /// Maximum entries to show
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
}

#[derive(Subcommand)]
pub(crate) enum CardAction {
    /// Show a card with its variants
    Show {
        card_id: String,

        /// Print the resolved card as JSON
        #[arg(long)]
        json: bool,
    },

    /// Override fields of a card
    Edit {
        card_id: String,

        #[command(flatten)]
        fields: FieldEditArgs,
    },

    /// List the overrides stored for a card
    Overrides { card_id: String },

    /// Remove an override, restoring the imported value
    Reset { card_id: String, field: String },

    /// Show the edit history of a card
    History {
        card_id: String,

        /// Maximum entries to show
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
}

#[derive(Args)]
pub(crate) struct SearchArgs {
    /// Text to match against names and card ids
    pub query: Option<String>,

    /// Card type (e.g., Monster, Spell, Trap)
    #[arg(long = "type")]
    pub card_type: Option<String>,

    /// Attribute (e.g., Light, Dark)
    #[arg(long)]
    pub attribute: Option<String>,

    /// Monster level
    #[arg(long)]
    pub level: Option<i32>,

    /// Restrict to one set
    #[arg(long = "set")]
    pub set_id: Option<String>,

    /// Only cards printed in this rarity
    #[arg(long)]
    pub rarity: Option<String>,

    /// Ownership filter: all, any_owned (owned), fully_owned, unowned (missing)
    #[arg(long)]
    pub owned: Option<OwnedFilter>,

    /// Page size (1-500, default 100)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Number of matches to skip
    #[arg(long, default_value_t = 0)]
    pub offset: usize,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show the settings file and the database in use
    Show,

    /// Print the settings file path
    Path,

    /// Save a default database path
    SetDb { path: PathBuf },

    /// Forget the saved database path
    ClearDb,
}
