//! Command-line argument definitions.
//!
//! Priority resolution: CLI flags > environment > config file > defaults.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Quotebook: manage quote collections stored as SQLite files in a folder.
#[derive(Parser, Debug)]
#[command(name = "quotebook", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Root directory of the local folder store.
    #[arg(long = "root", global = true)]
    pub root: Option<PathBuf>,

    /// Folder id or share URL holding the collections.
    #[arg(short = 'f', long = "folder", global = true)]
    pub folder: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    /// Absolute directory for log files. Logging is off when unset.
    #[arg(long = "log-dir", global = true)]
    pub log_dir: Option<PathBuf>,

    /// Print results as JSON.
    #[arg(long = "json", global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List collection files in the folder.
    Collections,
    /// Create an empty collection.
    Create {
        /// File name; the extension is appended when missing.
        name: Option<String>,
    },
    /// Delete a collection file by exact name.
    Drop { name: String },
    /// Print every quote of a collection.
    Show(DbArg),
    /// Print one random quote.
    Random(RandomArgs),
    /// Add a quote.
    Add(AddArgs),
    /// Overwrite fields of one quote; omitted fields keep their value.
    Edit(EditArgs),
    /// Delete quotes by id.
    Delete(IdsArgs),
    /// Find quotes whose content or tag contains TEXT (case-insensitive).
    Search {
        #[command(flatten)]
        db: DbArg,
        /// Empty text lists every quote.
        #[arg(default_value = "")]
        text: String,
    },
    /// List quotes with duplicated content.
    Dups(DbArg),
    /// List every tag used in a collection.
    Tags(DbArg),
    /// Copy quotes into another collection.
    Copy(TransferArgs),
    /// Move quotes into another collection.
    Move(TransferArgs),
    /// Reassign ids to 1..n in current order.
    Renumber(DbArg),
}

#[derive(Args, Debug)]
pub struct DbArg {
    /// Collection file name.
    #[arg(short = 'd', long = "db")]
    pub db: String,
}

#[derive(Args, Debug)]
pub struct RandomArgs {
    #[command(flatten)]
    pub db: DbArg,
    /// Only pick quotes carrying one of these tags.
    #[arg(long = "include", num_args = 1..)]
    pub include: Vec<String>,
    /// Never pick quotes carrying these tags.
    #[arg(long = "exclude", num_args = 1..)]
    pub exclude: Vec<String>,
    /// Start with every known tag excluded, even when the config turns it off.
    #[arg(long = "default-deny")]
    pub default_deny: bool,
    /// Start with nothing excluded, even when the config says default-deny.
    #[arg(long = "allow-all", conflicts_with = "default_deny")]
    pub allow_all: bool,
    /// Tags to take back out of the exclude set.
    #[arg(long = "allow", num_args = 1..)]
    pub allow: Vec<String>,
    /// Seed for a reproducible pick.
    #[arg(long = "seed")]
    pub seed: Option<u64>,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[command(flatten)]
    pub db: DbArg,
    #[arg(long = "content", default_value = "")]
    pub content: String,
    #[arg(long = "speaker", default_value = "")]
    pub speaker: String,
    #[arg(long = "note", default_value = "")]
    pub note: String,
    #[arg(long = "date", default_value = "")]
    pub date: String,
    /// Whitespace-separated tags.
    #[arg(long = "tag", default_value = "")]
    pub tag: String,
    /// Existing tags to add to `--tag`.
    #[arg(long = "pick-tag", num_args = 1..)]
    pub pick_tag: Vec<String>,
    #[arg(long = "link")]
    pub link: Option<String>,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    #[command(flatten)]
    pub db: DbArg,
    pub id: i64,
    #[arg(long = "content")]
    pub content: Option<String>,
    #[arg(long = "speaker")]
    pub speaker: Option<String>,
    #[arg(long = "note")]
    pub note: Option<String>,
    #[arg(long = "date")]
    pub date: Option<String>,
    #[arg(long = "tag")]
    pub tag: Option<String>,
    #[arg(long = "link")]
    pub link: Option<String>,
}

#[derive(Args, Debug)]
pub struct IdsArgs {
    #[command(flatten)]
    pub db: DbArg,
    #[arg(required = true)]
    pub ids: Vec<i64>,
}

#[derive(Args, Debug)]
pub struct TransferArgs {
    #[command(flatten)]
    pub db: DbArg,
    /// Destination collection file name.
    #[arg(long = "to")]
    pub to: String,
    #[arg(required = true)]
    pub ids: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::{CliArgs, Command};
    use clap::{CommandFactory, Parser};

    #[test]
    fn cli_definition_is_consistent() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn parses_move_with_global_flags_after_subcommand() {
        let args = CliArgs::parse_from([
            "quotebook", "move", "--db", "a.db", "--to", "b.db", "1", "3", "--json",
        ]);
        assert!(args.json);
        match args.command {
            Command::Move(transfer) => {
                assert_eq!(transfer.db.db, "a.db");
                assert_eq!(transfer.to, "b.db");
                assert_eq!(transfer.ids, vec![1, 3]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
