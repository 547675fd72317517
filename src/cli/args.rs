//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::domain::{DeleteStrategy, Order};

/// Ordered course index: binary search tree with on-demand balancing and flat-file persistence
#[derive(Parser, Debug)]
#[command(name = "coursetree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Course data file (overrides config)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    /// Config file (default: ./.coursetree.toml if present)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all courses
    List {
        /// Traversal order: pre, in, post, breadth
        #[arg(short, long)]
        order: Option<Order>,
    },

    /// Add a course and save
    Add {
        /// Course code (unique key)
        code: String,
        /// Subject code
        subject_code: String,
        /// Subject name
        subject_name: String,
        semester: String,
        year: String,
        seats: u32,
        registered: u32,
        price: f64,
    },

    /// Show the course with a code
    Get {
        /// Course code
        code: String,
    },

    /// Find courses whose subject name contains a fragment
    Search {
        /// Text to look for in subject names
        fragment: String,
    },

    /// Delete a course and save
    Delete {
        /// Course code
        code: String,
        /// Deletion strategy: merging, copying
        #[arg(short, long)]
        strategy: Option<DeleteStrategy>,
    },

    /// Rebuild the index with minimal height and save
    Balance,

    /// Show size, height and balance of the index
    Stats,

    /// Show the index shape as a tree
    Tree,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Print a commented config template
    Template,
    /// Show config file locations
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn given_delete_with_strategy_when_parsing_then_strategy_is_set() {
        let cli = Cli::try_parse_from(["coursetree", "delete", "CS101", "--strategy", "copy"]).unwrap();
        match cli.command {
            Some(Commands::Delete { code, strategy }) => {
                assert_eq!(code, "CS101");
                assert_eq!(strategy, Some(DeleteStrategy::Copying));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn given_repeated_debug_flag_when_parsing_then_counts() {
        let cli = Cli::try_parse_from(["coursetree", "-ddd", "list", "-o", "breadth"]).unwrap();
        assert_eq!(cli.debug, 3);
        assert!(matches!(
            cli.command,
            Some(Commands::List {
                order: Some(Order::Breadth)
            })
        ));
    }

    #[test]
    fn given_unknown_order_when_parsing_then_fails() {
        assert!(Cli::try_parse_from(["coursetree", "list", "--order", "zigzag"]).is_err());
    }
}
