// Command-line interface

pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "feedreader")]
#[command(about = "Feedreader - load and render RSS/Atom feeds", long_about = None)]
pub struct Cli {
    /// Feed catalogue YAML (defaults to the builtin feeds)
    #[arg(long, global = true)]
    pub feeds: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the feed catalogue
    Feeds,

    /// Load a feed and print its entries
    Load {
        /// Feed id
        id: u32,

        /// Print the load report and entries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Load every feed in order and report whether the content changed
    Cycle,

    /// Load a feed and print the rendered HTML fragment
    Render {
        /// Feed id
        id: u32,
    },

    /// Validate a feed URL
    Validate {
        /// Feed URL to validate
        url: String,
    },
}
