//! CLI argument parsing using clap 4.x derive macros

use capdir_core::query::{Availability, Criteria, SortKey};
use clap::{Args, Parser, Subcommand};

/// Browse the capability directory and manage consultant registrations
///
/// Without a subcommand, opens the interactive directory.
#[derive(Parser, Debug)]
#[command(name = "capdir")]
#[command(author, about, long_about = None)]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// The command to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory service URL (overrides config and CAPDIR_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Print version information
    #[arg(long)]
    pub version: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the interactive directory (default)
    Tui,

    /// Fetch the directory once and print the filtered, sorted list
    List {
        #[command(flatten)]
        filters: FilterArgs,

        /// Print the matching capabilities as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Register a consultant for a capability
    Register {
        /// Capability name, exactly as listed
        #[arg(short, long)]
        capability: String,

        /// Consultant email
        #[arg(short, long)]
        email: String,
    },

    /// Remove a consultant from a capability
    Unregister {
        /// Capability name, exactly as listed
        #[arg(short, long)]
        capability: String,

        /// Consultant email
        #[arg(short, long)]
        email: String,
    },

    /// Show the effective configuration
    Config {
        /// Only print where the config file is (or would be)
        #[arg(long)]
        path: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Case-insensitive match against name and description
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Exact practice area
    #[arg(short, long)]
    pub practice: Option<String>,

    /// Exact industry vertical
    #[arg(short, long)]
    pub industry: Option<String>,

    /// Capacity bucket: high (>30h), medium (20-30h), low (<20h)
    #[arg(short, long)]
    pub availability: Option<Availability>,

    /// name-asc, name-desc, capacity-desc, capacity-asc, consultants-desc,
    /// consultants-asc or practice
    #[arg(long)]
    pub sort: Option<SortKey>,
}

impl FilterArgs {
    pub fn into_criteria(self, default_sort: SortKey) -> Criteria {
        Criteria {
            search: self.search,
            practice_area: self.practice,
            industry: self.industry,
            availability: self.availability,
            sort: self.sort.unwrap_or(default_sort),
        }
    }
}
