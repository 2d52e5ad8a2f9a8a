//! CLI command definitions and argument parsing

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(name = "course-recommender")]
#[command(about = "Course recommendation engine and catalog proxy")]
#[command(version)]
pub struct Cli {
    /// Enable verbose debug logging (default: configured level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (default: config.toml, then config.example.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Host address to bind to
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
        /// Disable CORS
        #[arg(long)]
        no_cors: bool,
    },
    /// Run the recommendation pipeline once and print the response as JSON
    Recommend {
        /// Free-text learner query
        query: String,
        /// UI chip appended to the query (repeatable)
        #[arg(long = "chip")]
        chips: Vec<String>,
        /// Maximum number of recommendations
        #[arg(short = 'n', long)]
        max_results: Option<usize>,
        /// Skip the LLM and parse intent with keyword rules only
        #[arg(long)]
        rules_only: bool,
    },
    /// List or inspect the loaded course catalog
    Catalog {
        /// Show a single course by id
        id: Option<String>,
        /// Text search over title, description and features
        #[arg(short, long)]
        search: Option<String>,
        /// Filter by level (beginner, intermediate, advanced)
        #[arg(short, long)]
        level: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration as TOML
    Config,
}
