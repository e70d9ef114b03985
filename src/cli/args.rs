//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

use crate::domain::Gesture;

/// Concept-map renderer: tidy-tree layout, pan/zoom and SVG output for document analyses
#[derive(Parser, Debug)]
#[command(name = "notemap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Project directory for local config (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    /// Print author and version
    #[arg(long)]
    pub info: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the concept map as SVG
    Render {
        /// Analysis or concept-map JSON (`-` for stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        file: String,

        /// Output file (default: stdout)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<String>,

        /// Surface width in pixels (default: viewport.width from config)
        #[arg(long)]
        width: Option<f64>,

        /// Replay a gesture before writing: drag:DX,DY | zoom:F@X,Y | wheel:D@X,Y
        /// | dblclick@X,Y | dblclick-out@X,Y
        #[arg(short, long = "gesture", value_name = "GESTURE", allow_hyphen_values = true)]
        gestures: Vec<Gesture>,
    },

    /// Print computed node positions
    Layout {
        /// Analysis or concept-map JSON (`-` for stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        file: String,

        /// Surface width in pixels (default: viewport.width from config)
        #[arg(long)]
        width: Option<f64>,
    },

    /// Print the concept hierarchy as a tree
    Outline {
        /// Analysis or concept-map JSON (`-` for stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        file: String,
    },

    /// Print summary, sources, roadmap and topic stats
    Report {
        /// Analysis JSON (`-` for stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        file: String,
    },

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
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
