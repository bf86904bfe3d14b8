use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "notas", version)]
#[command(about = "Block-structured plain-text notes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Root directory of the notes corpus
    #[arg(long, global = true, env = "NOTES_DIR", default_value = "./notas")]
    pub root: PathBuf,

    /// Directory holding config.json (defaults to the platform config dir)
    #[arg(long, global = true, env = "NOTAS_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a document's blocks as JSON (creates it empty if missing)
    #[command(alias = "cat")]
    Load {
        /// Corpus-relative document path (e.g. /work/plan.md)
        path: String,
    },

    /// Replace a document with a JSON array of blocks
    Save {
        path: String,

        /// Read blocks from this file instead of stdin
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Add a new markdown block to the end of a document
    #[command(alias = "a")]
    Append { path: String, content: String },

    /// Create a directory, or an empty document if the name has the document extension
    #[command(alias = "n")]
    Create {
        /// Where to create it (a directory, or a document whose folder is used)
        path: String,
        name: String,
    },

    /// Print the directory tree as JSON
    Tree {
        #[arg(default_value = "/")]
        path: String,
    },

    /// Print every path under a directory, one per line
    Hints {
        #[arg(default_value = "/")]
        path: String,
    },

    /// Search blocks by content or document path, newest first
    #[command(alias = "s")]
    Search {
        /// Text to look for (empty lists everything)
        #[arg(default_value = "")]
        query: String,

        /// Limit the search to this subtree
        #[arg(short, long, default_value = "/")]
        path: String,
    },

    /// Per-day counts of created and modified blocks
    Activity {
        #[arg(default_value = "/")]
        path: String,
    },

    /// Move a document or directory to the trash
    #[command(alias = "rm")]
    Trash { path: String },

    /// Store an image next to a document and print its URL
    Image {
        /// Document or directory the image belongs to
        path: String,

        /// File to upload
        file: PathBuf,

        /// Name to store it under (defaults to the file's own name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (e.g., doc-ext, trash-dir)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}
