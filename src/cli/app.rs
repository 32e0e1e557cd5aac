use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "xml-settings")]
#[command(about = "Inspect and edit XML settings documents")]
pub struct Cli {
    /// Resolve FILE inside this application's config directory
    #[arg(long, global = true)]
    pub app: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show every category and key
    Show {
        /// Settings document
        file: PathBuf,
    },
    /// List category names
    Categories {
        /// Settings document
        file: PathBuf,
    },
    /// Print the raw value of a key
    Get {
        /// Settings document
        file: PathBuf,
        /// Category name
        category: String,
        /// Key name
        key: String,
    },
    /// Set the raw value of a key, creating the document if needed
    Set {
        /// Settings document
        file: PathBuf,
        /// Category name
        category: String,
        /// Key name
        key: String,
        /// New value (invariant text)
        value: String,
        /// Root element name; required when the document does not exist yet
        #[arg(long)]
        root: Option<String>,
    },
    /// Remove a key, or a whole category when no key is given
    Remove {
        /// Settings document
        file: PathBuf,
        /// Category name
        category: String,
        /// Key name
        key: Option<String>,
    },
    /// Rewrite the document in canonical order and indentation
    Format {
        /// Settings document
        file: PathBuf,
        /// Rename the root element
        #[arg(long)]
        root: Option<String>,
    },
}
