//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Top-level CLI parser for `devlens`.
#[derive(Debug, Parser)]
#[command(
    name = "devlens",
    version,
    about = "Turn GitHub repositories into file trees, schema models and code outlines"
)]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Part of a stored project to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Section {
    /// The file hierarchy.
    Tree,
    /// Extracted schema entities.
    Entities,
    /// Repository statistics.
    Stats,
    /// Path-based stack guess.
    Stack,
    /// Latest LLM audit.
    Analysis,
}

/// Schema dialect override for `devlens schema`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DialectArg {
    /// `model X { ... }` blocks.
    Prisma,
    /// `class X(models.Model):` declarations.
    Django,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Register a GitHub repository.
    Import {
        /// Repository URL, e.g. `https://github.com/owner/repo`.
        url: String,
        /// Access token for this repository only.
        #[arg(long)]
        token: Option<String>,
        /// Sync right after importing.
        #[arg(long)]
        sync: bool,
    },
    /// List imported projects.
    List,
    /// Refresh a project's tree, entities and statistics.
    Sync {
        /// Project id.
        id: String,
    },
    /// Print a stored project.
    Show {
        /// Project id.
        id: String,
        /// Print only this part, as JSON.
        #[arg(long, value_enum)]
        section: Option<Section>,
    },
    /// Outline one file of a synced project.
    Outline {
        /// Project id.
        id: String,
        /// Path of the file inside the repository.
        path: String,
        /// Store the tree with the outline attached back into the project.
        #[arg(long)]
        save: bool,
    },
    /// Run the LLM repository audit and store the result.
    Analyze {
        /// Project id.
        id: String,
    },
    /// Ask the LLM about one node; without a question, ask for insights.
    Ask {
        /// Project id.
        id: String,
        /// Path of the node inside the repository.
        path: String,
        /// Free-form question.
        question: Option<String>,
    },
    /// Delete a stored project.
    Remove {
        /// Project id.
        id: String,
    },
    /// Extract schema entities from a local model file.
    Schema {
        /// `schema.prisma` or `models.py` file.
        file: PathBuf,
        /// Dialect, when the file name does not reveal it.
        #[arg(long, value_enum)]
        dialect: Option<DialectArg>,
    },
    /// Outline a local source file.
    OutlineFile {
        /// Source file.
        file: PathBuf,
    },
}
