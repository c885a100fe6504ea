//! CLI interface for the resume skills engine

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "resume-skills")]
#[command(about = "Resume skill extraction and recommendation tool")]
#[command(
    long_about = "Extract skills from resumes (PDF, DOCX, Markdown, plain text) using a local NER model or a remote inference server, validate them against the source text, and recommend related skills from a catalog"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract skills from a resume document
    Extract {
        /// Path to resume file (PDF, DOCX, TXT, MD)
        file: Option<PathBuf>,

        /// Raw resume text (alternative to a file)
        #[arg(short, long, conflicts_with = "file")]
        text: Option<String>,

        /// Skills the user already declared (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        declared: Vec<String>,

        /// Also recommend related skills from the catalog
        #[arg(short, long)]
        recommend: bool,

        /// Output format: console, json
        #[arg(short, long, default_value = "console")]
        format: String,

        /// Save output to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Recommend skills from the catalog for a known skill set
    Recommend {
        /// Known skills (comma-separated)
        #[arg(short, long, value_delimiter = ',', required = true)]
        skills: Vec<String>,

        /// Number of recommendations to return
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Extract skills from every supported document in a directory
    Batch {
        /// Directory holding resume documents
        dir: PathBuf,

        /// Output format: console, json
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Directory to write one report per document into
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Model management commands
    Models {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ModelAction {
    /// List role defaults and downloaded checkpoints
    List,

    /// Download a model checkpoint from the HuggingFace Hub
    Download {
        /// HuggingFace repo ID (e.g. dslim/bert-base-NER)
        model: String,
    },

    /// Remove a downloaded model checkpoint
    Remove {
        /// HuggingFace repo ID to remove
        model: String,
    },

    /// Show the models directory
    Dir,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write the default configuration file
    Init,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(crate::config::OutputFormat::Console),
        "json" => Ok(crate::config::OutputFormat::Json),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json",
            format
        )),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &PathBuf, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
