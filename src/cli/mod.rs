//! Command-line interface for mongodoc
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and command-line overrides
//! - Reading JSON input and writing the built document

use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::builder::DocumentBuilder;
use crate::config::{Config, OutputFormat};
use crate::error::Result;
use crate::formatter::DocumentFormatter;

/// Build a MongoDB document from JSON input
#[derive(Parser, Debug)]
#[command(
    name = "mongodoc",
    version,
    about = "Build MongoDB BSON documents from JSON input",
    long_about = "Reads a JSON object from a file or stdin, builds a BSON document from it
and writes the document as Extended JSON or raw BSON."
)]
pub struct CliArgs {
    /// JSON input file (stdin when omitted or "-")
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output file (stdout when omitted)
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long, value_enum, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Deepest nesting level to write
    #[arg(long, value_name = "DEPTH", value_parser = clap::value_parser!(u64).range(1..))]
    pub max_depth: Option<u64>,

    /// Verbose mode (debug logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Very verbose mode (trace logging)
    #[arg(long = "vv")]
    pub very_verbose: bool,
}

/// CLI interface manager
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration with command-line overrides applied
    config: Config,
}

impl CliInterface {
    /// Create a new CLI interface from the process arguments
    ///
    /// # Returns
    /// * `Result<Self>` - CLI interface or error
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    /// Create a CLI interface from already parsed arguments
    ///
    /// # Arguments
    /// * `args` - Parsed arguments
    ///
    /// # Returns
    /// * `Result<Self>` - CLI interface or error
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let mut config = Config::load(args.config_file.as_deref())?;
        Self::apply_overrides(&args, &mut config);
        config.validate()?;
        Ok(Self { args, config })
    }

    /// Apply command-line arguments on top of the loaded configuration
    fn apply_overrides(args: &CliArgs, config: &mut Config) {
        if let Some(format) = args.format {
            config.output.format = format;
        }
        if let Some(depth) = args.max_depth {
            config.builder.max_depth = usize::try_from(depth).ok();
        }
    }

    /// Get parsed arguments
    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    /// Get effective configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read input, build the document and write it out
    ///
    /// # Returns
    /// * `Result<()>` - Success or error
    pub fn run(&self) -> Result<()> {
        let input = self.read_input()?;
        let builder = DocumentBuilder::new(self.config.build_options());
        let doc = builder.build(&input)?;
        info!("Built document with {} top-level keys", doc.len());

        let formatter = DocumentFormatter::new(self.config.output.format);
        match &self.args.output {
            Some(path) => {
                debug!("Writing document to {}", path.display());
                formatter.write(&doc, File::create(path)?)
            }
            None => formatter.write(&doc, io::stdout().lock()),
        }
    }

    /// Parse the JSON input from the file argument or stdin
    fn read_input(&self) -> Result<serde_json::Value> {
        match self.args.input.as_deref() {
            Some(path) if path != Path::new("-") => {
                debug!("Reading JSON input from {}", path.display());
                let reader = BufReader::new(File::open(path)?);
                Ok(serde_json::from_reader(reader)?)
            }
            _ => {
                debug!("Reading JSON input from stdin");
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(serde_json::from_str(&content)?)
            }
        }
    }
}
