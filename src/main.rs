//! mongodoc - build MongoDB documents from the command line
//!
//! Reads a JSON object, builds a BSON document from it with the same
//! builder the library exposes, and writes the result.
//!
//! # Usage
//!
//! ```bash
//! # Pretty Extended JSON on stdout
//! echo '{"name": "abc", "tags": ["a", "b"]}' | mongodoc
//!
//! # Raw BSON into a file
//! mongodoc input.json -f bson -o output.bson
//! ```

use mongodoc::cli::CliInterface;
use mongodoc::error::Result;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Application entry point
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Main application logic
///
/// 1. Parse command-line arguments and load configuration
/// 2. Initialize logging
/// 3. Build and write the document
fn run() -> Result<()> {
    let cli = CliInterface::new()?;
    initialize_logging(&cli);
    cli.run()
}

/// Initialize logging system based on verbosity level
///
/// `RUST_LOG` takes precedence over both the flags and the configuration.
/// Logs go to stderr so stdout only carries the document.
///
/// # Arguments
/// * `cli` - CLI interface with verbosity settings
fn initialize_logging(cli: &CliInterface) {
    let level = if cli.args().very_verbose {
        Level::TRACE
    } else if cli.args().verbose {
        Level::DEBUG
    } else {
        cli.config().logging.level.to_tracing_level()
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(LevelFilter::from_level(level).into()));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    // Configure timestamps
    if cli.config().logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
