//! CLI entry point for wave function collapse generation

use clap::Parser;
use tracing_subscriber::EnvFilter;
use wavecollapse::io::cli::{Cli, FileProcessor};

// Progress bars own stdout, log lines go to stderr
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> wavecollapse::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let mut processor = FileProcessor::new(cli);
    processor.process()?;
    Ok(())
}
