//! CLI entry point for the paint-by-numbers instruction generator

use clap::Parser;
use numberpaint::io::cli::{Cli, FileProcessor};

fn main() -> numberpaint::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let mut processor = FileProcessor::new(cli);
    processor.process()
}
