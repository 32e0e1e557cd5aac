use anyhow::Result;
use clap::Parser;
use log::debug;

mod cli;

use cli::Cli;

fn main() -> Result<()> {
    // Logs go to stderr so command output stays pipeable; filter with RUST_LOG
    env_logger::Builder::from_default_env().init();

    let cli = Cli::parse();
    debug!("Starting xml-settings");

    cli::handlers::run(cli)
}
