mod cli;
mod config;
mod error;
mod list;
mod output;
mod plan;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

fn main() -> Result<()> {
    env_logger::init();

    output::print_banner();

    let cli = Cli::parse();
    info!("Starting planlens - execution plan lister");
    cli.execute()?;

    Ok(())
}
