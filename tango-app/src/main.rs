mod api;
mod cli;

use anyhow::Result;
use clap::Parser;

use cli::commands::run_cli;
use cli::opts::Cli;

fn main() -> Result<()> {
    let args = Cli::parse();
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_cli(args))
}
