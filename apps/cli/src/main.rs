//! specgen CLI: emit API descriptions as JSON, YAML and embeddable Rust
//! sources, optionally converted from Swagger 2.0 to OpenAPI 3.0.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
