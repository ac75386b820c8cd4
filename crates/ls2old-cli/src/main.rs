//! ls2old - Migrate a LingSync corpus to an Online Linguistic Database.

use clap::Parser;
use ls2old_cli::{pipeline, Cli, Printer, Settings};
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> ls2old_cli::Result<()> {
    let cli = Cli::parse();

    let default_directive = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let printer = Printer::new(!cli.no_color);
    let settings = Settings::resolve(cli)?;
    pipeline::run(&settings, &printer)
}
