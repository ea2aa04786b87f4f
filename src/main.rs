use clap::Parser;
use tracing_subscriber::EnvFilter;

use genome_store::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("genome_store=debug,info")
    } else {
        EnvFilter::new("genome_store=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Import(args) => {
            cli::import::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Info(args) => {
            cli::info::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Get(args) => {
            cli::get::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Export(args) => {
            cli::export::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
