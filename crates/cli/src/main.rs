use clap::Parser;
use tracing_subscriber::EnvFilter;

use sc_cli::cli::{Cli, Command, ConfigCommand, RunArgs};
use sc_domain::CountdownConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        // Default to run when no subcommand is given.
        None => {
            let app = sc_cli::cli::load_config(&cli.config)?;
            sc_cli::cli::run::run(app, RunArgs::default()).await
        }
        Some(Command::Run(args)) => {
            let app = sc_cli::cli::load_config(&cli.config)?;
            sc_cli::cli::run::run(app, args).await
        }
        Some(Command::Config(ConfigCommand::Validate)) => {
            let app = sc_cli::cli::load_config(&cli.config)?;
            let config = CountdownConfig::resolve(&[app.options])?;
            if !sc_cli::cli::config::validate(&config, &cli.config) {
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Command::Config(ConfigCommand::Show)) => {
            let app = sc_cli::cli::load_config(&cli.config)?;
            let config = CountdownConfig::resolve(&[app.options])?;
            sc_cli::cli::config::show(&config)
        }
        Some(Command::Version) => {
            println!("simply-countdown {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
