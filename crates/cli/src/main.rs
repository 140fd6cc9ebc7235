use clap::Parser;
use tracing_subscriber::EnvFilter;

use kr_cli::cli::{Cli, Command, ConfigCommand};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_cli_tracing();

    let (config, config_path) = kr_cli::cli::load_config()?;

    let ok = match cli.command {
        Command::Check { file, extended } => kr_cli::cli::params::check(&file, extended)?,
        Command::Show { file } => kr_cli::cli::params::show(&file)?,
        Command::Normalize { file, pretty } => kr_cli::cli::params::normalize(&file, pretty)?,
        Command::Envelope { file, method } => {
            kr_cli::cli::params::envelope(&config, &file, method)?
        }
        Command::SaveObject { file } => kr_cli::cli::params::save_object(&config, &file)?,
        Command::Config(ConfigCommand::Validate) => {
            kr_cli::cli::config::validate(&config, &config_path)
        }
        Command::Config(ConfigCommand::Show) => kr_cli::cli::config::show(&config)?,
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

/// Compact stderr-only tracing so diagnostics never mix with the JSON
/// written to stdout. Defaults to `warn`.
fn init_cli_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
