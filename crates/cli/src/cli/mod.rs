pub mod config;
pub mod params;

use std::io::Read;

use clap::{Parser, Subcommand, ValueEnum};

/// kbreport — inspect and prepare KBase report parameters.
#[derive(Debug, Parser)]
#[command(name = "kbreport", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse a parameter file and report every problem the service would reject.
    Check {
        /// JSON file with the call parameters (`-` for stdin).
        file: String,
        /// Treat the file as `create_extended_report` parameters.
        #[arg(long)]
        extended: bool,
    },
    /// Print the debug rendering of `create` parameters.
    Show {
        /// JSON file with the call parameters (`-` for stdin).
        file: String,
    },
    /// Re-emit `create` parameters in canonical key order without nulls.
    Normalize {
        /// JSON file with the call parameters (`-` for stdin).
        file: String,
        /// Pretty-print the output.
        #[arg(long)]
        pretty: bool,
    },
    /// Print the JSON-RPC request body for a call.
    Envelope {
        /// JSON file with the call parameters (`-` for stdin).
        file: String,
        /// Service method to wrap the parameters for.
        #[arg(long, value_enum, default_value = "create")]
        method: EnvelopeMethod,
    },
    /// Print the workspace `save_objects` payload for a simple report.
    SaveObject {
        /// JSON file with `create` parameters (`-` for stdin).
        file: String,
    },
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EnvelopeMethod {
    Create,
    CreateExtendedReport,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and report any errors.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
}

// ── Config loading helper ─────────────────────────────────────────────

/// Load the configuration from the path specified by `KR_CONFIG` (or
/// `kbreport.toml` by default).  Returns the parsed config and the path
/// that was used.
pub fn load_config() -> anyhow::Result<(kr_domain::config::Config, String)> {
    let config_path =
        std::env::var("KR_CONFIG").unwrap_or_else(|_| "kbreport.toml".into());
    let config = load_config_from(&config_path)?;
    Ok((config, config_path))
}

/// Parse the TOML file at `config_path`; a missing file yields defaults.
pub fn load_config_from(config_path: &str) -> anyhow::Result<kr_domain::config::Config> {
    if !std::path::Path::new(config_path).exists() {
        tracing::debug!(config_path, "no config file, using defaults");
        return Ok(kr_domain::config::Config::default());
    }
    let raw = std::fs::read_to_string(config_path)
        .map_err(|e| anyhow::anyhow!("reading {config_path}: {e}"))?;
    toml::from_str(&raw).map_err(|e| anyhow::anyhow!("parsing {config_path}: {e}"))
}

/// Read a whole input file, or stdin when `path` is `-`.
pub fn read_input(path: &str) -> anyhow::Result<String> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| anyhow::anyhow!("reading stdin: {e}"))?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).map_err(|e| anyhow::anyhow!("reading {path}: {e}"))
}
