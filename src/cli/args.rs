//! CLI argument definitions using clap
//!
//! Commands:
//! - kpa-forms init --config <path>
//! - kpa-forms serve --config <path> [--port <port>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// KPA forms - wheel specification submission service
#[derive(Parser, Debug)]
#[command(name = "kpa-forms")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a new forms data directory
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./kpa-forms.json")]
        config: PathBuf,
    },

    /// Start the HTTP API server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./kpa-forms.json")]
        config: PathBuf,

        /// Override the configured listen port
        #[arg(long)]
        port: Option<u16>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_with_port() {
        let cli = Cli::try_parse_from(["kpa-forms", "serve", "--config", "c.json", "--port", "9001"])
            .unwrap();
        match cli.command {
            Command::Serve { config, port } => {
                assert_eq!(config, PathBuf::from("c.json"));
                assert_eq!(port, Some(9001));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_init_uses_default_config_path() {
        let cli = Cli::try_parse_from(["kpa-forms", "init"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Init { ref config } if config == &PathBuf::from("./kpa-forms.json")
        ));
    }
}
