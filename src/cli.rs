//! Command line interface for the `flowexport` binary.
//!
//! Loads an exporter configuration and prints the messages the library
//! would hand to a collector, for checking templates and message sizing
//! offline.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command line arguments for the `flowexport` binary.
#[derive(Debug, Parser)]
#[command(
    name = "flowexport",
    version,
    about = "Inspect IPFIX templates and message fragmentation"
)]
pub struct Cli {
    /// Exporter configuration file (YAML).
    #[arg(short, long, value_name = "FILE")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the template message announcing every configured template.
    Templates,
    /// Split a flow file into data messages and print them.
    Fragment {
        /// Flow file (YAML) with `flowsets` grouped by template id.
        #[arg(short, long, value_name = "FILE")]
        flows: PathBuf,
        /// Sequence number of the first message.
        #[arg(short, long, default_value_t = 0)]
        start: u32,
    },
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Command};

    #[test]
    fn parses_templates_command() {
        let cli = Cli::parse_from(["flowexport", "--config", "exporter.yaml", "templates"]);
        assert_eq!(cli.config.to_str(), Some("exporter.yaml"));
        assert!(matches!(cli.command, Command::Templates));
    }

    #[test]
    fn parses_fragment_command_with_start() {
        let cli = Cli::parse_from([
            "flowexport",
            "-c",
            "exporter.yaml",
            "fragment",
            "--flows",
            "flows.yaml",
            "--start",
            "42",
        ]);
        let Command::Fragment { flows, start } = cli.command else {
            panic!("expected fragment command");
        };
        assert_eq!(flows.to_str(), Some("flows.yaml"));
        assert_eq!(start, 42);
    }

    #[test]
    fn config_is_required() {
        assert!(Cli::try_parse_from(["flowexport", "templates"]).is_err());
    }
}
