//! Offline inspection tool for `flowexport` configurations.
//!
//! Prints template and data messages as YAML.

mod cli;

use std::{error::Error, fs};

use clap::Parser;
use flowexport::{Config, FlowFile, SequenceNumber};

fn main() -> Result<(), Box<dyn Error>> {
    // Applications embedding the library should install their own subscriber.
    tracing_subscriber::fmt::init();

    let cli = cli::Cli::parse();
    let config = Config::from_path(&cli.config)?;
    tracing::info!(
        config = %cli.config.display(),
        templates = config.templates.len(),
        outputs = config.outputs.len(),
        "configuration loaded"
    );

    match cli.command {
        cli::Command::Templates => {
            let message = config.template_message()?;
            print!("{}", serde_yaml::to_string(&message)?);
        }
        cli::Command::Fragment { flows, start } => {
            let input = fs::read_to_string(&flows)?;
            let file: FlowFile = FlowFile::from_yaml_str(&input)?;
            let batch = file.into_data_messages(&config, SequenceNumber::new(start))?;
            tracing::info!(
                messages = batch.len(),
                next_sequence = %batch.next_sequence(),
                "flows fragmented"
            );
            print!("{}", serde_yaml::to_string(&batch)?);
        }
    }
    Ok(())
}
