// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::helpers::telemetry::setup_simple_tracing;
use crate::{print_config, simulate};
use anyhow::Result;
use clap::{command, ArgAction, Parser, Subcommand};
use tracing::{info, instrument, warn, Level};
use veil_config::{load_config, ElectionConfig};

#[derive(Parser, Debug)]
#[command(name = "veil")]
#[command(about = "Run confidential multi-proposal elections over encrypted tallies", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,

    /// Indicate error levels by adding additional `-v` arguments. Eg. `veil -vvv` will give you
    /// trace level output
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true
    )]
    pub verbose: u8,

    /// Silence all output. This argument cannot be used alongside `-v`
    #[arg(
        short,
        long,
        action = ArgAction::SetTrue,
        conflicts_with = "verbose",
        global = true
    )]
    quiet: bool,
}

impl Cli {
    pub fn log_level(&self) -> Level {
        if self.quiet {
            Level::ERROR
        } else {
            match self.verbose {
                0 => Level::WARN,  //
                1 => Level::INFO,  // -v
                2 => Level::DEBUG, // -vv
                _ => Level::TRACE, // -vvv
            }
        }
    }

    #[instrument(skip_all)]
    pub async fn execute(self) -> Result<()> {
        setup_simple_tracing(self.log_level());
        let config = load_config(self.config.clone())?;
        info!(name = %config.name, "Config loaded");

        match self.command {
            Commands::Simulate {
                votes,
                proposals,
                fee,
                seed,
            } => {
                let config = with_overrides(config, proposals, fee)?;
                simulate::execute(config, votes, seed).await?
            }
            Commands::PrintConfig => print_config::execute(&config)?,
        }

        Ok(())
    }
}

/// Apply command line overrides on top of the loaded configuration.
fn with_overrides(
    mut config: ElectionConfig,
    proposals: Option<usize>,
    fee: Option<u128>,
) -> Result<ElectionConfig> {
    if let Some(proposals) = proposals {
        if !config.proposal_labels.is_empty() && config.proposal_labels.len() != proposals {
            warn!(
                labels = config.proposal_labels.len(),
                proposals, "Dropping proposal labels that no longer match"
            );
            config.proposal_labels.clear();
        }
        config.num_proposals = proposals;
    }
    if let Some(fee) = fee {
        config.required_fee = fee;
    }
    config.validate()?;
    Ok(config)
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one complete round against the in-process backend and print the decrypted result
    Simulate {
        /// Proposal chosen by each voter, one fresh voter per entry. Eg. `--votes 0,1,1`
        #[arg(long, value_delimiter = ',', required = true)]
        votes: Vec<u64>,

        /// Number of proposals, overrides the configuration
        #[arg(long)]
        proposals: Option<usize>,

        /// Registration fee in wei, overrides the configuration
        #[arg(long)]
        fee: Option<u128>,

        /// Seed for voter identities, input keys and ballot nonces
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },

    /// Print the resolved configuration as YAML
    PrintConfig,
}
