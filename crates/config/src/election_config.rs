// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::load_config::{
    find_in_parent, resolve_config_path, ConfigSource, ResolvedPath, DEFAULT_CONFIG_NAME,
};
use anyhow::{bail, Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};
use tracing::{debug, info};
use veil_acl::Principal;

/// Environment variable prefix for overrides, eg. `VEIL_REQUIRED_FEE=1000`
pub const ENV_PREFIX: &str = "VEIL_";

/// 0.005 ETH in wei
pub const DEFAULT_REQUIRED_FEE: u128 = 5_000_000_000_000_000;

/// Parameters of a single election deployment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct ElectionConfig {
    /// Human readable name used in logs
    pub name: String,
    /// The only principal allowed to advance, reveal, reset and withdraw
    pub administrator: Principal,
    /// Address of the election itself. Ciphertexts are bound to it and it holds access to its own
    /// state
    pub election_address: Principal,
    /// Registration fee in wei
    pub required_fee: u128,
    /// Number of proposals created at deployment
    pub num_proposals: usize,
    /// Optional display labels, one per proposal
    pub proposal_labels: Vec<String>,
}

impl Default for ElectionConfig {
    fn default() -> Self {
        Self {
            name: "veil".to_string(),
            administrator: Principal::new([
                0xf3, 0x9f, 0xd6, 0xe5, 0x1a, 0xad, 0x88, 0xf6, 0xf4, 0xce, 0x6a, 0xb8, 0x82, 0x72,
                0x79, 0xcf, 0xff, 0xb9, 0x22, 0x66,
            ]),
            election_address: Principal::new([
                0x5f, 0xbd, 0xb2, 0x31, 0x56, 0x78, 0xaf, 0xec, 0xb3, 0x67, 0xf0, 0x32, 0xd9, 0x3f,
                0x64, 0x2f, 0x64, 0x18, 0x0a, 0xa3,
            ]),
            required_fee: DEFAULT_REQUIRED_FEE,
            num_proposals: 3,
            proposal_labels: vec![],
        }
    }
}

impl ElectionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.num_proposals == 0 {
            bail!("An election needs at least one proposal. Set `num_proposals` to 1 or more.");
        }

        if self.administrator == self.election_address {
            bail!(
                "The administrator {} cannot be the election address.",
                self.administrator
            );
        }

        if !self.proposal_labels.is_empty() && self.proposal_labels.len() != self.num_proposals {
            bail!(
                "Got {} proposal labels for {} proposals.",
                self.proposal_labels.len(),
                self.num_proposals
            );
        }

        Ok(())
    }

    /// Display label for a proposal, falling back to its index.
    pub fn proposal_label(&self, id: usize) -> String {
        self.proposal_labels
            .get(id)
            .cloned()
            .unwrap_or_else(|| format!("#{}", id))
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Could not serialize configuration")
    }
}

pub struct OsDirs;
impl OsDirs {
    pub fn config_dir() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Veil needs an OS that can provide a config dir. See https://docs.rs/dirs for more information.")?
            .join("veil"))
    }
}

/// Resolve and load the election configuration.
///
/// Layers, lowest first: built in defaults, the YAML file, `VEIL_` environment variables. A file
/// passed explicitly must exist; a discovered or default location may be absent, in which case
/// only defaults and the environment apply.
pub fn load_config(config_file: Option<String>) -> Result<ElectionConfig> {
    let cli_file = config_file.map(PathBuf::from);
    let cwd = env::current_dir()?;
    let config_dir = OsDirs::config_dir()?;

    let ResolvedPath { path, source } = resolve_config_path(
        find_in_parent,
        &cwd,
        &config_dir,
        DEFAULT_CONFIG_NAME,
        cli_file.as_deref(),
    );

    let yaml = match source {
        ConfigSource::Cli => Some(
            fs::read_to_string(&path)
                .with_context(|| format!("Configuration file not found: {}", path.display()))?,
        ),
        _ if path.is_file() => Some(
            fs::read_to_string(&path)
                .with_context(|| format!("Could not read configuration {}", path.display()))?,
        ),
        _ => {
            debug!(path = %path.display(), "no configuration file, using defaults");
            None
        }
    };

    let mut figment = Figment::from(Serialized::defaults(ElectionConfig::default()));
    if let Some(yaml) = yaml {
        figment = figment.merge(Yaml::string(&yaml));
    }

    let config: ElectionConfig = figment
        .merge(Env::prefixed(ENV_PREFIX).only(&[
            "name",
            "administrator",
            "election_address",
            "required_fee",
            "num_proposals",
        ]))
        .extract()
        .context("Could not parse configuration")?;

    config.validate()?;
    info!(name = %config.name, path = %path.display(), "configuration loaded");
    Ok(config)
}
