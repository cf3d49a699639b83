// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::Result;
use veil_config::ElectionConfig;

pub fn execute(config: &ElectionConfig) -> Result<()> {
    print!("{}", config.to_yaml()?);
    Ok(())
}
