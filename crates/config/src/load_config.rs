// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use path_clean::clean;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "veil.config.yaml";

pub type FindInParent = fn(&Path, &str) -> Option<PathBuf>;

/// Where a configuration path came from. Only an explicitly requested file is required to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    Cli,
    Found,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub path: PathBuf,
    pub source: ConfigSource,
}

pub fn find_in_parent(path: &Path, filename: &str) -> Option<PathBuf> {
    let mut current = path.to_path_buf();

    loop {
        let file_path = current.join(filename);
        if file_path.is_file() {
            return Some(file_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

pub fn resolve_config_path(
    find_in_parent: FindInParent,
    cwd: &Path,
    default_config_dir: &Path,
    default_filename: &str,
    cli_file: Option<&Path>,
) -> ResolvedPath {
    if let Some(cli_file) = cli_file {
        let path = if cli_file.is_absolute() {
            cli_file.to_path_buf()
        } else {
            clean(cwd.join(cli_file))
        };
        return ResolvedPath {
            path,
            source: ConfigSource::Cli,
        };
    }

    // search from cwd up
    if let Some(path) = find_in_parent(cwd, default_filename) {
        return ResolvedPath {
            path,
            source: ConfigSource::Found,
        };
    }

    ResolvedPath {
        path: clean(default_config_dir.join(default_filename)),
        source: ConfigSource::Default,
    }
}
