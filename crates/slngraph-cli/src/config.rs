//! Layered configuration.
//!
//! Two optional TOML files feed one [`Config`]:
//!
//! - the user file `<config_dir>/slngraph/config.toml`,
//! - the project file `slngraph.toml` next to the solution (or the file
//!   given with `--config`).
//!
//! Project values override user values key by key; anything unset falls
//! back to the defaults below.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use slngraph_core::DEFAULT_RECURSION_LIMIT;
use slngraph_core::report::{DotOptions, RankDir};
use std::path::{Path, PathBuf};
use toml::{Table, Value};
use tracing::debug;

use crate::output::OutputMode;

/// Name of the per-solution config file.
pub const PROJECT_CONFIG_FILE: &str = "slngraph.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub dot: DotConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Drop stubs nothing references before answering queries.
    #[serde(default = "default_true")]
    pub strip_stubs: bool,
    #[serde(default = "default_recursion_limit")]
    pub recursion_limit: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            strip_stubs: default_true(),
            recursion_limit: default_recursion_limit(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DotConfig {
    #[serde(default)]
    pub rankdir: RankDir,
    #[serde(default)]
    pub pure_only: bool,
}

impl DotConfig {
    /// Rendering options after applying command-line overrides.
    pub fn options(&self, rankdir: Option<RankDir>, pure_only: bool) -> DotOptions {
        DotOptions {
            rankdir: rankdir.unwrap_or(self.rankdir),
            pure_only: pure_only || self.pure_only,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: Option<OutputMode>,
}

const fn default_true() -> bool {
    true
}

const fn default_recursion_limit() -> usize {
    DEFAULT_RECURSION_LIMIT
}

/// Location of the user config file, if the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("slngraph").join("config.toml"))
}

/// Default project config location for a solution file.
pub fn project_config_path(solution: &Path) -> PathBuf {
    solution
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(PROJECT_CONFIG_FILE)
}

/// Load the effective config for `solution`.
///
/// An explicit `--config` file must exist; the default locations are
/// optional.
///
/// # Errors
///
/// Returns an error if a config file cannot be read or parsed.
pub fn load_config(solution: Option<&Path>, explicit: Option<&Path>) -> Result<Config> {
    let project = match explicit {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("config file '{}' not found", path.display());
            }
            Some(path.to_path_buf())
        }
        None => solution.map(project_config_path),
    };
    load_layers(user_config_path().as_deref(), project.as_deref())
}

/// Merge the user and project layers into one config.
///
/// # Errors
///
/// Returns an error if either file cannot be read or parsed.
pub fn load_layers(user: Option<&Path>, project: Option<&Path>) -> Result<Config> {
    let mut merged = Table::new();
    for path in [user, project].into_iter().flatten() {
        if let Some(layer) = read_table(path)? {
            debug!(path = %path.display(), "applying config layer");
            merge_tables(&mut merged, layer);
        }
    }
    Value::Table(merged)
        .try_into::<Config>()
        .context("invalid slngraph configuration")
}

fn read_table(path: &Path) -> Result<Option<Table>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let table = toml::from_str::<Table>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(Some(table))
}

fn merge_tables(base: &mut Table, overlay: Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(Value::Table(existing)), Value::Table(nested)) => merge_tables(existing, nested),
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}
