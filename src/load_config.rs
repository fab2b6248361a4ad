/// `load_config` module: loads the optional YAML configuration file and resolves
/// the repository root the CLI should index.
///
/// # Responsibilities
/// - Parse the user-supplied YAML file into [`CliConfig`]; every key is optional
///   and falls back to the indexer defaults.
/// - Resolve the repository root from, in order: the `--root` flag, the `root`
///   key of the config file, the `CONTENT_TREE_ROOT` environment variable.
///
/// # Errors
/// All errors use `anyhow::Error` and are surfaced at the CLI boundary.
use anyhow::Result;
use content_tree_core::config::IndexerConfig;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub const ROOT_ENV_VAR: &str = "CONTENT_TREE_ROOT";

#[derive(Debug, Default, Deserialize)]
pub struct CliConfig {
    /// Repository root. Relative paths are taken relative to the config file.
    #[serde(default)]
    pub root: Option<PathBuf>,
    #[serde(default)]
    pub indexer: IndexerConfig,
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CliConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    // An empty file is a valid, all-defaults configuration.
    if config_content.trim().is_empty() {
        return Ok(CliConfig::default());
    }

    let mut config: CliConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    if let Some(root) = config.root.take() {
        let root = if root.is_relative() {
            path_ref.parent().unwrap_or(Path::new(".")).join(root)
        } else {
            root
        };
        config.root = Some(root);
    }

    Ok(config)
}

/// Picks the repository root: flag, then config file, then environment.
pub fn resolve_root(flag: Option<PathBuf>, config: &CliConfig) -> Result<PathBuf> {
    if let Some(root) = flag {
        info!(root = %root.display(), "Using repository root from command line");
        return Ok(root);
    }
    if let Some(root) = &config.root {
        info!(root = %root.display(), "Using repository root from config file");
        return Ok(root.clone());
    }
    match std::env::var(ROOT_ENV_VAR) {
        Ok(root) if !root.trim().is_empty() => {
            info!(root = %root, "Using repository root from environment");
            Ok(PathBuf::from(root))
        }
        _ => {
            error!("No repository root given");
            Err(anyhow::anyhow!(
                "No repository root given: pass --root, set `root` in the config file or set {ROOT_ENV_VAR}"
            ))
        }
    }
}
