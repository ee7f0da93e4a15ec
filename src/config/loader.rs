use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::EngineConfig;
use crate::errors::MetricError;

/// File name searched for in the working directory and its ancestors.
pub const CONFIG_FILE_NAME: &str = ".ux-metrics.toml";

/// Directories checked, the starting one included.
const MAX_TRAVERSAL_DEPTH: usize = 10;

pub(crate) fn read_config_file(path: &Path) -> Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(contents: &str) -> Result<EngineConfig, MetricError> {
    let config: EngineConfig = match toml::from_str(contents) {
        Ok(config) => config,
        Err(e) => {
            let message = format!("Failed to parse {CONFIG_FILE_NAME}: {e}");
            return Err(MetricError::config(message, None));
        }
    };
    config.validate().map_err(|e| MetricError::config(e, None))?;
    Ok(config)
}

/// Read and parse one configuration file.
pub fn load_config_file(path: &Path) -> Result<EngineConfig, MetricError> {
    let contents = read_config_file(path)
        .map_err(|e| MetricError::config_unreadable(e.to_string(), path.to_path_buf()))?;
    parse_config(&contents).map_err(|err| match err {
        MetricError::Config { code, message, .. } => MetricError::Config {
            code,
            message,
            path: Some(path.to_path_buf()),
        },
        other => other,
    })
}

pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<EngineConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_config(&contents) {
        Ok(config) => {
            tracing::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            tracing::warn!(code = %e.code(), "{e}. Skipping {}", config_path.display());
            None
        }
    }
}

fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // Absent files are the normal case while walking up the tree.
    if error.kind() != std::io::ErrorKind::NotFound {
        tracing::warn!(
            "Failed to read config file {}: {}. Skipping.",
            config_path.display(),
            error
        );
    }
}

/// `start` followed by its ancestors, at most `max_depth` directories.
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Nearest configuration at or above `start`, or defaults when none is
/// usable.
pub fn load_config_from(start: &Path) -> EngineConfig {
    directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            tracing::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            EngineConfig::default()
        })
}

/// Nearest configuration at or above the current directory.
pub fn load_config() -> EngineConfig {
    match std::env::current_dir() {
        Ok(current) => load_config_from(&current),
        Err(e) => {
            tracing::warn!("Failed to get current directory: {e}. Using default config.");
            EngineConfig::default()
        }
    }
}
