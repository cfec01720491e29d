// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the tiered configuration loading system:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)

use crate::{ConfigError, ConfigResult, NeurocableConfig};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Find the neurocable configuration file
///
/// Search order:
/// 1. `NEUROCABLE_CONFIG_PATH` environment variable
/// 2. Current working directory: `./neurocable.toml`
/// 3. Parent directories (searches up to 5 levels)
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    // 1. Check environment variable first
    if let Ok(env_path) = env::var("NEUROCABLE_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        } else {
            return Err(ConfigError::FileNotFound(format!(
                "Config file specified by NEUROCABLE_CONFIG_PATH not found: {}",
                path.display()
            )));
        }
    }

    // 2. Search in common locations
    let mut search_paths = Vec::new();

    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join("neurocable.toml"));

        // Search up to 5 levels for workspace root
        let mut current = cwd.clone();
        for _ in 0..5 {
            if let Some(parent) = current.parent() {
                search_paths.push(parent.join("neurocable.toml"));
                current = parent.to_path_buf();
            }
        }
    }

    for path in &search_paths {
        if path.exists() {
            return Ok(path.clone());
        }
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "Configuration file 'neurocable.toml' not found in any of these locations:\n{}\n\nSet NEUROCABLE_CONFIG_PATH environment variable to specify custom location.",
        search_list
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
///
/// # Returns
///
/// Complete `NeurocableConfig` with environment overrides applied
///
/// # Errors
///
/// Returns error if config file is not found, contains invalid TOML, or fails validation
pub fn load_config(config_path: Option<&Path>) -> ConfigResult<NeurocableConfig> {
    let config_file = if let Some(path) = config_path {
        path.to_path_buf()
    } else {
        find_config_file()?
    };

    let content = fs::read_to_string(&config_file)?;

    let mut config: NeurocableConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);

    crate::validation::validate_config(&config)?;

    Ok(config)
}

/// Apply `NEUROCABLE_*` environment variable overrides in place.
///
/// Recognized variables:
/// - `NEUROCABLE_RM`, `NEUROCABLE_RA`, `NEUROCABLE_CM`, `NEUROCABLE_LAMBDA`
/// - `NEUROCABLE_ZERO_LENGTH_EPSILON_UM`, `NEUROCABLE_MIN_RADIUS_UM`
///
/// Variables that fail to parse as numbers are ignored, leaving the file
/// value in place.
pub fn apply_environment_overrides(config: &mut NeurocableConfig) {
    override_f64("NEUROCABLE_RM", &mut config.cable.rm);
    override_f64("NEUROCABLE_RA", &mut config.cable.ra);
    override_f64("NEUROCABLE_CM", &mut config.cable.cm);
    override_f64("NEUROCABLE_LAMBDA", &mut config.cable.lambda);
    override_f64(
        "NEUROCABLE_ZERO_LENGTH_EPSILON_UM",
        &mut config.repair.zero_length_epsilon_um,
    );
    override_f64("NEUROCABLE_MIN_RADIUS_UM", &mut config.repair.min_radius_um);
}

fn override_f64(var: &str, slot: &mut f64) {
    if let Ok(raw) = env::var(var) {
        if let Ok(value) = raw.trim().parse::<f64>() {
            *slot = value;
        }
    }
}
