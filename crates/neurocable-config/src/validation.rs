// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! This module provides validation logic to ensure configuration values are
//! physically meaningful before the pipeline runs with them.

use crate::{ConfigError, ConfigResult, NeurocableConfig};

/// Validation errors that can occur during config validation
#[derive(Debug, Clone)]
pub enum ConfigValidationError {
    NonPositive { field: String, value: f64 },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositive { field, value } => {
                write!(f, "{} = {} must be positive", field, value)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// Checks that every tissue constant and tolerance is strictly positive and
/// finite. Non-physical constants would otherwise surface much later as NaN
/// or infinite electrical parameters on individual compartments.
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` with details if validation fails
pub fn validate_config(config: &NeurocableConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    check_positive("cable.rm", config.cable.rm, &mut errors);
    check_positive("cable.ra", config.cable.ra, &mut errors);
    check_positive("cable.cm", config.cable.cm, &mut errors);
    check_positive("cable.lambda", config.cable.lambda, &mut errors);
    check_positive(
        "repair.zero_length_epsilon_um",
        config.repair.zero_length_epsilon_um,
        &mut errors,
    );
    check_positive("repair.min_radius_um", config.repair.min_radius_um, &mut errors);

    if config.repair.zero_length_epsilon_um >= 1.0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "repair.zero_length_epsilon_um".to_string(),
            reason: "must be well below 1 um; larger values would eliminate real segments"
                .to_string(),
        });
    }

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn check_positive(field: &str, value: f64, errors: &mut Vec<ConfigValidationError>) {
    if !(value.is_finite() && value > 0.0) {
        errors.push(ConfigValidationError::NonPositive {
            field: field.to_string(),
            value,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NeurocableConfig;

    #[test]
    fn test_default_config_is_valid() {
        let config = NeurocableConfig::default();
        let result = validate_config(&config);
        if let Err(e) = &result {
            eprintln!("Validation error: {}", e);
        }
        assert!(result.is_ok());
    }

    #[test]
    fn test_negative_rm_rejected() {
        let mut config = NeurocableConfig::default();
        config.cable.rm = -0.333;

        let result = validate_config(&config);
        assert!(result.is_err());

        if let Err(ConfigError::ValidationError(msg)) = result {
            assert!(msg.contains("cable.rm"));
        }
    }

    #[test]
    fn test_zero_epsilon_rejected() {
        let mut config = NeurocableConfig::default();
        config.repair.zero_length_epsilon_um = 0.0;

        let result = validate_config(&config);
        assert!(result.is_err());
    }

    #[test]
    fn test_huge_epsilon_rejected() {
        let mut config = NeurocableConfig::default();
        config.repair.zero_length_epsilon_um = 2.0;

        let result = validate_config(&config);
        assert!(result.is_err());

        if let Err(ConfigError::ValidationError(msg)) = result {
            assert!(msg.contains("zero_length_epsilon_um"));
        }
    }

    #[test]
    fn test_nan_constant_rejected() {
        let mut config = NeurocableConfig::default();
        config.cable.cm = f64::NAN;

        let result = validate_config(&config);
        assert!(result.is_err());
    }
}
