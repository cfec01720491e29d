// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `neurocable.toml`.

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct NeurocableConfig {
    pub cable: CableConstants,
    pub repair: RepairConfig,
    pub naming: NamingConfig,
}

/// Passive cable constants of the tissue, in SI units.
///
/// These are *specific* quantities (per membrane area or axial cross-section);
/// the synthesizer scales them by each compartment's geometry to obtain
/// absolute electrical values.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct CableConstants {
    /// Specific membrane resistance, ohm * m^2
    pub rm: f64,
    /// Specific axial resistivity, ohm * m
    pub ra: f64,
    /// Specific membrane capacitance, F / m^2
    pub cm: f64,
    /// Discretization target length, m. Carried through the synthesis
    /// contract; the per-compartment formulas apply uniformly regardless of
    /// further subdivision.
    pub lambda: f64,
}

impl Default for CableConstants {
    fn default() -> Self {
        Self {
            rm: 0.333,
            ra: 0.3,
            cm: 0.01,
            lambda: 100e-6,
        }
    }
}

/// Tolerances for structural validation and topology repair.
///
/// Both values are in micrometers, the native unit of SWC files.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct RepairConfig {
    /// Segments closer than this to their parent are eliminated and their
    /// children re-parented onto the grandparent.
    pub zero_length_epsilon_um: f64,
    /// Segments with a radius below this floor invalidate the morphology.
    /// Believe it or not, some otherwise reasonable files do have smaller
    /// radii.
    pub min_radius_um: f64,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            zero_length_epsilon_um: 1e-2,
            min_radius_um: 0.04,
        }
    }
}

/// How compartments derived from basal-tagged segments are named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BasalRelabel {
    /// Name basal compartments `dend...` when the tree contains basal-tagged
    /// segments and no dendrite-tagged ones. Some legacy SWC files label all
    /// non-soma, non-axon segments as basal.
    Heuristic,
    /// Always name basal compartments `basal...`.
    Preserve,
}

/// Compartment naming policy
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct NamingConfig {
    pub basal_relabel: BasalRelabel,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            basal_relabel: BasalRelabel::Heuristic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_physical() {
        let config = NeurocableConfig::default();
        assert!(config.cable.rm > 0.0);
        assert!(config.cable.ra > 0.0);
        assert!(config.cable.cm > 0.0);
        assert!(config.repair.zero_length_epsilon_um > 0.0);
        assert_eq!(config.repair.min_radius_um, 0.04);
        assert_eq!(config.naming.basal_relabel, BasalRelabel::Heuristic);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = NeurocableConfig::default();
        let text = toml::to_string(&config).unwrap();
        let back: NeurocableConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.cable.rm, config.cable.rm);
        assert_eq!(back.repair.min_radius_um, config.repair.min_radius_um);
        assert_eq!(back.naming.basal_relabel, config.naming.basal_relabel);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let text = r#"
            [cable]
            rm = 1.0
        "#;
        let config: NeurocableConfig = toml::from_str(text).unwrap();
        assert_eq!(config.cable.rm, 1.0);
        // Untouched sections fall back to defaults
        assert_eq!(config.cable.ra, 0.3);
        assert_eq!(config.repair.zero_length_epsilon_um, 1e-2);
    }
}
