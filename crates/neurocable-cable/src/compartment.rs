// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Per-compartment geometry and passive electrical parameters.

use neurocable_config::CableConstants;
use neurocable_morphology::Segment;
use serde::{Deserialize, Serialize};

use crate::{CableError, CableResult};

/// Micrometers to meters
const UM_TO_M: f64 = 1e-6;
/// Square micrometers to square meters
const UM2_TO_M2: f64 = 1e-12;

/// One compartment's physical and electrical description, in SI units.
///
/// This is everything the external simulation framework needs to
/// materialize the compartment; no morphology types leak through it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompartmentSpec {
    /// Length, m
    pub length: f64,
    /// Diameter, m
    pub diameter: f64,
    /// Proximal endpoint, m
    pub proximal: [f64; 3],
    /// Distal endpoint, m
    pub distal: [f64; 3],
    /// Absolute membrane resistance, ohm
    pub rm: f64,
    /// Absolute axial resistance, ohm
    pub ra: f64,
    /// Absolute membrane capacitance, F
    pub cm: f64,
}

impl CompartmentSpec {
    /// Build the spec for one segment.
    ///
    /// Non-root compartments span from the parent segment's position to
    /// their own; their length is that distance. The structural root has no
    /// real parent, so by convention its length is its diameter and its
    /// proximal point is synthesized by stepping backward along the x axis.
    ///
    /// Unit conversion from micrometers happens here, exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`CableError::DegenerateGeometry`] for a non-positive length;
    /// topology repair removes such segments, so hitting this means the
    /// pipeline stages ran out of order.
    pub fn for_segment(
        segment: &Segment,
        parent: Option<&Segment>,
        constants: &CableConstants,
    ) -> CableResult<Self> {
        let (length_um, proximal_um) = match parent {
            Some(parent) => (segment.distance(parent), parent.position),
            None => {
                let length = 2.0 * segment.radius;
                (
                    length,
                    [
                        segment.position[0] - length,
                        segment.position[1],
                        segment.position[2],
                    ],
                )
            }
        };
        if !(length_um > 0.0) {
            return Err(CableError::DegenerateGeometry(format!(
                "segment at {:?} has length {} um",
                segment.position, length_um
            )));
        }

        let length = length_um * UM_TO_M;
        let diameter = 2.0 * segment.radius * UM_TO_M;
        // Cross-sectional area for axial resistance
        let xa = segment.radius * segment.radius * std::f64::consts::PI * UM2_TO_M2;
        // Lateral membrane area scales the specific constants
        let membrane_area = length * diameter * std::f64::consts::PI;

        Ok(CompartmentSpec {
            length,
            diameter,
            proximal: scale(proximal_um),
            distal: scale(segment.position),
            rm: constants.rm / membrane_area,
            ra: constants.ra * length / xa,
            cm: constants.cm * membrane_area,
        })
    }
}

fn scale(position_um: [f64; 3]) -> [f64; 3] {
    [
        position_um[0] * UM_TO_M,
        position_um[1] * UM_TO_M,
        position_um[2] * UM_TO_M,
    ]
}
