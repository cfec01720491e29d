// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# Neurocable Cable

Synthesis of a cable-theory compartmental model from a validated, repaired,
branch-structured morphology (see `neurocable-morphology`).

Each valid segment becomes one electrical compartment. Geometry converts
from micrometers to SI units exactly once, the passive electrical values
follow the standard cable relations scaled by compartment area, and every
non-root compartment is wired to its parent through a single bidirectional
axial connection.

The simulation framework that owns the compartments afterwards is reached
only through the [`CompartmentBuilder`] trait; the in-memory
[`RecordingBuilder`] implements it for tests and offline inspection.

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod builder;
pub mod compartment;
pub mod synthesis;

pub use builder::{CompartmentBuilder, CompartmentId, RecordedCompartment, RecordingBuilder};
pub use compartment::CompartmentSpec;
pub use synthesis::{synthesize, SynthesisReport};

use neurocable_morphology::MorphologyError;

/// Errors that can occur during model synthesis
#[derive(Debug, thiserror::Error)]
pub enum CableError {
    #[error("morphology failed validation and cannot be synthesized: {0}")]
    InvalidMorphology(String),

    #[error("degenerate compartment geometry: {0}")]
    DegenerateGeometry(String),

    #[error("duplicate compartment name: {0}")]
    DuplicateName(String),

    #[error("unknown compartment id in axial connection")]
    UnknownCompartment,

    #[error("compartment {0} has no materialized parent")]
    MissingParentCompartment(String),

    #[error("synthesis incomplete: created {created} of {expected} compartments")]
    Incomplete { created: usize, expected: usize },

    #[error(transparent)]
    Morphology(#[from] MorphologyError),
}

/// Result type for synthesis operations
pub type CableResult<T> = Result<T, CableError>;
