// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! The compartment-builder seam.
//!
//! The synthesizer never talks to the simulation framework directly; it
//! drives a [`CompartmentBuilder`]. Ownership of each compartment passes to
//! the builder at the `create_compartment` call, and the synthesizer keeps
//! only the returned opaque id for wiring.

use ahash::AHashMap;
use serde::Serialize;

use crate::compartment::CompartmentSpec;
use crate::{CableError, CableResult};

/// Opaque handle to a compartment owned by the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompartmentId(usize);

impl CompartmentId {
    pub fn new(index: usize) -> Self {
        CompartmentId(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// The narrow interface the external simulation framework provides.
pub trait CompartmentBuilder {
    /// Materialize one compartment. Names are caller-chosen but must be
    /// unique within one synthesis run.
    fn create_compartment(&mut self, name: &str, spec: &CompartmentSpec)
        -> CableResult<CompartmentId>;

    /// Establish bidirectional axial/raxial coupling between two
    /// already-created compartments.
    fn connect_axial(&mut self, parent: CompartmentId, child: CompartmentId) -> CableResult<()>;
}

/// A compartment as captured by [`RecordingBuilder`].
#[derive(Debug, Clone, Serialize)]
pub struct RecordedCompartment {
    pub name: String,
    pub spec: CompartmentSpec,
}

/// In-memory builder.
///
/// Records every compartment and axial link, rejecting duplicate names and
/// dangling ids. Used by the test suites and handy for inspecting a model
/// without a simulation framework attached.
#[derive(Debug, Default)]
pub struct RecordingBuilder {
    compartments: Vec<RecordedCompartment>,
    by_name: AHashMap<String, CompartmentId>,
    links: Vec<(CompartmentId, CompartmentId)>,
}

impl RecordingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compartments(&self) -> &[RecordedCompartment] {
        &self.compartments
    }

    pub fn links(&self) -> &[(CompartmentId, CompartmentId)] {
        &self.links
    }

    pub fn get(&self, id: CompartmentId) -> Option<&RecordedCompartment> {
        self.compartments.get(id.index())
    }

    pub fn find(&self, name: &str) -> Option<&RecordedCompartment> {
        self.by_name.get(name).and_then(|&id| self.get(id))
    }
}

impl CompartmentBuilder for RecordingBuilder {
    fn create_compartment(
        &mut self,
        name: &str,
        spec: &CompartmentSpec,
    ) -> CableResult<CompartmentId> {
        if self.by_name.contains_key(name) {
            return Err(CableError::DuplicateName(name.to_string()));
        }
        let id = CompartmentId::new(self.compartments.len());
        self.compartments.push(RecordedCompartment {
            name: name.to_string(),
            spec: spec.clone(),
        });
        self.by_name.insert(name.to_string(), id);
        Ok(id)
    }

    fn connect_axial(&mut self, parent: CompartmentId, child: CompartmentId) -> CableResult<()> {
        if parent.index() >= self.compartments.len() || child.index() >= self.compartments.len() {
            return Err(CableError::UnknownCompartment);
        }
        self.links.push((parent, child));
        Ok(())
    }
}
