//! # Neurocable - Morphology to Cable Model
//!
//! Neurocable converts raw neuronal-morphology descriptions (the SWC format)
//! into validated branch-structured trees and then into cable-theory
//! compartmental models ready for a numerical simulator.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! neurocable = "0.1"
//! ```
//!
//! ```rust,no_run
//! use neurocable::prelude::*;
//!
//! // Load and validate a reconstruction
//! let morph = load_morphology_from_file("cell.swc")?;
//! assert!(morph.is_valid(), "{}", morph.report());
//!
//! // Build the electrical model through the builder seam
//! let mut builder = RecordingBuilder::new();
//! let report = synthesize(
//!     &morph,
//!     &CableConstants::default(),
//!     &NamingConfig::default(),
//!     &mut builder,
//! )?;
//! println!("{} compartments", report.compartments);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: neurocable-config                          │
//! │  (tissue constants, tolerances, naming policy)          │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Morphology: neurocable-morphology                      │
//! │  (SWC ingest, validation, repair, branch extraction)    │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Synthesis: neurocable-cable                            │
//! │  (compartment specs, naming, axial wiring)              │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The simulation framework that consumes the compartments stays outside;
//! it plugs in by implementing `CompartmentBuilder`.
//!
//! ## License
//!
//! Apache-2.0

// Re-export foundation
pub use neurocable_config as config;

// Re-export morphology pipeline
pub use neurocable_morphology as morphology;

// Re-export model synthesis
pub use neurocable_cable as cable;

/// Prelude - commonly used types and functions
pub mod prelude {
    pub use crate::cable::{
        synthesize, CompartmentBuilder, CompartmentId, CompartmentSpec, RecordingBuilder,
        SynthesisReport,
    };
    pub use crate::config::{
        load_config, BasalRelabel, CableConstants, NamingConfig, NeurocableConfig, RepairConfig,
    };
    pub use crate::morphology::{
        load_morphology, load_morphology_from_file, Branch, BranchId, Morphology, Segment,
        SegmentHandle, SegmentKind, ValidationReport,
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_facade_imports() {
        // Just test that re-exports work
        use crate::prelude::*;
        let _constants = CableConstants::default();
        let _handle = SegmentHandle::new(0);
    }
}
