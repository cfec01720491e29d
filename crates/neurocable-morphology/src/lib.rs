// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# Neurocable Morphology

Ingestion and structural preparation of neuronal morphologies in the SWC
format. This crate owns the first four stages of the pipeline:

1. **Ingest**: line-oriented SWC parsing into a dense segment arena
2. **Validation**: global tree-shape invariants (single root, no orphans,
   radius floor) reported as an immutable diagnostics struct
3. **Topology repair**: elimination of zero-length segments with
   grandparent re-parenting
4. **Branch extraction**: partitioning the repaired tree into maximal
   unbranched runs with parent linkage and an explicit topological order

The electrical model built on top of these branches lives in
`neurocable-cable`.

## Usage

```rust,no_run
use neurocable_morphology::load_morphology_from_file;

let morph = load_morphology_from_file("cell.swc").expect("readable file");
if morph.is_valid() {
    println!("{} branches", morph.branches().len());
} else {
    println!("rejected: {}", morph.report());
}
```

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod arena;
pub mod branch;
pub mod loader;
pub mod repair;
pub mod segment;
pub mod validation;

pub use arena::SegmentArena;
pub use branch::{extract_branches, topological_order, Branch, BranchId};
pub use loader::{load_morphology, load_morphology_from_file, load_morphology_from_file_with, Morphology};
pub use repair::eliminate_zero_length;
pub use segment::{Segment, SegmentHandle, SegmentKind};
pub use validation::{validate_arena, ValidationReport};

/// Errors that can occur during morphology operations
#[derive(Debug, thiserror::Error)]
pub enum MorphologyError {
    #[error("I/O error reading morphology: {0}")]
    Io(#[from] std::io::Error),

    /// An internal linkage invariant was violated. This indicates a bug in
    /// an upstream stage, not malformed input; malformed input is reported
    /// through [`ValidationReport`] instead.
    #[error("Corrupt morphology structure: {0}")]
    Corrupt(String),
}

/// Result type for morphology operations
pub type MorphResult<T> = Result<T, MorphologyError>;
