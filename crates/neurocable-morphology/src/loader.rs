// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Morphology loading pipeline.

Orchestrates the stages in order, each completing before the next begins:

1. **Ingest**: parse SWC records into the arena (bad lines counted)
2. **Validation**: tree-shape invariants; failure stops the pipeline here
3. **Children / kinds**: adjacency construction and type resolution
4. **Repair**: zero-length elimination
5. **Path measures**: cumulative distances from the root
6. **Branch extraction**: maximal unbranched runs with parent links

The pipeline is synchronous and owns its data throughout; a missing or
unreadable file aborts immediately with an error, leaving nothing behind.

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use neurocable_config::RepairConfig;
use tracing::{debug, info, warn};

use crate::arena::SegmentArena;
use crate::branch::{extract_branches, Branch};
use crate::segment::Segment;
use crate::validation::{validate_arena, ValidationReport};
use crate::MorphResult;

/// A fully loaded morphology: the segment arena, the derived branch list,
/// and the validation diagnostics.
///
/// When validation fails the branch list is empty and [`Morphology::is_valid`]
/// is false; the arena and report are still returned so the caller can see
/// exactly what was wrong.
#[derive(Debug, Clone)]
pub struct Morphology {
    arena: SegmentArena,
    branches: Vec<Branch>,
    report: ValidationReport,
    zero_length_removed: usize,
}

impl Morphology {
    pub fn arena(&self) -> &SegmentArena {
        &self.arena
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    /// Whether repair, branch extraction, and synthesis ran.
    pub fn is_valid(&self) -> bool {
        self.report.is_valid()
    }

    /// Segments eliminated during zero-length repair.
    pub fn zero_length_removed(&self) -> usize {
        self.zero_length_removed
    }
}

/// Load a morphology from an SWC file with default repair tolerances.
pub fn load_morphology_from_file(path: impl AsRef<Path>) -> MorphResult<Morphology> {
    load_morphology_from_file_with(path, &RepairConfig::default())
}

/// Load a morphology from an SWC file with explicit repair tolerances.
pub fn load_morphology_from_file_with(
    path: impl AsRef<Path>,
    repair: &RepairConfig,
) -> MorphResult<Morphology> {
    let path = path.as_ref();
    let file = File::open(path)?;
    info!(
        target: "neurocable-morphology",
        "reading morphology from {}",
        path.display()
    );
    load_morphology(BufReader::new(file), repair)
}

/// Run the full loading pipeline over SWC text from any buffered reader.
pub fn load_morphology<R: BufRead>(reader: R, repair: &RepairConfig) -> MorphResult<Morphology> {
    let (mut arena, bad_lines) = ingest(reader)?;

    let report = validate_arena(&arena, bad_lines, repair.min_radius_um);
    if !report.is_valid() {
        warn!(
            target: "neurocable-morphology",
            "morphology failed structural validation: {}",
            report
        );
        return Ok(Morphology {
            arena,
            branches: Vec::new(),
            report,
            zero_length_removed: 0,
        });
    }

    arena.assign_children()?;
    arena.resolve_kinds();
    let zero_length_removed =
        crate::repair::eliminate_zero_length(&mut arena, repair.zero_length_epsilon_um);
    arena.assign_path_measures();
    let branches = extract_branches(&arena)?;

    info!(
        target: "neurocable-morphology",
        "loaded morphology: {} segments ({} bad lines), {} branches, {} zero-length eliminated",
        arena.len(),
        bad_lines,
        branches.len(),
        zero_length_removed
    );
    for (kind, count) in arena.kind_census() {
        debug!(target: "neurocable-morphology", "  {:>10}: {}", kind.label(), count);
    }

    Ok(Morphology {
        arena,
        branches,
        report,
        zero_length_removed,
    })
}

/// Read SWC text line by line. Blank and whitespace-only lines, and lines
/// whose first non-blank character is `#`, are skipped. Anything else must
/// parse as a record or it is counted against `bad_lines`.
fn ingest<R: BufRead>(reader: R) -> MorphResult<(SegmentArena, usize)> {
    let mut arena = SegmentArena::new();
    let mut bad_lines = 0;
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match Segment::from_swc_line(&line) {
            Some(segment) => {
                arena.push(segment);
            }
            None => {
                bad_lines += 1;
                debug!(
                    target: "neurocable-morphology",
                    "skipping unparsable record: {:?}",
                    line
                );
            }
        }
    }
    Ok((arena, bad_lines))
}
