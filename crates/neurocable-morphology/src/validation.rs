// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Global tree-shape validation.
//!
//! Validation runs on the raw arena before any derived structure is built.
//! It never mutates; the outcome is an immutable [`ValidationReport`] the
//! caller keeps alongside the morphology.

use serde::{Deserialize, Serialize};

use crate::arena::SegmentArena;

/// Counters describing everything validation saw.
///
/// Only three of the counters gate usability (see [`ValidationReport::is_valid`]);
/// `bad_lines` and `bad_index` are diagnostics. The struct is serializable
/// so callers can persist or ship diagnostics as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Segments successfully parsed into the arena
    pub num_segments: usize,
    /// Input lines that were not blank, not comments, and still failed to parse
    pub bad_lines: usize,
    /// Segments carrying the root sentinel; must be exactly 1
    pub num_roots: usize,
    /// Parent references pointing at the segment itself or a not-yet-declared
    /// segment; must be 0
    pub num_orphans: usize,
    /// Declared index tokens that disagree with file position; non-fatal
    pub bad_index: usize,
    /// Segments with a radius below the configured floor; must be 0
    pub bad_radius: usize,
}

impl ValidationReport {
    /// Whether the structure is sound enough for repair, branch extraction,
    /// and synthesis to run. Index mismatches alone do not invalidate.
    pub fn is_valid(&self) -> bool {
        self.num_roots == 1 && self.num_orphans == 0 && self.bad_radius == 0
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "segments = {}, bad lines = {}, roots = {}, orphans = {}, bad index = {}, bad radius = {}",
            self.num_segments,
            self.bad_lines,
            self.num_roots,
            self.num_orphans,
            self.bad_index,
            self.bad_radius
        )
    }
}

/// Validate global tree-shape invariants over the ingested arena.
///
/// For every segment at file position `i` (0-based):
/// - declared index should equal `i + 1` (counted as `bad_index` otherwise)
/// - a root-sentinel parent counts toward `num_roots`
/// - a non-root parent must reference a strictly earlier file position;
///   references to the segment itself or anything later count as orphans
/// - radius must be at least `min_radius_um`
pub fn validate_arena(
    arena: &SegmentArena,
    bad_lines: usize,
    min_radius_um: f64,
) -> ValidationReport {
    let mut report = ValidationReport {
        num_segments: arena.len(),
        bad_lines,
        ..Default::default()
    };

    for (handle, segment) in arena.iter() {
        let i = handle.index();
        if segment.declared_index != (i + 1) as i64 {
            report.bad_index += 1;
        }
        match segment.parent {
            None => report.num_roots += 1,
            Some(parent) => {
                if parent.index() >= i {
                    report.num_orphans += 1;
                }
            }
        }
        if segment.radius < min_radius_um {
            report.bad_radius += 1;
        }
    }

    report
}
