// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! One parsed SWC morphology record and its derived attributes.

use std::fmt;

/// Categorical tag of an SWC segment.
///
/// The numeric codes follow the SWC convention; codes above `Custom` parse
/// as `Custom`. Only `Soma`, `Axon`, and `Basal` survive
/// [`SegmentKind::resolve`]; downstream naming does not distinguish finer
/// codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    Undefined,
    Soma,
    Axon,
    Basal,
    Dendrite,
    Fork,
    End,
    Custom,
}

impl SegmentKind {
    /// Map an SWC type code to a kind. Unknown codes are `Custom`.
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => SegmentKind::Undefined,
            1 => SegmentKind::Soma,
            2 => SegmentKind::Axon,
            3 => SegmentKind::Basal,
            4 => SegmentKind::Dendrite,
            5 => SegmentKind::Fork,
            6 => SegmentKind::End,
            _ => SegmentKind::Custom,
        }
    }

    /// Collapse the kind onto the set the model synthesizer distinguishes.
    ///
    /// Soma, Basal, and Axon are preserved; everything else (including fork
    /// and end markers, which are assumed to sit on regular dendrite) falls
    /// back to `Dendrite`.
    pub fn resolve(self) -> Self {
        match self {
            SegmentKind::Soma | SegmentKind::Basal | SegmentKind::Axon => self,
            _ => SegmentKind::Dendrite,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SegmentKind::Undefined => "undefined",
            SegmentKind::Soma => "soma",
            SegmentKind::Axon => "axon",
            SegmentKind::Basal => "basal",
            SegmentKind::Dendrite => "dend",
            SegmentKind::Fork => "fork",
            SegmentKind::End => "end",
            SegmentKind::Custom => "custom",
        }
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Stable, zero-based handle into a [`crate::SegmentArena`].
///
/// Handles are assigned by file order and never reused; eliminated segments
/// keep their slot so handles held elsewhere stay meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SegmentHandle(usize);

impl SegmentHandle {
    pub fn new(index: usize) -> Self {
        SegmentHandle(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SegmentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 1-based, matching the indices as written in SWC files
        write!(f, "#{}", self.0 + 1)
    }
}

/// One morphology record: geometry, tree linkage, and derived attributes.
#[derive(Debug, Clone)]
pub struct Segment {
    /// Index token as written in the file. Diagnostic only; file order is
    /// the ground truth for identity.
    pub declared_index: i64,
    pub kind: SegmentKind,
    /// Position in micrometers
    pub position: [f64; 3],
    /// Radius in micrometers
    pub radius: f64,
    /// `None` is the root sentinel
    pub parent: Option<SegmentHandle>,
    /// Populated by [`crate::SegmentArena::assign_children`]
    pub children: Vec<SegmentHandle>,
    /// Cleared when the segment is eliminated during topology repair
    pub valid: bool,
    /// Cumulative path length from the root, micrometers
    pub geom_from_root: f64,
    /// Cumulative electrotonic length from the root
    pub electro_from_root: f64,
}

impl Segment {
    /// Parse one SWC record line: `index type x y z radius parent`.
    ///
    /// Returns `None` unless the line splits into exactly 7 whitespace
    /// tokens that all parse numerically. A parent value of 0 or below
    /// normalizes to the root sentinel.
    pub fn from_swc_line(line: &str) -> Option<Segment> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != 7 {
            return None;
        }
        let declared_index: i64 = tokens[0].parse().ok()?;
        let code: i64 = tokens[1].parse().ok()?;
        let x: f64 = tokens[2].parse().ok()?;
        let y: f64 = tokens[3].parse().ok()?;
        let z: f64 = tokens[4].parse().ok()?;
        let radius: f64 = tokens[5].parse().ok()?;
        let parent_raw: i64 = tokens[6].parse().ok()?;

        let parent = if parent_raw > 0 {
            Some(SegmentHandle::new(parent_raw as usize - 1))
        } else {
            None
        };

        Some(Segment {
            declared_index,
            kind: SegmentKind::from_code(code),
            position: [x, y, z],
            radius,
            parent,
            children: Vec::new(),
            valid: true,
            geom_from_root: 0.0,
            electro_from_root: 0.0,
        })
    }

    /// Euclidean 3D distance to another segment, micrometers.
    pub fn distance(&self, other: &Segment) -> f64 {
        let dx = self.position[0] - other.position[0];
        let dy = self.position[1] - other.position[1];
        let dz = self.position[2] - other.position[2];
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Electrotonic contribution of an edge of length `edge_len` ending at
    /// this segment.
    ///
    /// The cable length constant scales with `sqrt(radius)`; the tissue
    /// constants factor out at this stage, so the contribution is
    /// `edge_len / sqrt(radius)`. The root's virtual start length
    /// (`radius` geometric) yields `sqrt(radius)` under the same rule.
    pub fn electrotonic_step(&self, edge_len: f64) -> f64 {
        edge_len / self.radius.sqrt()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
