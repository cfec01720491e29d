// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Dense arena of morphology segments.
//!
//! Segments are stored in file order and addressed by [`SegmentHandle`].
//! Removal during topology repair is logical (the `valid` flag), never
//! physical, so handles are stable identifiers across every pipeline stage.

use std::ops::{Index, IndexMut};

use crate::segment::{Segment, SegmentHandle, SegmentKind};
use crate::{MorphologyError, MorphResult};

/// Owns the full ordered list of segments of one morphology.
#[derive(Debug, Clone, Default)]
pub struct SegmentArena {
    segments: Vec<Segment>,
}

impl SegmentArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a segment, returning its handle.
    pub fn push(&mut self, segment: Segment) -> SegmentHandle {
        let handle = SegmentHandle::new(self.segments.len());
        self.segments.push(segment);
        handle
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn get(&self, handle: SegmentHandle) -> Option<&Segment> {
        self.segments.get(handle.index())
    }

    /// Iterate `(handle, segment)` pairs in file order.
    pub fn iter(&self) -> impl Iterator<Item = (SegmentHandle, &Segment)> {
        self.segments
            .iter()
            .enumerate()
            .map(|(i, s)| (SegmentHandle::new(i), s))
    }

    /// Handle of the structural root, if one exists.
    pub fn root(&self) -> Option<SegmentHandle> {
        self.iter().find(|(_, s)| s.is_root()).map(|(h, _)| h)
    }

    /// Number of segments still participating in the tree.
    pub fn valid_count(&self) -> usize {
        self.segments.iter().filter(|s| s.valid).count()
    }

    /// Build the parent-to-children adjacency in a single pass.
    ///
    /// Structural validation runs before this, so a parent reference that
    /// points at the segment itself or outside the arena here is an
    /// internal-invariant failure, not a data error.
    pub fn assign_children(&mut self) -> MorphResult<()> {
        for i in 0..self.segments.len() {
            let handle = SegmentHandle::new(i);
            if let Some(parent) = self.segments[i].parent {
                if parent == handle {
                    return Err(MorphologyError::Corrupt(format!(
                        "segment {} lists itself as parent",
                        handle
                    )));
                }
                if parent.index() >= self.segments.len() {
                    return Err(MorphologyError::Corrupt(format!(
                        "segment {} references parent {} outside the arena",
                        handle, parent
                    )));
                }
                self.segments[parent.index()].children.push(handle);
            }
        }
        Ok(())
    }

    /// Collapse every segment's kind onto the synthesizer's vocabulary.
    pub fn resolve_kinds(&mut self) {
        for segment in &mut self.segments {
            segment.kind = segment.kind.resolve();
        }
    }

    /// Per-kind segment counts, in code order. Kinds with zero segments are
    /// omitted.
    pub fn kind_census(&self) -> Vec<(SegmentKind, usize)> {
        const KINDS: [SegmentKind; 8] = [
            SegmentKind::Undefined,
            SegmentKind::Soma,
            SegmentKind::Axon,
            SegmentKind::Basal,
            SegmentKind::Dendrite,
            SegmentKind::Fork,
            SegmentKind::End,
            SegmentKind::Custom,
        ];
        KINDS
            .iter()
            .filter_map(|&kind| {
                let count = self.segments.iter().filter(|s| s.kind == kind).count();
                (count > 0).then_some((kind, count))
            })
            .collect()
    }

    /// Fill each valid segment's cumulative geometric and electrotonic
    /// distance from the root.
    ///
    /// A single forward pass suffices: parents always precede children in
    /// file order (the orphan check enforces this, and repair only moves
    /// parents closer to the root).
    pub fn assign_path_measures(&mut self) {
        for i in 0..self.segments.len() {
            if !self.segments[i].valid {
                continue;
            }
            match self.segments[i].parent {
                None => {
                    self.segments[i].geom_from_root = 0.0;
                    self.segments[i].electro_from_root = 0.0;
                }
                Some(parent) => {
                    let d = self.segments[i].distance(&self.segments[parent.index()]);
                    let step = self.segments[i].electrotonic_step(d);
                    self.segments[i].geom_from_root =
                        self.segments[parent.index()].geom_from_root + d;
                    self.segments[i].electro_from_root =
                        self.segments[parent.index()].electro_from_root + step;
                }
            }
        }
    }
}

impl Index<SegmentHandle> for SegmentArena {
    type Output = Segment;

    fn index(&self, handle: SegmentHandle) -> &Segment {
        &self.segments[handle.index()]
    }
}

impl IndexMut<SegmentHandle> for SegmentArena {
    fn index_mut(&mut self, handle: SegmentHandle) -> &mut Segment {
        &mut self.segments[handle.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena_from_lines(lines: &[&str]) -> SegmentArena {
        let mut arena = SegmentArena::new();
        for line in lines {
            arena.push(Segment::from_swc_line(line).unwrap());
        }
        arena
    }

    #[test]
    fn test_assign_children() {
        let mut arena = arena_from_lines(&[
            "1 1 0 0 0 5.0 -1",
            "2 4 10 0 0 1.0 1",
            "3 4 20 0 0 1.0 2",
            "4 4 10 10 0 1.0 2",
        ]);
        arena.assign_children().unwrap();

        let h = |i: usize| SegmentHandle::new(i);
        assert_eq!(arena[h(0)].children, vec![h(1)]);
        assert_eq!(arena[h(1)].children, vec![h(2), h(3)]);
        assert!(arena[h(2)].children.is_empty());
        assert_eq!(arena.root(), Some(h(0)));
    }

    #[test]
    fn test_self_parent_is_corrupt() {
        let mut arena = arena_from_lines(&["1 1 0 0 0 5.0 -1", "2 4 10 0 0 1.0 2"]);
        let err = arena.assign_children().unwrap_err();
        assert!(matches!(err, MorphologyError::Corrupt(_)));
    }

    #[test]
    fn test_kind_census_after_resolution() {
        let mut arena = arena_from_lines(&[
            "1 1 0 0 0 5.0 -1",
            "2 7 10 0 0 1.0 1",
            "3 5 20 0 0 1.0 2",
        ]);
        arena.resolve_kinds();
        let census = arena.kind_census();
        assert_eq!(
            census,
            vec![(SegmentKind::Soma, 1), (SegmentKind::Dendrite, 2)]
        );
    }

    #[test]
    fn test_path_measures() {
        let mut arena = arena_from_lines(&[
            "1 1 0 0 0 4.0 -1",
            "2 4 3 4 0 1.0 1",
            "3 4 3 4 12 1.0 2",
        ]);
        arena.assign_children().unwrap();
        arena.assign_path_measures();

        let h = |i: usize| SegmentHandle::new(i);
        assert_eq!(arena[h(0)].geom_from_root, 0.0);
        assert!((arena[h(1)].geom_from_root - 5.0).abs() < 1e-12);
        assert!((arena[h(2)].geom_from_root - 17.0).abs() < 1e-12);
        // radius 1.0 makes the electrotonic measure equal the geometric one
        assert!((arena[h(2)].electro_from_root - 17.0).abs() < 1e-12);
    }
}
