// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Topology repair: zero-length elimination.
//!
//! Some reconstructions carry segments geometrically coincident with their
//! parent. Such segments contribute no cable and would produce degenerate
//! compartments, so they are removed and their children re-parented onto the
//! grandparent. Removal is logical; handles stay stable.

use tracing::debug;

use crate::arena::SegmentArena;

/// Eliminate segments whose distance to their parent is below `epsilon_um`.
///
/// Processing is file order starting from the first non-root segment, so a
/// parent is fully resolved before its children are considered; chains of
/// consecutive zero-length segments collapse onto the nearest surviving
/// ancestor. Already-invalid segments are skipped, which makes a second run
/// over repaired data a no-op.
///
/// Returns the number of segments eliminated.
pub fn eliminate_zero_length(arena: &mut SegmentArena, epsilon_um: f64) -> usize {
    let mut removed = 0;
    for i in 0..arena.len() {
        let handle = crate::SegmentHandle::new(i);
        if !arena[handle].valid {
            continue;
        }
        let Some(parent) = arena[handle].parent else {
            continue;
        };
        let d = arena[handle].distance(&arena[parent]);
        if d >= epsilon_um {
            continue;
        }

        // Unlink from the parent, then hand every child over to it.
        let children = std::mem::take(&mut arena[handle].children);
        let num_children = children.len();
        arena[parent].children.retain(|&k| k != handle);
        for &child in &children {
            arena[child].parent = Some(parent);
        }
        arena[parent].children.extend(children);
        arena[handle].valid = false;
        removed += 1;

        debug!(
            target: "neurocable-morphology",
            "eliminated zero-length segment {} ({} children re-parented onto {})",
            handle, num_children, parent
        );
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::{Segment, SegmentHandle};

    const EPSILON_UM: f64 = 1e-2;

    fn prepared_arena(lines: &[&str]) -> SegmentArena {
        let mut arena = SegmentArena::new();
        for line in lines {
            arena.push(Segment::from_swc_line(line).unwrap());
        }
        arena.assign_children().unwrap();
        arena
    }

    #[test]
    fn test_reparenting_onto_grandparent() {
        // root(1) -> A(2, 0.001 um away) -> B(3, 5 um further)
        let mut arena = prepared_arena(&[
            "1 1 0 0 0 5.0 -1",
            "2 4 0.001 0 0 1.0 1",
            "3 4 5.001 0 0 1.0 2",
        ]);
        let removed = eliminate_zero_length(&mut arena, EPSILON_UM);
        assert_eq!(removed, 1);

        let h = |i: usize| SegmentHandle::new(i);
        assert!(!arena[h(1)].valid);
        assert_eq!(arena[h(2)].parent, Some(h(0)));
        assert!(arena[h(0)].children.contains(&h(2)));
        assert!(!arena[h(0)].children.contains(&h(1)));
    }

    #[test]
    fn test_chain_of_zero_length_segments() {
        // Two consecutive degenerate segments collapse onto the root
        let mut arena = prepared_arena(&[
            "1 1 0 0 0 5.0 -1",
            "2 4 0.001 0 0 1.0 1",
            "3 4 0.002 0 0 1.0 2",
            "4 4 8.0 0 0 1.0 3",
        ]);
        let removed = eliminate_zero_length(&mut arena, EPSILON_UM);
        assert_eq!(removed, 2);

        let h = |i: usize| SegmentHandle::new(i);
        assert!(!arena[h(1)].valid);
        assert!(!arena[h(2)].valid);
        assert_eq!(arena[h(3)].parent, Some(h(0)));
        assert_eq!(arena[h(0)].children, vec![h(3)]);
    }

    #[test]
    fn test_healthy_tree_untouched() {
        let mut arena = prepared_arena(&[
            "1 1 0 0 0 5.0 -1",
            "2 4 10 0 0 1.0 1",
            "3 4 20 0 0 1.0 2",
        ]);
        assert_eq!(eliminate_zero_length(&mut arena, EPSILON_UM), 0);
        assert!(arena.iter().all(|(_, s)| s.valid));
    }

    #[test]
    fn test_repair_is_idempotent() {
        let lines = [
            "1 1 0 0 0 5.0 -1",
            "2 4 0.001 0 0 1.0 1",
            "3 4 5.0 0 0 1.0 2",
            "4 4 5.0005 0 0 1.0 3",
            "5 4 15.0 0 0 1.0 4",
        ];
        let mut arena = prepared_arena(&lines);
        let first = eliminate_zero_length(&mut arena, EPSILON_UM);
        assert!(first >= 2);
        let snapshot: Vec<_> = arena
            .iter()
            .map(|(_, s)| (s.parent, s.children.clone(), s.valid))
            .collect();

        let second = eliminate_zero_length(&mut arena, EPSILON_UM);
        assert_eq!(second, 0);
        let after: Vec<_> = arena
            .iter()
            .map(|(_, s)| (s.parent, s.children.clone(), s.valid))
            .collect();
        assert_eq!(snapshot, after);
    }

    #[test]
    fn test_no_adjacent_pair_below_epsilon_after_repair() {
        let mut arena = prepared_arena(&[
            "1 1 0 0 0 5.0 -1",
            "2 4 0.001 0 0 1.0 1",
            "3 4 0.002 0 0 1.0 2",
            "4 4 0.003 0.001 0 1.0 3",
            "5 4 9.0 0 0 1.0 4",
        ]);
        eliminate_zero_length(&mut arena, EPSILON_UM);

        for (_, seg) in arena.iter() {
            if !seg.valid {
                continue;
            }
            if let Some(parent) = seg.parent {
                assert!(seg.distance(&arena[parent]) >= EPSILON_UM);
            }
        }
    }
}
