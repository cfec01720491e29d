// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Branch extraction.
//!
//! A branch is a maximal unbranched run of segments between two topological
//! decision points (fork, leaf, or the root). Branches are derived in a
//! single pass over the repaired arena and are immutable once built.
//!
//! Discovery order carries no topological guarantee: a branch may appear in
//! the list before its parent branch. Consumers that need parents first must
//! use [`topological_order`].

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;

use ahash::AHashMap;

use crate::arena::SegmentArena;
use crate::segment::{Segment, SegmentHandle};
use crate::{MorphologyError, MorphResult};

/// Identifier of a branch, assigned in discovery order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BranchId(usize);

impl BranchId {
    pub fn new(index: usize) -> Self {
        BranchId(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for BranchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "branch {}", self.0)
    }
}

/// One maximal unbranched run of segments.
#[derive(Debug, Clone)]
pub struct Branch {
    pub id: BranchId,
    /// The fork, leaf, or root segment that triggered creation
    pub head: SegmentHandle,
    /// Proximal to distal; the head is the last entry. The parent branch's
    /// terminal segment is excluded.
    pub chain: Vec<SegmentHandle>,
    /// Physical path length along the chain, micrometers
    pub geom_length: f64,
    /// Electrotonic path length along the chain
    pub electro_length: f64,
    /// `None` only for the structural root branch
    pub parent: Option<BranchId>,
    /// Radius at the proximal end of the run, micrometers
    pub r0: f64,
    /// Radius at the distal end of the run, micrometers
    pub r1: f64,
}

/// A segment heads a branch when it is valid and is the root, a leaf, or a
/// fork. Segments with exactly one child are interior to some branch.
///
/// The root heads a branch unconditionally: with a single child it would
/// otherwise belong to no chain at all, and every valid segment must land in
/// exactly one branch.
fn is_branch_head(segment: &Segment) -> bool {
    segment.valid && (segment.is_root() || segment.children.len() != 1)
}

/// Partition the repaired tree into branches and link branch parentage.
///
/// # Errors
///
/// Returns [`MorphologyError::Corrupt`] when a branch's proximal attachment
/// point is not the head segment of some other branch. That cannot happen
/// for a tree produced by validation and repair; it indicates an upstream
/// bug.
pub fn extract_branches(arena: &SegmentArena) -> MorphResult<Vec<Branch>> {
    let mut branches = Vec::new();
    for (handle, segment) in arena.iter() {
        if !is_branch_head(segment) {
            continue;
        }
        let (chain, geom_length, electro_length) = traverse_branch(arena, handle);
        let id = BranchId::new(branches.len());
        let r0 = arena[chain[0]].radius;
        let r1 = arena[handle].radius;
        branches.push(Branch {
            id,
            head: handle,
            chain,
            geom_length,
            electro_length,
            parent: None,
            r0,
            r1,
        });
    }

    // A branch's proximal neighbor is always the terminal segment of some
    // other branch, so a reverse index over head segments resolves parentage.
    let head_to_branch: AHashMap<SegmentHandle, BranchId> =
        branches.iter().map(|b| (b.head, b.id)).collect();

    for branch in branches.iter_mut() {
        let proximal = branch.chain[0];
        branch.parent = match arena[proximal].parent {
            None => None,
            Some(attachment) => Some(*head_to_branch.get(&attachment).ok_or_else(|| {
                MorphologyError::Corrupt(format!(
                    "{} attaches to segment {} which heads no branch",
                    branch.id, attachment
                ))
            })?),
        };
    }

    Ok(branches)
}

/// Walk upward from a branch head, absorbing single-child ancestors.
///
/// Accumulates each edge's geometric and electrotonic length, including the
/// final edge onto the ancestor that heads the parent branch; that ancestor
/// itself is excluded from the chain. The root uses its virtual start
/// length instead of walking.
fn traverse_branch(arena: &SegmentArena, head: SegmentHandle) -> (Vec<SegmentHandle>, f64, f64) {
    let head_segment = &arena[head];
    if head_segment.is_root() {
        return (vec![head], head_segment.radius, head_segment.radius.sqrt());
    }

    let mut chain = vec![head];
    let mut geom = 0.0;
    let mut electro = 0.0;
    let mut current = head;
    loop {
        let segment = &arena[current];
        let Some(parent) = segment.parent else {
            break;
        };
        let parent_segment = &arena[parent];
        let d = segment.distance(parent_segment);
        geom += d;
        electro += segment.electrotonic_step(d);
        if parent_segment.is_root() || parent_segment.children.len() != 1 {
            // The ancestor heads the parent branch; the edge counted, the
            // segment does not.
            break;
        }
        chain.push(parent);
        current = parent;
    }
    chain.reverse();
    (chain, geom, electro)
}

/// Order branch ids so that every branch appears after its parent.
///
/// Stable: among branches whose parents are already placed, lower ids come
/// first. Discovery order is *not* a substitute; a fork whose subtree was
/// declared before its path to the root produces child branches ahead of
/// their parents.
///
/// # Errors
///
/// Returns [`MorphologyError::Corrupt`] if the parent links contain a cycle
/// or reference a missing branch.
pub fn topological_order(branches: &[Branch]) -> MorphResult<Vec<BranchId>> {
    let mut children: Vec<Vec<BranchId>> = vec![Vec::new(); branches.len()];
    let mut ready = BinaryHeap::new();
    for branch in branches {
        match branch.parent {
            None => ready.push(Reverse(branch.id)),
            Some(parent) => {
                if parent.index() >= branches.len() {
                    return Err(MorphologyError::Corrupt(format!(
                        "{} references missing parent {}",
                        branch.id, parent
                    )));
                }
                children[parent.index()].push(branch.id);
            }
        }
    }

    let mut order = Vec::with_capacity(branches.len());
    while let Some(Reverse(id)) = ready.pop() {
        order.push(id);
        for &child in &children[id.index()] {
            ready.push(Reverse(child));
        }
    }

    if order.len() != branches.len() {
        return Err(MorphologyError::Corrupt(
            "branch parent links contain a cycle or unreachable branch".to_string(),
        ));
    }
    Ok(order)
}
