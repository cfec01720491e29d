// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Compartmental model synthesis.

Walks the branch list in an explicit parent-before-child order and turns
every valid segment into one compartment through the builder seam. The
naming scheme reads each parent compartment's already-assigned name, which
is why the ordering contract matters: branch discovery order is not trusted
here, a topological sort over branch parent links is.

Naming, in precedence order:
- the structural root is `soma`; every further soma-kind segment is
  `soma{n}` off the same counter
- a segment whose kind differs from its parent's starts a type-prefixed
  family: `axon{n}`, `basal{n}` (or `dend{n}` under the relabel heuristic),
  `dend{n}`
- a same-kind segment opening a new branch extends the parent's base name
  with `.{branch}_0`; later chain members extend it with `_{position}`

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

use ahash::AHashMap;
use serde::Serialize;
use tracing::{debug, info};

use neurocable_config::{BasalRelabel, CableConstants, NamingConfig};
use neurocable_morphology::{
    topological_order, Branch, BranchId, Morphology, SegmentArena, SegmentKind,
};

use crate::builder::{CompartmentBuilder, CompartmentId};
use crate::compartment::CompartmentSpec;
use crate::{CableError, CableResult};

/// What synthesis produced, by the numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SynthesisReport {
    /// Compartments created, one per valid segment
    pub compartments: usize,
    /// Axial links established (every compartment except the root)
    pub axial_links: usize,
    /// Soma-kind compartments, structural root included
    pub num_somas: usize,
    /// Type-family roots encountered per kind
    pub num_root_axons: usize,
    pub num_root_basals: usize,
    pub num_root_dends: usize,
    /// Whether the basal naming heuristic fired for this tree
    pub basal_relabeled: bool,
}

/// Synthesize one compartment per valid segment of a loaded morphology.
///
/// Branches are processed in topological order and each branch's chain
/// proximal to distal, so a parent compartment always exists (and is named)
/// before any of its children. Repeated runs over the same morphology
/// produce identical names, geometry, and electrical values.
///
/// # Errors
///
/// - [`CableError::InvalidMorphology`] when the morphology failed
///   validation; nothing is created.
/// - Builder errors propagate unchanged.
/// - [`CableError::Incomplete`] when any valid segment failed to
///   materialize (internal contract; the builder saw every create call).
pub fn synthesize(
    morphology: &Morphology,
    constants: &CableConstants,
    naming: &NamingConfig,
    builder: &mut dyn CompartmentBuilder,
) -> CableResult<SynthesisReport> {
    if !morphology.is_valid() {
        return Err(CableError::InvalidMorphology(
            morphology.report().to_string(),
        ));
    }

    let arena = morphology.arena();
    let branches = morphology.branches();
    let order = topological_order(branches)?;

    let basal_relabeled = match naming.basal_relabel {
        BasalRelabel::Heuristic => only_basals_present(arena, branches),
        BasalRelabel::Preserve => false,
    };
    let basal_base = if basal_relabeled { "dend" } else { "basal" };
    if basal_relabeled {
        debug!(
            target: "neurocable-cable",
            "all non-soma segments are basal-tagged; naming them as dendrites"
        );
    }

    let mut report = SynthesisReport {
        basal_relabeled,
        ..Default::default()
    };
    let mut compartment_ids: Vec<Option<CompartmentId>> = vec![None; arena.len()];
    let mut names: Vec<Option<String>> = vec![None; arena.len()];
    let mut branches_on_parent: AHashMap<BranchId, usize> = AHashMap::new();

    for &branch_id in &order {
        let branch = &branches[branch_id.index()];
        let branch_index_on_parent = match branch.parent {
            Some(parent) => {
                let slot = branches_on_parent.entry(parent).or_insert(0);
                let index = *slot;
                *slot += 1;
                index
            }
            None => 0,
        };

        for (position, &handle) in branch.chain.iter().enumerate() {
            let segment = &arena[handle];
            let name = match segment.parent {
                None => {
                    report.num_somas += 1;
                    "soma".to_string()
                }
                Some(parent) => {
                    let parent_segment = &arena[parent];
                    if segment.kind == SegmentKind::Soma {
                        // Secondary soma-tagged segments share the soma
                        // counter rather than opening a type family.
                        let name = format!("soma{}", report.num_somas);
                        report.num_somas += 1;
                        name
                    } else if parent_segment.kind != segment.kind {
                        match segment.kind {
                            SegmentKind::Axon => {
                                let name = format!("axon{}", report.num_root_axons);
                                report.num_root_axons += 1;
                                name
                            }
                            SegmentKind::Basal => {
                                let name = format!("{}{}", basal_base, report.num_root_basals);
                                report.num_root_basals += 1;
                                name
                            }
                            _ => {
                                let name = format!("dend{}", report.num_root_dends);
                                report.num_root_dends += 1;
                                name
                            }
                        }
                    } else {
                        let parent_name = names[parent.index()].as_deref().ok_or_else(|| {
                            CableError::MissingParentCompartment(format!("segment {}", handle))
                        })?;
                        let base = parent_name
                            .rfind('_')
                            .map(|i| &parent_name[..i])
                            .unwrap_or(parent_name);
                        if position == 0 {
                            format!("{}.{}_0", base, branch_index_on_parent)
                        } else {
                            format!("{}_{}", base, position)
                        }
                    }
                }
            };

            let parent_segment = segment.parent.map(|p| &arena[p]);
            let spec = CompartmentSpec::for_segment(segment, parent_segment, constants)?;
            let id = builder.create_compartment(&name, &spec)?;
            report.compartments += 1;

            if let Some(parent) = segment.parent {
                let parent_id = compartment_ids[parent.index()]
                    .ok_or_else(|| CableError::MissingParentCompartment(name.clone()))?;
                builder.connect_axial(parent_id, id)?;
                report.axial_links += 1;
            }

            compartment_ids[handle.index()] = Some(id);
            names[handle.index()] = Some(name);
        }
    }

    let expected = arena.valid_count();
    if report.compartments != expected {
        return Err(CableError::Incomplete {
            created: report.compartments,
            expected,
        });
    }

    info!(
        target: "neurocable-cable",
        "synthesized {} compartments, {} axial links ({} somas)",
        report.compartments, report.axial_links, report.num_somas
    );
    Ok(report)
}

/// Some legacy reconstructions tag every non-soma, non-axon segment as
/// basal. The heuristic fires when basal segments exist and true dendrite
/// segments do not.
fn only_basals_present(arena: &SegmentArena, branches: &[Branch]) -> bool {
    let mut num_basal = 0;
    let mut num_dend = 0;
    for branch in branches {
        for &handle in &branch.chain {
            match arena[handle].kind {
                SegmentKind::Basal => num_basal += 1,
                SegmentKind::Dendrite => num_dend += 1,
                _ => {}
            }
        }
    }
    num_basal > 0 && num_dend == 0
}
