// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
End-to-end tests for the full morphology-to-compartment pipeline.

Every scenario runs the public surface only: SWC text (or file) in,
compartments out through a `RecordingBuilder`.

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

use std::f64::consts::PI;
use std::io::{Cursor, Write};

use neurocable::prelude::*;

fn load(text: &str) -> Morphology {
    load_morphology(Cursor::new(text), &RepairConfig::default()).expect("in-memory load")
}

fn build(morph: &Morphology, constants: &CableConstants) -> (RecordingBuilder, SynthesisReport) {
    let mut builder = RecordingBuilder::new();
    let report = synthesize(morph, constants, &NamingConfig::default(), &mut builder)
        .expect("valid morphology synthesizes");
    (builder, report)
}

/// A small neuron touching every kind: soma root, an axon, a basal run,
/// and a forked dendrite.
const MIXED_NEURON: &str = "\
# synthetic reconstruction
1 1 0 0 0 5.0 -1
2 2 -10 0 0 0.8 1
3 2 -20 0 0 0.8 2
4 3 0 10 0 1.2 1
5 4 10 0 0 1.0 1
6 4 20 0 0 1.0 5
7 4 30 0 0 1.0 6
8 4 20 10 0 1.0 6
";

#[test]
fn test_single_root_invariant() {
    let morph = load(MIXED_NEURON);
    assert!(morph.is_valid());

    let parentless: Vec<_> = morph
        .branches()
        .iter()
        .filter(|b| b.parent.is_none())
        .collect();
    assert_eq!(parentless.len(), 1);
    assert!(morph.arena()[parentless[0].head].is_root());
}

#[test]
fn test_every_valid_segment_covered_once() {
    let morph = load(MIXED_NEURON);
    let mut seen = vec![0usize; morph.arena().len()];
    for branch in morph.branches() {
        for &handle in &branch.chain {
            seen[handle.index()] += 1;
        }
    }
    for (handle, segment) in morph.arena().iter() {
        let expected = if segment.valid { 1 } else { 0 };
        assert_eq!(seen[handle.index()], expected, "segment {}", handle);
    }
}

#[test]
fn test_round_trip_geometry() {
    // Two-segment chain: root radius 1.0 at the origin, child 5 um out
    // with radius 0.5
    let morph = load("1 1 0 0 0 1.0 -1\n2 4 5 0 0 0.5 1\n");
    let constants = CableConstants::default();
    let (builder, report) = build(&morph, &constants);
    assert_eq!(report.compartments, 2);

    let child = builder.find("dend0").expect("child compartment");
    assert!((child.spec.length - 5e-6).abs() < 1e-18);
    let expected_ra = constants.ra * 5e-6 / (PI * 0.5e-6 * 0.5e-6);
    assert!((child.spec.ra - expected_ra).abs() / expected_ra < 1e-12);
}

#[test]
fn test_orphan_detection() {
    // Parent 5 referenced before segment 5 exists
    let morph = load("1 1 0 0 0 5.0 -1\n2 4 10 0 0 1.0 5\n3 4 20 0 0 1.0 2\n");
    assert!(!morph.is_valid());
    assert!(morph.report().num_orphans >= 1);
    assert!(morph.branches().is_empty());
}

#[test]
fn test_minimum_radius_rejection() {
    let morph = load("1 1 0 0 0 5.0 -1\n2 4 10 0 0 0.01 1\n");
    assert!(!morph.is_valid());
    assert!(morph.report().bad_radius >= 1);
    assert!(morph.branches().is_empty());

    let mut builder = RecordingBuilder::new();
    let result = synthesize(
        &morph,
        &CableConstants::default(),
        &NamingConfig::default(),
        &mut builder,
    );
    assert!(result.is_err());
    assert!(builder.compartments().is_empty());
}

#[test]
fn test_zero_length_reparenting() {
    // root(1) -> A(2, 0.001 um from root) -> B(3, 5 um from A)
    let morph = load("1 1 0 0 0 5.0 -1\n2 4 0.001 0 0 1.0 1\n3 4 5.001 0 0 1.0 2\n");
    assert!(morph.is_valid());
    assert_eq!(morph.zero_length_removed(), 1);

    let arena = morph.arena();
    let root = SegmentHandle::new(0);
    let a = SegmentHandle::new(1);
    let b = SegmentHandle::new(2);
    assert_eq!(arena[b].parent, Some(root));
    assert!(arena[root].children.contains(&b));
    assert!(!arena[root].children.contains(&a));
    assert!(!arena[a].valid);

    // The eliminated segment produces no compartment
    let (builder, report) = build(&morph, &CableConstants::default());
    assert_eq!(report.compartments, 2);
    assert!(builder.find("dend0").is_some());
}

#[test]
fn test_type_coercion_to_dendrite_naming() {
    // Unrecognized code 7 attached to a dendrite parent is classified and
    // named as a dendrite
    let morph = load("1 1 0 0 0 5.0 -1\n2 4 10 0 0 1.0 1\n3 7 20 0 0 1.0 2\n");
    let coerced = &morph.arena()[SegmentHandle::new(2)];
    assert_eq!(coerced.kind, SegmentKind::Dendrite);

    let (builder, _) = build(&morph, &CableConstants::default());
    let names: Vec<&str> = builder
        .compartments()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["soma", "dend0", "dend0_1"]);
}

#[test]
fn test_kind_family_naming_across_mixed_neuron() {
    let morph = load(MIXED_NEURON);
    let (builder, report) = build(&morph, &CableConstants::default());

    assert_eq!(report.num_somas, 1);
    assert_eq!(report.num_root_axons, 1);
    assert_eq!(report.num_root_basals, 1);
    assert_eq!(report.num_root_dends, 1);
    assert!(builder.find("soma").is_some());
    assert!(builder.find("axon0").is_some());
    assert!(builder.find("basal0").is_some());
    assert!(builder.find("dend0").is_some());
    // 8 segments, 7 axial links
    assert_eq!(report.compartments, 8);
    assert_eq!(report.axial_links, 7);
}

#[test]
fn test_determinism_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, "{}", MIXED_NEURON).expect("write swc");

    let snapshot = |builder: &RecordingBuilder| {
        serde_json::to_string(builder.compartments()).expect("serialize compartments")
    };

    let first = load_morphology_from_file(file.path()).expect("first load");
    let second = load_morphology_from_file(file.path()).expect("second load");
    let (builder_a, report_a) = build(&first, &CableConstants::default());
    let (builder_b, report_b) = build(&second, &CableConstants::default());

    assert_eq!(report_a, report_b);
    assert_eq!(snapshot(&builder_a), snapshot(&builder_b));
}

#[test]
fn test_config_constants_flow_through() {
    let mut config_file = tempfile::NamedTempFile::new().expect("temp config");
    write!(
        config_file,
        "[cable]\nra = 2.0\n\n[repair]\nzero_length_epsilon_um = 0.01\n"
    )
    .expect("write config");

    let config = load_config(Some(config_file.path())).expect("config loads");
    assert_eq!(config.cable.ra, 2.0);

    let morph = load("1 1 0 0 0 1.0 -1\n2 4 5 0 0 0.5 1\n");
    let mut builder = RecordingBuilder::new();
    synthesize(&morph, &config.cable, &config.naming, &mut builder).expect("synthesis");

    let child = builder.find("dend0").expect("child compartment");
    let expected_ra = 2.0 * 5e-6 / (PI * 0.5e-6 * 0.5e-6);
    assert!((child.spec.ra - expected_ra).abs() / expected_ra < 1e-12);
}

#[test]
fn test_repair_idempotence_through_reload() {
    // Loading the already-loaded (repaired) structure again changes nothing:
    // the pipeline reports zero further eliminations on clean geometry.
    let text = "1 1 0 0 0 5.0 -1\n2 4 0.001 0 0 1.0 1\n3 4 6.0 0 0 1.0 2\n";
    let morph = load(text);
    assert_eq!(morph.zero_length_removed(), 1);

    // Re-express the repaired tree as SWC and load it again
    let arena = morph.arena();
    let mut rewritten = String::new();
    let mut renumber = vec![0usize; arena.len()];
    let mut next = 0usize;
    for (handle, segment) in arena.iter() {
        if !segment.valid {
            continue;
        }
        next += 1;
        renumber[handle.index()] = next;
        let parent = match segment.parent {
            None => -1i64,
            Some(p) => renumber[p.index()] as i64,
        };
        let code = match segment.kind {
            SegmentKind::Soma => 1,
            SegmentKind::Axon => 2,
            SegmentKind::Basal => 3,
            _ => 4,
        };
        rewritten.push_str(&format!(
            "{} {} {} {} {} {} {}\n",
            next,
            code,
            segment.position[0],
            segment.position[1],
            segment.position[2],
            segment.radius,
            parent
        ));
    }
    let reloaded = load(&rewritten);
    assert!(reloaded.is_valid());
    assert_eq!(reloaded.zero_length_removed(), 0);
    assert_eq!(reloaded.arena().valid_count(), morph.arena().valid_count());
}
