//! Every combination of peer range shape and upstream bump.
//!
//! Minor and major peer releases always force a major release of the dependent;
//! patch releases follow the ordinary range rules.

use std::path::PathBuf;

use changeset_core::{BumpType, PackageRelease};
use changeset_graph::{DependencyGraph, GraphSnapshot};
use changeset_propagation::{ReleaseDecision, compute_release_plan};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_fixture(name: &str) -> DependencyGraph {
    let path = fixtures_dir().join(format!("{name}.json"));
    let content = std::fs::read_to_string(&path).expect("read fixture");
    let snapshot: GraphSnapshot = serde_json::from_str(&content).expect("parse fixture");
    snapshot.into_graph().expect("valid fixture graph")
}

fn dependents_after(fixture: &str, bump: BumpType) -> Vec<ReleaseDecision> {
    let graph = load_fixture(fixture);
    let plan = compute_release_plan(&graph, &[PackageRelease::new("depended-upon", bump)])
        .expect("plan");

    assert_eq!(
        plan.explicit(),
        [ReleaseDecision {
            name: "depended-upon".to_string(),
            bump_type: bump,
            dependencies: vec![],
        }]
    );
    plan.dependents().to_vec()
}

fn has_peer_dep(bump_type: BumpType) -> Vec<ReleaseDecision> {
    vec![ReleaseDecision {
        name: "has-peer-dep".to_string(),
        bump_type,
        dependencies: vec!["depended-upon".to_string()],
    }]
}

#[test]
fn patches_a_pinned_peer_dep() {
    let dependents = dependents_after("simple-pinned-peer-dep", BumpType::Patch);

    assert_eq!(dependents, has_peer_dep(BumpType::Patch));
}

#[test]
fn majors_a_pinned_peer_dep_on_minor() {
    let dependents = dependents_after("simple-pinned-peer-dep", BumpType::Minor);

    assert_eq!(dependents, has_peer_dep(BumpType::Major));
}

#[test]
fn majors_a_pinned_peer_dep_on_major() {
    let dependents = dependents_after("simple-pinned-peer-dep", BumpType::Major);

    assert_eq!(dependents, has_peer_dep(BumpType::Major));
}

#[test]
fn leaves_tilde_peer_dep_alone_on_patch() {
    let dependents = dependents_after("simple-tilde-peer-dep", BumpType::Patch);

    assert!(dependents.is_empty());
}

#[test]
fn majors_tilde_peer_dep_on_minor() {
    let dependents = dependents_after("simple-tilde-peer-dep", BumpType::Minor);

    assert_eq!(dependents, has_peer_dep(BumpType::Major));
}

#[test]
fn majors_tilde_peer_dep_on_major() {
    let dependents = dependents_after("simple-tilde-peer-dep", BumpType::Major);

    assert_eq!(dependents, has_peer_dep(BumpType::Major));
}

#[test]
fn leaves_caret_peer_dep_alone_on_patch() {
    let dependents = dependents_after("simple-caret-peer-dep", BumpType::Patch);

    assert!(dependents.is_empty());
}

#[test]
fn majors_caret_peer_dep_on_minor() {
    let dependents = dependents_after("simple-caret-peer-dep", BumpType::Minor);

    assert_eq!(dependents, has_peer_dep(BumpType::Major));
}

#[test]
fn majors_caret_peer_dep_on_major() {
    let dependents = dependents_after("simple-caret-peer-dep", BumpType::Major);

    assert_eq!(dependents, has_peer_dep(BumpType::Major));
}

#[test]
fn leaves_wide_peer_dep_alone_on_patch() {
    let dependents = dependents_after("simple-wide-peer-dep", BumpType::Patch);

    assert!(dependents.is_empty());
}

#[test]
fn majors_wide_peer_dep_even_though_range_still_matches() {
    for bump in [BumpType::Minor, BumpType::Major] {
        let dependents = dependents_after("simple-wide-peer-dep", bump);

        assert_eq!(dependents, has_peer_dep(BumpType::Major), "upstream {bump}");
    }
}

#[test]
fn patches_transitive_dependent_only_affected_by_peer_major() {
    // pkg-b caret-depends on pkg-a and pkg-c, pkg-c caret peer-depends on pkg-a.
    // The minor on pkg-a stays inside pkg-b's range but majors pkg-c, which breaks pkg-b.
    let graph = load_fixture("transitive-peer-dependent");

    let plan =
        compute_release_plan(&graph, &[PackageRelease::new("pkg-a", BumpType::Minor)]).expect("plan");

    let json = serde_json::to_value(&plan).expect("serialize plan");
    assert_eq!(
        json,
        serde_json::json!([
            { "name": "pkg-a", "type": "minor" },
            { "name": "pkg-c", "type": "major", "dependencies": ["pkg-a"] },
            { "name": "pkg-b", "type": "patch", "dependencies": ["pkg-c", "pkg-a"] }
        ])
    );
}
