use changeset_core::DependencyKind;
use changeset_graph::{DependencyGraph, GraphError, GraphSnapshot};
use changeset_version::RangeShape;

const MONOREPO: &str = r#"{
  "packages": [
    { "name": "depended-upon", "version": "1.0.0" },
    {
      "name": "has-peer-dep",
      "version": "1.0.0",
      "devDependencies": { "depended-upon": "1.0.0" },
      "peerDependencies": { "depended-upon": "~1.0.0" }
    }
  ]
}"#;

#[test]
fn builds_graph_from_json_snapshot() -> anyhow::Result<()> {
    let snapshot: GraphSnapshot = serde_json::from_str(MONOREPO)?;

    let graph = DependencyGraph::try_from(snapshot)?;

    assert_eq!(graph.len(), 2);
    let edges = graph.edge_between("has-peer-dep", "depended-upon");
    assert_eq!(edges.len(), 2);
    assert_eq!(edges[0].kind, DependencyKind::Dev);
    assert_eq!(edges[0].range.shape(), RangeShape::Pinned);
    assert_eq!(edges[1].kind, DependencyKind::Peer);
    assert_eq!(edges[1].range.shape(), RangeShape::Tilde);

    Ok(())
}

#[test]
fn snapshot_with_external_dependency_is_rejected() -> anyhow::Result<()> {
    let snapshot: GraphSnapshot = serde_json::from_str(
        r#"{
          "packages": [
            { "name": "app", "version": "1.0.0", "dependencies": { "left-pad": "^1.3.0" } }
          ]
        }"#,
    )?;

    let err = snapshot.into_graph().expect_err("dangling edge must fail");

    assert!(matches!(
        err,
        GraphError::DanglingEdge { ref dependent, ref missing, .. }
            if dependent == "app" && missing == "left-pad"
    ));

    Ok(())
}

#[test]
fn snapshot_with_duplicate_package_is_rejected() -> anyhow::Result<()> {
    let snapshot: GraphSnapshot = serde_json::from_str(
        r#"{
          "packages": [
            { "name": "app", "version": "1.0.0" },
            { "name": "app", "version": "1.1.0" }
          ]
        }"#,
    )?;

    let err = snapshot.into_graph().expect_err("duplicate package must fail");

    assert!(matches!(err, GraphError::DuplicatePackage { .. }));

    Ok(())
}

#[test]
fn snapshot_serializes_without_empty_sections() -> anyhow::Result<()> {
    let snapshot: GraphSnapshot = serde_json::from_str(MONOREPO)?;

    let value = serde_json::to_value(&snapshot)?;

    let first = &value["packages"][0];
    assert!(first.get("dependencies").is_none());
    assert_eq!(value["packages"][1]["peerDependencies"]["depended-upon"], "~1.0.0");

    Ok(())
}
