//! Integration tests for component dependency analysis over the
//! testdata fixture tree.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use archmap::analyze::analyze_components;
use archmap::model::SourceModel;

fn javasrc() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join("javasrc")
}

fn whitelist(pairs: &[(&str, u32)]) -> BTreeMap<String, u32> {
    pairs.iter().map(|(n, d)| (n.to_string(), *d)).collect()
}

#[test]
fn test_graph_over_fixture_tree() {
    let root = javasrc();
    let model = SourceModel::scan(&root);
    let graph = analyze_components(
        &root,
        &model,
        &whitelist(&[("com.shop", 1)]),
        &BTreeSet::new(),
    );

    let components: Vec<&str> = graph.keys().map(String::as_str).collect();
    assert_eq!(
        components,
        vec![
            "com.shop.api",
            "com.shop.core",
            "com.shop.legacy",
            "com.shop.store",
            "com.shop.web",
        ]
    );

    assert!(graph["com.shop.api"].contains("com.shop.core"));
    assert!(graph["com.shop.web"].contains("com.shop.core"));
    assert_eq!(
        graph["com.shop.core"],
        BTreeSet::from([
            "com.shop.legacy".to_string(),
            "com.shop.store".to_string()
        ])
    );

    // Leaf components still appear, with empty dependency sets.
    assert!(graph["com.shop.store"].is_empty());
    assert!(graph["com.shop.legacy"].is_empty());
}

#[test]
fn test_graph_never_references_unlisted_packages() {
    let root = javasrc();
    let model = SourceModel::scan(&root);
    let graph = analyze_components(
        &root,
        &model,
        &whitelist(&[("com.shop", 1)]),
        &BTreeSet::new(),
    );

    for target in graph.values().flatten() {
        assert!(
            target.starts_with("com.shop"),
            "unexpected edge target {}",
            target
        );
    }
}

#[test]
fn test_blacklist_prunes_component_and_edges() {
    let root = javasrc();
    let model = SourceModel::scan(&root);
    let graph = analyze_components(
        &root,
        &model,
        &whitelist(&[("com.shop", 1)]),
        &BTreeSet::from(["com.shop.legacy".to_string()]),
    );

    assert!(!graph.contains_key("com.shop.legacy"));
    for (component, depends_on) in &graph {
        assert!(
            !depends_on.contains("com.shop.legacy"),
            "{} still references the blacklisted component",
            component
        );
    }
    assert_eq!(
        graph["com.shop.core"],
        BTreeSet::from(["com.shop.store".to_string()])
    );
}

#[test]
fn test_no_self_loops_in_fixture_graph() {
    let root = javasrc();
    let model = SourceModel::scan(&root);
    let graph = analyze_components(
        &root,
        &model,
        &whitelist(&[("com.shop", 1)]),
        &BTreeSet::new(),
    );

    for (component, depends_on) in &graph {
        assert!(!depends_on.contains(component));
    }
}

#[test]
fn test_depth_zero_collapses_to_single_component() {
    let root = javasrc();
    let model = SourceModel::scan(&root);
    let graph = analyze_components(
        &root,
        &model,
        &whitelist(&[("com.shop", 0)]),
        &BTreeSet::new(),
    );

    // With depth 0 every file belongs to the root component and the only
    // import targets left are the root itself, which self-loop removal
    // drops.
    assert_eq!(graph.len(), 1);
    assert!(graph["com.shop"].is_empty());
}

#[test]
fn test_repeated_runs_are_identical() {
    let root = javasrc();
    let model = SourceModel::scan(&root);
    let wl = whitelist(&[("com.shop", 1)]);

    let first = analyze_components(&root, &model, &wl, &BTreeSet::new());
    let second = analyze_components(&root, &model, &wl, &BTreeSet::new());
    assert_eq!(first, second);
}
