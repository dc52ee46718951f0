//! Graph projection: shallowest occurrence wins, everything else is a leaf.

use mvn_assist::index::{CoordinateIndex, ExclusionMap};
use mvn_assist::models::{
    ArtifactCoordinate, DeclaredDependency, ManifestModel, ProjectedNode, RawDependencyNode,
    TreeRoot,
};
use mvn_assist::projector::GraphProjector;
use mvn_assist::size::SizeOracle;
use mvn_assist::test_utils::{LocalRepo, effective, gav, raw};
use std::collections::HashMap;
use std::time::Duration;
use tempfile::TempDir;

struct Fixture {
    _temp: TempDir,
    repo: LocalRepo,
    sizes: SizeOracle,
}

impl Fixture {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let repo = LocalRepo::new(temp.path().join("repository"));
        let sizes = SizeOracle::new(repo.root(), 2, Duration::from_secs(5));
        Self {
            _temp: temp,
            repo,
            sizes,
        }
    }

    fn project(
        &self,
        root: &RawDependencyNode,
        classpath: &[(&str, &str)],
        model: &ManifestModel,
    ) -> Option<TreeRoot> {
        let index = CoordinateIndex::build(&effective(classpath));
        let exclusions = ExclusionMap::from_model(model);
        GraphProjector::new(&index, &exclusions, &self.sizes, "compile").project(root)
    }
}

/// root -> X -> Y, root -> Z -> X
fn scenario_graph() -> RawDependencyNode {
    RawDependencyNode::root(vec![
        raw("org.x:x:1.0", "compile").with_child(raw("org.y:y:2.0", "compile")),
        raw("org.z:z:1.0", "compile").with_child(raw("org.x:x:1.0", "compile")),
    ])
}

fn top(tree: &TreeRoot) -> &[ProjectedNode] {
    tree.top_level()
}

fn occurrences<'a>(tree: &'a TreeRoot, coordinate: &ArtifactCoordinate) -> Vec<(&'a ProjectedNode, usize)> {
    let mut found = Vec::new();
    tree.walk(&mut |node, depth| {
        if &node.coordinate == coordinate {
            found.push((node, depth));
        }
    });
    found
}

#[test]
fn test_shallowest_occurrence_owns_subtree() {
    let fixture = Fixture::new();
    let classpath = [("org.x:x:1.0", "compile"), ("org.y:y:2.0", "compile"), ("org.z:z:1.0", "compile")];
    let tree = fixture.project(&scenario_graph(), &classpath, &ManifestModel::default()).unwrap();

    let top = top(&tree);
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].coordinate, gav("org.x:x:1.0"));
    assert_eq!(top[0].children.len(), 1);
    assert_eq!(top[0].children[0].coordinate, gav("org.y:y:2.0"));

    assert_eq!(top[1].coordinate, gav("org.z:z:1.0"));
    assert_eq!(top[1].children.len(), 1);
    let reference = &top[1].children[0];
    assert_eq!(reference.coordinate, gav("org.x:x:1.0"));
    assert!(reference.children.is_empty());
    assert!(!reference.dropped_by_conflict);
}

#[test]
fn test_version_lost_mediation_is_flagged_everywhere() {
    let fixture = Fixture::new();
    // Another x version won, so the GA is effective but 1.0 is not
    let classpath = [("org.x:x:1.1", "compile"), ("org.y:y:2.0", "compile"), ("org.z:z:1.0", "compile")];
    let tree = fixture.project(&scenario_graph(), &classpath, &ManifestModel::default()).unwrap();

    let xs = occurrences(&tree, &gav("org.x:x:1.0"));
    assert_eq!(xs.len(), 2);
    for (node, _) in &xs {
        assert!(node.dropped_by_conflict);
        assert!(node.children.is_empty());
    }
    assert!(!top(&tree)[1].dropped_by_conflict);
}

#[test]
fn test_shallower_occurrence_found_later_takes_children() {
    let fixture = Fixture::new();
    // root -> Z -> X -> Y, then root -> X
    let root = RawDependencyNode::root(vec![
        raw("org.z:z:1.0", "compile")
            .with_child(raw("org.x:x:1.0", "compile").with_child(raw("org.y:y:2.0", "compile"))),
        raw("org.x:x:1.0", "compile"),
    ]);
    let classpath = [("org.x:x:1.0", "compile"), ("org.y:y:2.0", "compile"), ("org.z:z:1.0", "compile")];
    let tree = fixture.project(&root, &classpath, &ManifestModel::default()).unwrap();

    let xs = occurrences(&tree, &gav("org.x:x:1.0"));
    assert_eq!(xs.len(), 2);
    let (deep, deep_depth) = xs[0];
    let (shallow, shallow_depth) = xs[1];
    assert_eq!(deep_depth, 1);
    assert!(deep.children.is_empty());
    assert_eq!(shallow_depth, 0);
    assert_eq!(shallow.children.len(), 1);
    assert_eq!(shallow.children[0].coordinate, gav("org.y:y:2.0"));

    // Y itself is now canonical one level higher than where it was computed
    assert_eq!(occurrences(&tree, &gav("org.y:y:2.0")), vec![(&shallow.children[0], 1)]);
}

#[test]
fn test_promoted_subtree_levels_follow_the_move() {
    let fixture = Fixture::new();
    // root -> A -> B -> C -> D, root -> C, root -> E -> D
    let root = RawDependencyNode::root(vec![
        raw("g:a:1", "compile").with_child(
            raw("g:b:1", "compile")
                .with_child(raw("g:c:1", "compile").with_child(raw("g:d:1", "compile"))),
        ),
        raw("g:c:1", "compile"),
        raw("g:e:1", "compile").with_child(raw("g:d:1", "compile")),
    ]);
    let classpath = [
        ("g:a:1", "compile"),
        ("g:b:1", "compile"),
        ("g:c:1", "compile"),
        ("g:d:1", "compile"),
        ("g:e:1", "compile"),
    ];
    let tree = fixture.project(&root, &classpath, &ManifestModel::default()).unwrap();

    let top = top(&tree);
    assert_eq!(top.len(), 3);
    // B's copy of C became a leaf
    assert!(top[0].children[0].children[0].children.is_empty());
    // C at the top owns D at depth 1; D under E (also depth 1) stays a leaf
    assert_eq!(top[1].children.len(), 1);
    assert_eq!(top[1].children[0].coordinate, gav("g:d:1"));
    assert_eq!(top[2].children.len(), 1);
    assert!(top[2].children[0].children.is_empty());
}

#[test]
fn test_each_release_expanded_at_most_once() {
    let fixture = Fixture::new();
    let shared = || raw("g:shared:1", "compile").with_child(raw("g:leaf:1", "compile"));
    let root = RawDependencyNode::root(vec![
        raw("g:a:1", "compile").with_child(shared()),
        raw("g:b:1", "compile").with_child(raw("g:c:1", "compile").with_child(shared())),
        shared(),
        raw("g:d:1", "compile").with_child(shared()),
    ]);
    let classpath = [
        ("g:a:1", "compile"),
        ("g:b:1", "compile"),
        ("g:c:1", "compile"),
        ("g:d:1", "compile"),
        ("g:shared:1", "compile"),
        ("g:leaf:1", "compile"),
    ];
    let tree = fixture.project(&root, &classpath, &ManifestModel::default()).unwrap();

    let mut expanded: HashMap<ArtifactCoordinate, usize> = HashMap::new();
    let mut contents: HashMap<ArtifactCoordinate, ProjectedNode> = HashMap::new();
    tree.walk(&mut |node, _| {
        if !node.children.is_empty() {
            *expanded.entry(node.coordinate.clone()).or_default() += 1;
        }
        let mut content = node.clone();
        content.children.clear();
        let first = contents.entry(node.coordinate.clone()).or_insert_with(|| content.clone());
        assert_eq!(*first, content, "occurrences of {} differ", node.coordinate);
    });
    assert!(expanded.values().all(|&count| count == 1));

    let shared = occurrences(&tree, &gav("g:shared:1"));
    assert_eq!(shared.len(), 4);
    let canonical: Vec<_> = shared.iter().filter(|(node, _)| !node.children.is_empty()).collect();
    assert_eq!(canonical.len(), 1);
    assert_eq!(canonical[0].1, 0);
}

#[test]
fn test_dropped_library_disappears_with_its_subtree() {
    let fixture = Fixture::new();
    let root = RawDependencyNode::root(vec![
        raw("g:a:1", "compile").with_child(
            raw("g:excluded:1", "compile").with_child(raw("g:only-via-excluded:1", "compile")),
        ),
        raw("g:b:1", "compile").with_child(raw("g:excluded:2", "compile")),
    ]);
    let classpath = [("g:a:1", "compile"), ("g:b:1", "compile"), ("g:only-via-excluded:1", "compile")];
    let tree = fixture.project(&root, &classpath, &ManifestModel::default()).unwrap();

    let mut seen = Vec::new();
    tree.walk(&mut |node, _| seen.push(node.coordinate.artifact_id.clone()));
    assert_eq!(seen, vec!["a", "b"]);
}

#[test]
fn test_conflict_flag_tracks_exact_release() {
    let fixture = Fixture::new();
    let root = RawDependencyNode::root(vec![
        raw("g:lib:2", "compile"),
        raw("g:a:1", "compile").with_child(raw("g:lib:1", "compile")),
    ]);
    let classpath = [("g:lib:2", "compile"), ("g:a:1", "compile")];
    let tree = fixture.project(&root, &classpath, &ManifestModel::default()).unwrap();

    tree.walk(&mut |node, _| {
        let expected = node.coordinate.version == "1" && node.coordinate.artifact_id == "lib";
        assert_eq!(node.dropped_by_conflict, expected, "{}", node.coordinate);
    });
}

#[test]
fn test_nodes_carry_scope_size_and_exclusions() {
    let fixture = Fixture::new();
    fixture.repo.install_jar(&gav("g:a:1"), 1234).unwrap();
    let root = RawDependencyNode::root(vec![
        raw("g:a:1", "compile").with_child(raw("g:b:1", "runtime")),
        raw("g:t:1", "test"),
    ]);
    let classpath = [("g:a:1", "compile"), ("g:b:1", "runtime"), ("g:t:1", "test")];
    let model = ManifestModel {
        dependencies: vec![DeclaredDependency::new("g", "a", Some("1")).excluding("g", "noise")],
        dependency_management: vec![DeclaredDependency::new("g", "a", None).excluding("g", "other")],
        ..ManifestModel::default()
    };
    let tree = fixture.project(&root, &classpath, &model).unwrap();

    let top = top(&tree);
    assert_eq!(top[0].size, 1234);
    assert_eq!(top[0].scope, "compile");
    let excluded: Vec<String> = top[0].exclusions.iter().map(ToString::to_string).collect();
    assert_eq!(excluded, vec!["g:noise", "g:other"]);
    assert_eq!(top[0].children[0].scope, "runtime");
    assert_eq!(top[0].children[0].size, 0);
    assert_eq!(top[1].scope, "test");
}

#[test]
fn test_projection_json_omits_empty_collections() {
    let fixture = Fixture::new();
    let classpath = [("org.x:x:1.0", "compile"), ("org.y:y:2.0", "compile"), ("org.z:z:1.0", "compile")];
    let tree = fixture.project(&scenario_graph(), &classpath, &ManifestModel::default()).unwrap();

    let json = serde_json::to_value(&tree).unwrap();
    let x = &json["children"][0];
    assert_eq!(x["groupId"], "org.x");
    assert_eq!(x["artifactId"], "x");
    assert_eq!(x["version"], "1.0");
    assert_eq!(x["scope"], "compile");
    assert_eq!(x["droppedByConflict"], false);
    assert_eq!(x["size"], 0);
    assert!(x.get("exclusions").is_none());

    let y = &x["children"][0];
    assert!(y.get("children").is_none());
}
