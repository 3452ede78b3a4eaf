//! End-to-end properties of the scan, resolve, estimate and layout pipeline


use std::collections::HashSet;

use codeorbit::estimator::raw_score;
use codeorbit::extractors::measure;
use codeorbit::language::Language;
use codeorbit::layout::LayoutStrategy;
use codeorbit::{Analysis, Analyzer, Category, ComplexityWeights, NodeIndex, Settings};
use harness::TestRepo;

fn analyze(repo: &TestRepo) -> Analysis {
    Analyzer::new(Settings::default())
        .analyze(repo.path())
        .expect("analysis should succeed")
}

fn id(analysis: &Analysis, rel: &str) -> String {
    format!("{}/{}", analysis.graph.root_node().id, rel)
}

#[test]
fn test_directory_size_is_sum_of_children() {
    let repo = TestRepo::sample_app();
    let analysis = analyze(&repo);
    let graph = &analysis.graph;

    for node in graph.nodes().iter().filter(|n| n.is_dir()) {
        let sum: u64 = node.children.iter().map(|&c| graph.node(c).size).sum();
        assert_eq!(node.size, sum, "{}", node.id);
    }
    let on_disk: u64 = graph.files().map(|(_, n)| n.size).sum();
    assert_eq!(graph.root_node().size, on_disk);
}

#[test]
fn test_parent_relation_is_a_tree() {
    let repo = TestRepo::sample_app();
    let analysis = analyze(&repo);
    let graph = &analysis.graph;

    let roots = graph.nodes().iter().filter(|n| n.parent.is_none()).count();
    assert_eq!(roots, 1);

    for i in 0..graph.len() {
        let mut seen = HashSet::new();
        let mut cursor = Some(NodeIndex(i));
        while let Some(idx) = cursor {
            assert!(seen.insert(idx.0), "cycle through {}", graph.node(idx).id);
            cursor = graph.node(idx).parent;
        }
        assert!(seen.contains(&0), "{} does not reach the root", graph.node(NodeIndex(i)).id);
    }
}

#[test]
fn test_edges_connect_existing_nodes() {
    let repo = TestRepo::sample_app();
    let analysis = analyze(&repo);
    let graph = &analysis.graph;

    let edges = graph.edges();
    assert_eq!(edges.len(), 5);
    for edge in &edges {
        assert!(graph.get(edge.from.as_str()).is_some());
        let target = graph.get(edge.to.as_str()).expect("edge target exists");
        assert!(target.imported_by.contains(&edge.from));
        assert!(edge.strength >= 1.0 && edge.strength <= 2.0);
    }
}

#[test]
fn test_three_file_cycle() {
    let repo = TestRepo::new();
    repo.add_file("src/a.ts", "import { b } from './b'\nexport const a = 1\n");
    repo.add_file("src/b.ts", "import { c } from './c'\nexport const b = 1\n");
    repo.add_file("src/c.ts", "import { a } from './a'\nexport const c = 1\n");
    let analysis = analyze(&repo);

    let pairs: HashSet<(String, String)> = analysis
        .graph
        .edges()
        .into_iter()
        .map(|e| (e.from.to_string(), e.to.to_string()))
        .collect();
    let expected: HashSet<(String, String)> = [("a", "b"), ("b", "c"), ("c", "a")]
        .iter()
        .map(|(f, t)| {
            (
                id(&analysis, &format!("src/{}.ts", f)),
                id(&analysis, &format!("src/{}.ts", t)),
            )
        })
        .collect();
    assert_eq!(pairs, expected);
}

#[test]
fn test_lone_component_scenario() {
    let repo = TestRepo::new();
    let content = "const Button = () => <button>Click</button>\n";
    repo.add_file("src/components/Button.tsx", content);
    let analysis = analyze(&repo);

    let button = analysis
        .graph
        .get(&id(&analysis, "src/components/Button.tsx"))
        .unwrap();
    assert_eq!(button.category, Category::Component);
    assert!(button.imports.is_empty() && button.imported_by.is_empty());
    assert!(analysis.graph.edges().is_empty());

    let base = raw_score(&measure(content, Language::Tsx), &ComplexityWeights::default());
    assert_eq!(button.complexity, base);
}

#[test]
fn test_complexity_monotone_in_lines() {
    let repo = TestRepo::new();
    repo.add_file("short.ts", "export const a = 1\n");
    repo.add_file("long.ts", "export const a = 1\nconst b = 2\nconst c = 3\n");
    let analysis = analyze(&repo);

    let short = analysis.graph.get(&id(&analysis, "short.ts")).unwrap();
    let long = analysis.graph.get(&id(&analysis, "long.ts")).unwrap();
    assert!(long.complexity > short.complexity);
}

#[test]
fn test_exact_path_resolves_without_inference() {
    let repo = TestRepo::new();
    repo.add_file("lib/util.ts", "export const u = 1\n");
    repo.add_file("lib/util.tsx", "export const v = 1\n");
    repo.add_file("main.ts", "import { v } from './lib/util.tsx'\n");
    let analysis = analyze(&repo);

    let main = analysis.graph.get(&id(&analysis, "main.ts")).unwrap();
    let targets: Vec<&str> = main.imports.iter().map(|t| t.as_str()).collect();
    assert_eq!(targets, vec![id(&analysis, "lib/util.tsx").as_str()]);
}

#[test]
fn test_layout_is_deterministic() {
    let repo = TestRepo::sample_app();
    let analysis = analyze(&repo);

    for strategy in [
        LayoutStrategy::HierarchicalSphere,
        LayoutStrategy::DistrictCluster,
        LayoutStrategy::FolderBubble,
    ] {
        let mut settings = Settings::default();
        settings.layout.strategy = strategy;
        settings.layout.jitter = 0.25;
        settings.layout.seed = 11;

        let first = analysis.layout(&settings.layout);
        let second = analysis.layout(&settings.layout);
        assert_eq!(first.positions, second.positions, "{:?}", strategy);
        assert_eq!(first.radii, second.radii);
        for position in first.positions.values() {
            assert!(position.iter().all(|v| v.is_finite()));
        }
    }
}

#[test]
fn test_district_members_stay_bounded() {
    let repo = TestRepo::sample_app();
    let analysis = analyze(&repo);
    let mut settings = Settings::default();
    settings.layout.strategy = LayoutStrategy::DistrictCluster;
    settings.layout.iterations = 200;

    let result = analysis.layout(&settings.layout);
    assert!(!result.districts.is_empty());
    for district in &result.districts {
        let center = glam::DVec3::from_array(district.center);
        for member in &district.member_ids {
            let position = result.position(member.as_str()).unwrap();
            assert!(
                (position - center).length() <= district.radius + 1e-6,
                "{} escaped {:?}",
                member,
                district.kind
            );
        }
    }
}

#[test]
fn test_node_modules_excluded() {
    let repo = TestRepo::sample_app();
    let analysis = analyze(&repo);
    assert!(
        analysis
            .graph
            .nodes()
            .iter()
            .all(|n| !n.path.to_string_lossy().contains("node_modules"))
    );
}
