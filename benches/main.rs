use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use infragraph::codegen::{generate, TargetFormat};
use infragraph::graph::{Edge, InfraGraph, Node};
use infragraph::rules::{evaluate_all_frameworks, evaluate_heuristics};
use infragraph::validation::run_tests;

const TYPES: &[&str] = &[
    "aws-alb",
    "aws-ec2",
    "aws-rds",
    "aws-s3",
    "aws-elasticache",
    "aws-security-group",
];

/// Layered graph where each node feeds the next layer's node of the same slot
fn layered_graph(size: usize) -> InfraGraph {
    let nodes: Vec<Node> = (0..size)
        .map(|i| {
            Node::new(format!("n{}", i), TYPES[i % TYPES.len()])
                .with_label(format!("node-{}", i))
                .with_config("encryption", i % 3 == 0)
                .with_config("replicas", (i % 4) as i64)
        })
        .collect();
    let edges: Vec<Edge> = (TYPES.len()..size)
        .map(|i| Edge::new(format!("e{}", i), format!("n{}", i - TYPES.len()), format!("n{}", i)))
        .collect();
    InfraGraph::new(nodes, edges)
}

fn bench_rules(c: &mut Criterion) {
    let mut group = c.benchmark_group("rules");

    for size in [10, 100, 1000].iter() {
        let graph = layered_graph(*size);
        group.bench_with_input(BenchmarkId::new("frameworks", size), &graph, |b, graph| {
            b.iter(|| evaluate_all_frameworks(black_box(graph)));
        });
        group.bench_with_input(BenchmarkId::new("heuristics", size), &graph, |b, graph| {
            b.iter(|| evaluate_heuristics(black_box(graph)));
        });
        group.bench_with_input(BenchmarkId::new("tests", size), &graph, |b, graph| {
            b.iter(|| run_tests(black_box(graph)));
        });
    }
    group.finish();
}

fn bench_codegen(c: &mut Criterion) {
    let mut group = c.benchmark_group("codegen");
    let graph = layered_graph(500);

    for format in [
        TargetFormat::Terraform,
        TargetFormat::Pulumi,
        TargetFormat::Cloudformation,
    ] {
        group.bench_with_input(BenchmarkId::new("generate", format), &graph, |b, graph| {
            b.iter(|| generate(black_box(graph), format));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rules, bench_codegen);
criterion_main!(benches);
