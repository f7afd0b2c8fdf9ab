use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use shellsense::command::CommandParser;
use shellsense::metadata::{MetadataStore, StaticMetadataStore};
use shellsense::validation::StructuralValidator;

const COMMANDS: &[&str] = &[
    "docker ps -a",
    "docker sp -a",
    "git stauts",
    "git commit -m 'fix the parser' --amend",
    "kubectl get pods --namespac=prod",
    "ls -la /tmp",
    "cargo biuld --release",
];

fn bench_parsing(c: &mut Criterion) {
    let parser = CommandParser::default();
    let mut group = c.benchmark_group("parse");

    for raw in COMMANDS {
        group.bench_with_input(BenchmarkId::from_parameter(raw), raw, |b, raw| {
            b.iter(|| parser.parse(black_box(raw)))
        });
    }
    group.finish();
}

fn bench_structural_validation(c: &mut Criterion) {
    let parser = CommandParser::default();
    let store = StaticMetadataStore::with_builtin();
    let mut group = c.benchmark_group("structural_validation");

    for raw in COMMANDS {
        let structure = match parser.parse(raw) {
            Ok(structure) => structure,
            Err(_) => continue,
        };
        let metadata = store.get_metadata(structure.base_command());

        // Warm memo: repeated validations hit the distance cache
        let warm = StructuralValidator::default();
        group.bench_with_input(BenchmarkId::new("memoized", raw), &structure, |b, s| {
            b.iter(|| warm.validate(black_box(s), metadata.as_deref()))
        });

        // Cold memo: every pair is computed
        let cold = StructuralValidator::new(0, ["-h", "--help", "--version"]);
        group.bench_with_input(BenchmarkId::new("uncached", raw), &structure, |b, s| {
            b.iter(|| cold.validate(black_box(s), metadata.as_deref()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parsing, bench_structural_validation);
criterion_main!(benches);
