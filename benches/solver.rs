//! Benchmarks for the weighted Sokoban solver.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use sokoweight::deadlock::is_deadlocked;
use sokoweight::heuristic::estimate;
use sokoweight::{Config, Engine, Puzzle, SearchMode, State};

fn load(name: &str) -> Puzzle {
    Puzzle::from_file(format!("data/{name}")).unwrap()
}

/// Benchmark each strategy on a small Microban level.
fn bench_strategies(c: &mut Criterion) {
    let puzzle = load("input-03.txt");

    let mut group = c.benchmark_group("microban-1");
    for mode in SearchMode::all() {
        group.bench_function(mode.name(), |b| {
            b.iter(|| Engine::new(black_box(puzzle.clone()), mode).solve())
        });
    }
    group.finish();
}

/// Benchmark A* on the level where the heuristic matters most.
fn bench_best_first(c: &mut Criterion) {
    let puzzle = load("input-02.txt");

    let mut group = c.benchmark_group("heavy-stone");
    group.sample_size(10);
    group.bench_function("A*", |b| {
        b.iter(|| Engine::new(black_box(puzzle.clone()), SearchMode::BestFirst).solve())
    });
    group.finish();
}

/// Benchmark generating successors of the starting configuration.
fn bench_next_states(c: &mut Criterion) {
    let puzzle = load("input-07.txt");
    let config = Config::compress(&puzzle.board);

    c.bench_function("next_states", |b| {
        b.iter(|| black_box(&config).next_states(&puzzle.layout))
    });
}

/// Benchmark the deadlock patterns and the heuristic on one configuration.
fn bench_evaluate(c: &mut Criterion) {
    let puzzle = load("input-07.txt");
    let config = Config::compress(&puzzle.board);

    c.bench_function("is_deadlocked", |b| {
        b.iter(|| is_deadlocked(black_box(&config), &puzzle.layout))
    });
    c.bench_function("estimate", |b| {
        b.iter(|| estimate(black_box(&config), &puzzle.layout))
    });
}

criterion_group!(
    benches,
    bench_strategies,
    bench_best_first,
    bench_next_states,
    bench_evaluate,
);
criterion_main!(benches);
