//! Engine microbenchmarks
//!
//! Criterion benchmarks for the hot paths: move generation, evaluation,
//! make/unmake, and a fixed-depth search.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rookery_engine::eval::evaluate;
use rookery_engine::movegen::{generate_legal, generate_pseudo_legal, perft};
use rookery_engine::moves::{Move, MoveFlag, MoveList};
use rookery_engine::position::Position;
use rookery_engine::search::tt::TranspositionTable;
use rookery_engine::search::search_with_tt;

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

fn bench_pseudo_legal_generation(c: &mut Criterion) {
    let pos = Position::from_fen(KIWIPETE).expect("valid FEN");

    c.bench_function("generate_pseudo_legal_kiwipete", |b| {
        b.iter(|| {
            let mut list = MoveList::new();
            generate_pseudo_legal(black_box(&pos), &mut list);
            black_box(list.len())
        })
    });
}

fn bench_legal_generation(c: &mut Criterion) {
    let mut pos = Position::from_fen(KIWIPETE).expect("valid FEN");

    c.bench_function("generate_legal_kiwipete", |b| {
        b.iter(|| {
            let mut list = MoveList::new();
            generate_legal(black_box(&mut pos), &mut list);
            black_box(list.len())
        })
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let pos = Position::from_fen(KIWIPETE).expect("valid FEN");

    c.bench_function("evaluate_kiwipete", |b| {
        b.iter(|| black_box(evaluate(black_box(&pos), 0)))
    });
}

fn bench_apply_undo(c: &mut Criterion) {
    let mut pos = Position::startpos();
    let m = Move::new(12, 28, MoveFlag::DoublePush); // e2e4

    c.bench_function("apply_undo_e2e4", |b| {
        b.iter(|| {
            pos.apply(black_box(m));
            pos.undo(black_box(m));
        })
    });
}

fn bench_perft_3(c: &mut Criterion) {
    c.bench_function("perft_3_startpos", |b| {
        b.iter(|| {
            let mut pos = Position::startpos();
            black_box(perft(&mut pos, 3))
        })
    });
}

fn bench_search_depth_4(c: &mut Criterion) {
    c.bench_function("search_depth_4_startpos", |b| {
        // Private table so iterations do not feed each other.
        let tt = TranspositionTable::new(1 << 16);
        b.iter(|| {
            tt.clear();
            let mut pos = Position::startpos();
            black_box(search_with_tt(&mut pos, 4, 0, &tt))
        })
    });
}

criterion_group!(
    benches,
    bench_pseudo_legal_generation,
    bench_legal_generation,
    bench_evaluate,
    bench_apply_undo,
    bench_perft_3,
    bench_search_depth_4,
);
criterion_main!(benches);
