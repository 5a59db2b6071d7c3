use chess_position_analysis::{AttackGraph, Board, FeatureExtractor};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const POSITIONS: [&str; 3] = [
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r1bqkb1r/1ppp1ppp/p1n2n2/4p3/B3P3/5N2/PPPP1PPP/RNBQ1RK1 b kq - 3 5",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
];

fn bench_features(c: &mut Criterion) {
    let boards: Vec<Board> = POSITIONS.iter().filter_map(|fen| Board::from_fen(fen).ok()).collect();
    let extractor = FeatureExtractor::new();

    c.bench_function("extract_features", |b| {
        b.iter(|| {
            for board in &boards {
                black_box(extractor.extract(black_box(board)));
            }
        })
    });

    c.bench_function("attack_graph", |b| {
        b.iter(|| {
            for board in &boards {
                black_box(AttackGraph::from_board(black_box(board)));
            }
        })
    });
}

criterion_group!(benches, bench_features);
criterion_main!(benches);
