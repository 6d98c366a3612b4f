//! Benchmarks for quality classification and stream ranking.
//!
//! Both run once per media item / per request on the stream path.
//!
//! Run with: `cargo bench --bench pipeline_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pmstream::model::{DIRECT_LABEL, PREMIUM_LABEL};
use pmstream::{classify, rank, StreamOption};

// ---------------------------------------------------------------------------
// Filename datasets
// ---------------------------------------------------------------------------

/// Filenames that hit a keyword early in the table.
const EARLY_HIT: &[&str] = &[
    "Champions.League.Final.UHD.HDR.mkv",
    "Grand.Prix.4K.onboard.ts",
    "Derby.2160p.WEB-DL.mkv",
];

/// Filenames that hit a keyword late in the table.
const LATE_HIT: &[&str] = &[
    "Match.Highlights.480p.mp4",
    "Week.12.Game.720p.x264.mkv",
    "Qualifying.1080p.HDTV.mkv",
];

/// Filenames without any keyword (full table scan, default tier).
const NO_HIT: &[&str] = &[
    "stream",
    "live-event-feed-backup-server-3.m3u8",
    "a-very-long-filename-without-any-resolution-marker-at-all-just-words.mkv",
];

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");

    for (name, set) in [("early_hit", EARLY_HIT), ("late_hit", LATE_HIT), ("no_hit", NO_HIT)] {
        group.bench_function(name, |b| {
            b.iter(|| {
                for filename in set {
                    black_box(classify(black_box(filename)));
                }
            });
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

fn options(n: usize) -> Vec<StreamOption> {
    (0..n)
        .map(|i| StreamOption {
            url: format!("https://cdn.example.com/{i}.m3u8"),
            title: format!("HD - source{i}"),
            name: if i % 3 == 0 { PREMIUM_LABEL } else { DIRECT_LABEL }.to_string(),
            description: String::new(),
        })
        .collect()
}

fn bench_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank");

    for n in [4, 32, 256] {
        let input = options(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &input, |b, input| {
            b.iter(|| black_box(rank(black_box(input.clone()))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_classify, bench_rank);
criterion_main!(benches);
