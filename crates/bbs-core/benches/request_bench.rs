//! Criterion benchmarks for the request pipeline.
//!
//! Measures tokenizing, validating and encoding one line of terminal input,
//! the work done on the caller-driven path for every user action.
//!
//! Run with:
//! ```bash
//! cargo bench --package bbs-core --bench request_bench
//! ```

use bbs_core::{encode_request, parse_line, Request};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const LINES: [(&str, &str); 4] = [
    ("join", "%join"),
    ("groupmessage", "%groupmessage teamA 42"),
    ("grouppost", "%grouppost ; teamA ; Weekly sync ; Notes are in the shared folder"),
    ("username", "alice"),
];

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_line");
    for (name, line) in LINES {
        group.bench_with_input(BenchmarkId::from_parameter(name), line, |b, line| {
            b.iter(|| parse_line(black_box(line)));
        });
    }
    group.finish();
}

fn bench_build_and_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_and_encode");
    for (name, line) in LINES {
        let Some(command) = parse_line(line) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::from_parameter(name), &command, |b, command| {
            b.iter(|| {
                // Username text has no structured encoding; it still costs a
                // validation attempt on the real path.
                if let Ok(request) = Request::build(black_box(command)) {
                    black_box(encode_request(&request).ok());
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_build_and_encode);
criterion_main!(benches);
