use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;
use thumbnail_gateway::{
    models::Style,
    services::{prompt_builder::build_prompt, validator::validate},
};

fn bench_build_prompt(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_prompt");

    for style in Style::ALL {
        group.bench_with_input(
            BenchmarkId::new("style", style.as_str()),
            &style,
            |b, style| {
                b.iter(|| {
                    build_prompt(
                        black_box("How I rewrote our backend in a weekend"),
                        black_box(style.as_str()),
                        black_box(Some("refactoring, coffee")),
                    )
                })
            },
        );
    }

    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate");

    let short = json!({"videoTitle": "Rust tips", "style": "tech"}).to_string();
    let long = json!({
        "videoTitle": "t".repeat(200),
        "style": "news",
        "keywords": "k".repeat(100)
    })
    .to_string();

    for (name, body) in [("short", short), ("max_length", long)] {
        group.bench_with_input(BenchmarkId::new("body", name), &body, |b, body| {
            b.iter(|| validate(black_box(body.as_bytes())))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build_prompt, bench_validate);
criterion_main!(benches);
