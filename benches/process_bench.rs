// Copyright (c) 2026 Bountyy Oy. All rights reserved.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use gila_csp::{process_html, scan, synthesize, CollectedResources, CspConfig};

fn scan_benchmark(c: &mut Criterion) {
    let html = r#"
        <!DOCTYPE html>
        <html>
        <head>
            <title>Bench</title>
            <style>body { margin: 0; font-family: sans-serif; }</style>
            <script type="application/ld+json">{"@type": "Organization"}</script>
            <script src="https://cdn.example.com/lib.js"></script>
            <link rel="stylesheet" href="https://fonts.googleapis.com/css?family=Roboto">
        </head>
        <body>
            <script>window.__data = { page: "home" };</script>
        </body>
        </html>
    "#;

    c.bench_function("scan_html", |b| {
        b.iter(|| black_box(scan(black_box(html))))
    });

    c.bench_function("process_html", |b| {
        b.iter(|| black_box(process_html(black_box(html))))
    });
}

fn synthesize_benchmark(c: &mut Criterion) {
    let collected = CollectedResources {
        script_digests: (0..50).map(|i| format!("sha256-script{}", i)).collect(),
        style_digests: (0..20).map(|i| format!("sha256-style{}", i)).collect(),
        external_scripts: vec!["https://cdn.example.com/a.js".to_string()],
        external_styles: vec!["https://fonts.googleapis.com/css".to_string()],
    };
    let config = CspConfig::default().preset("google-analytics");

    c.bench_function("synthesize_directives", |b| {
        b.iter(|| black_box(synthesize(black_box(&collected), black_box(&config))))
    });
}

criterion_group!(benches, scan_benchmark, synthesize_benchmark);
criterion_main!(benches);
