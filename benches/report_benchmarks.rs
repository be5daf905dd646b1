use criterion::{black_box, criterion_group, criterion_main, Criterion};
use aws_utilization_reporter::collector::CollectedSamples;
use aws_utilization_reporter::config::DEFAULT_NAMESPACES;
use aws_utilization_reporter::report::{render_email_body, render_report};
use aws_utilization_reporter::MetricSample;

fn sample_set() -> CollectedSamples {
    let metrics = [
        "CPUUtilization",
        "NetworkIn",
        "NetworkOut",
        "Invocations",
        "Duration",
        "Errors",
        "ReadLatency",
        "WriteLatency",
    ];

    DEFAULT_NAMESPACES
        .iter()
        .flat_map(|ns| {
            metrics
                .iter()
                .enumerate()
                .map(move |(i, m)| MetricSample::new(*ns, *m, (i as f64 * 13.7) % 100.0))
        })
        .collect()
}

fn render_benchmark(c: &mut Criterion) {
    let collected = sample_set();

    c.bench_function("render_report", |b| {
        b.iter(|| {
            let table = render_report(black_box(&collected.samples), black_box(collected.highest));
            black_box(render_email_body(&table));
        })
    });
}

fn collect_benchmark(c: &mut Criterion) {
    let collected = sample_set();

    c.bench_function("track_highest", |b| {
        b.iter(|| {
            let tracked: CollectedSamples = black_box(collected.samples.clone()).into_iter().collect();
            black_box(tracked.highest);
        })
    });
}

criterion_group!(benches, render_benchmark, collect_benchmark);
criterion_main!(benches);
