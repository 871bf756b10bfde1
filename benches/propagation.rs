use criterion::{criterion_group, criterion_main, Criterion};
use std::collections::HashMap;
use tracehop::propagation::b3::{B3Encoding, B3Propagator};
use tracehop::propagation::trace_context::TraceContextPropagator;
use tracehop::propagation::TextMapPropagator;
use tracehop::trace::{SpanContext, SpanId, TraceFlags, TraceId, TraceState};
use tracehop::Context;

fn sampled_context() -> Context {
    Context::new().with_remote_span_context(SpanContext::new(
        TraceId::from(0x4bf9_2f35_77b3_4da6_a3ce_929d_0e0e_4736),
        SpanId::from(0x00f0_67aa_0ba9_02b7),
        TraceFlags::SAMPLED,
        true,
        TraceState::from_header("foo=bar"),
    ))
}

fn bench_inject(c: &mut Criterion) {
    let mut group = c.benchmark_group("inject");
    let cx = sampled_context();

    let propagators: Vec<(&str, Box<dyn TextMapPropagator>)> = vec![
        ("w3c", Box::new(TraceContextPropagator::new())),
        ("b3_multi", Box::new(B3Propagator::new())),
        (
            "b3_single",
            Box::new(B3Propagator::with_encoding(B3Encoding::SingleHeader)),
        ),
    ];

    for (name, propagator) in propagators {
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut carrier: HashMap<String, String> = HashMap::new();
                propagator.inject_context(&cx, &mut carrier);
                carrier
            })
        });
    }
    group.finish();
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");
    let cx = sampled_context();

    let propagators: Vec<(&str, Box<dyn TextMapPropagator>)> = vec![
        ("w3c", Box::new(TraceContextPropagator::new())),
        ("b3_multi", Box::new(B3Propagator::new())),
        (
            "b3_single",
            Box::new(B3Propagator::with_encoding(B3Encoding::SingleHeader)),
        ),
    ];

    for (name, propagator) in propagators {
        let mut carrier: HashMap<String, String> = HashMap::new();
        propagator.inject_context(&cx, &mut carrier);

        group.bench_function(name, |b| b.iter(|| propagator.extract(&carrier)));
    }
    group.finish();
}

criterion_group!(benches, bench_inject, bench_extract);
criterion_main!(benches);
