use criterion::{Criterion, criterion_group, criterion_main};
use indexmap::IndexMap;
use proteic::api::Chart;
use proteic::core::pie::pie;
use proteic::core::stack::StackRow;
use proteic::core::{
    Config, Datum, FieldValue, ForceSimulation, LinearScale, StackLayout, StackOffset, StackOrder,
};
use proteic::render::NullRenderer;
use std::hint::black_box;

fn bench_linear_scale_round_trip(c: &mut Criterion) {
    let scale = LinearScale::new((0.0, 10_000.0), (0.0, 1920.0)).expect("valid scale");

    c.bench_function("linear_scale_round_trip", |b| {
        b.iter(|| {
            let px = scale.to_pixel(black_box(4_321.123));
            let _ = scale.invert(px);
        })
    });
}

fn bench_streamgraph_stack_500x12(c: &mut Criterion) {
    let keys: Vec<String> = (0..12).map(|k| format!("serie-{k}")).collect();
    let rows: Vec<StackRow> = (0..500)
        .map(|i| StackRow {
            x: FieldValue::Number(i as f64),
            values: keys
                .iter()
                .enumerate()
                .map(|(k, key)| (key.clone(), 5.0 + ((i * (k + 3)) % 17) as f64))
                .collect::<IndexMap<String, f64>>(),
        })
        .collect();
    let layout = StackLayout::new(StackOrder::InsideOut, StackOffset::Wiggle);

    c.bench_function("streamgraph_stack_500x12", |b| {
        b.iter(|| {
            let _ = layout.stack(black_box(&rows), black_box(&keys));
        })
    });
}

fn bench_pie_layout_1k(c: &mut Criterion) {
    let values: Vec<f64> = (0..1_000).map(|i| ((i * 37) % 101) as f64 + 1.0).collect();

    c.bench_function("pie_layout_1k", |b| {
        b.iter(|| {
            let _ = pie(black_box(&values));
        })
    });
}

fn bench_force_settle_100(c: &mut Criterion) {
    let ids: Vec<String> = (0..100).map(|i| format!("n{i}")).collect();
    let links: Vec<(String, String)> = (1..100)
        .map(|i| (format!("n{}", i / 3), format!("n{i}")))
        .collect();

    c.bench_function("force_settle_100", |b| {
        b.iter(|| {
            let mut simulation = ForceSimulation::new(black_box(&ids), black_box(&links), (480.0, 250.0));
            let _ = simulation.settle();
        })
    });
}

fn bench_linechart_keep_drawing_2k(c: &mut Criterion) {
    let config = Config::new().with("maxNumberOfElements", 2_000);
    let mut chart =
        Chart::linechart(NullRenderer::default(), Vec::new(), config).expect("chart init");
    let initial: Vec<Datum> = (0..2_000)
        .map(|i| {
            Datum::new()
                .with("key", if i % 2 == 0 { "even" } else { "odd" })
                .with("x", f64::from(i))
                .with("y", f64::from(i % 50))
        })
        .collect();
    chart.keep_drawing(initial).expect("initial batch");
    let mut next = 2_000.0;

    c.bench_function("linechart_keep_drawing_2k", |b| {
        b.iter(|| {
            next += 1.0;
            chart
                .keep_drawing(Datum::new().with("key", "even").with("x", next).with("y", 7.0))
                .expect("keep drawing should succeed");
        })
    });
}

criterion_group!(
    benches,
    bench_linear_scale_round_trip,
    bench_streamgraph_stack_500x12,
    bench_pie_layout_1k,
    bench_force_settle_100,
    bench_linechart_keep_drawing_2k
);
criterion_main!(benches);
