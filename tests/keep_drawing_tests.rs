use proteic::api::{BarLayout, Chart};
use proteic::core::{Config, Datum};
use proteic::render::NullRenderer;
use serde_json::json;

fn point(x: f64, y: f64) -> Datum {
    Datum::new().with("key", "A").with("x", x).with("y", y)
}

fn bar(key: &str, x: &str, y: f64) -> Datum {
    Datum::new().with("key", key).with("x", x).with("y", y)
}

#[test]
fn line_chart_window_drops_the_oldest_entries() {
    let config = Config::new().with("maxNumberOfElements", 3);
    let mut chart = Chart::linechart(NullRenderer::default(), Vec::new(), config).expect("chart init");
    for step in 0..5 {
        chart.keep_drawing(point(f64::from(step), 1.0)).expect("keep drawing");
    }
    let xs: Vec<f64> = chart.data().iter().filter_map(|d| d.number("x")).collect();
    assert_eq!(xs, vec![2.0, 3.0, 4.0]);

    chart
        .keep_drawing(vec![point(5.0, 1.0), point(6.0, 1.0)])
        .expect("batch");
    let xs: Vec<f64> = chart.data().iter().filter_map(|d| d.number("x")).collect();
    assert_eq!(xs, vec![4.0, 5.0, 6.0]);
}

#[test]
fn bar_chart_upserts_by_x_and_key() {
    let data = vec![bar("A", "jan", 1.0), bar("B", "jan", 2.0)];
    let mut chart = Chart::barchart(NullRenderer::default(), data, Config::new()).expect("chart init");
    chart.draw().expect("draw");

    chart.keep_drawing(bar("A", "jan", 7.0)).expect("update bar");
    chart.keep_drawing(bar("A", "feb", 3.0)).expect("new bar");
    assert_eq!(chart.data().len(), 3);
    assert_eq!(chart.data()[0].number("y"), Some(7.0));

    let bars = chart.container().surface().plot().select_all("barSeries");
    assert_eq!(bars.len(), 2);
}

#[test]
fn bar_layout_transition_switches_to_stacked() {
    let data = vec![bar("A", "jan", 1.0), bar("B", "jan", 2.0)];
    let mut chart = Chart::barchart(NullRenderer::default(), data, Config::new()).expect("chart init");
    chart.draw().expect("draw");
    chart.fire_transition(BarLayout::Stacked).expect("stack");
    assert_eq!(chart.config().get("stacked"), Some(&json!(true)));
    let y = chart.container().context().y_scale().expect("y").as_linear().expect("linear");
    assert_eq!(y.domain(), (0.0, 3.0));

    let mut line = Chart::linechart(NullRenderer::default(), Vec::new(), Config::new()).expect("line");
    assert!(line.fire_transition(BarLayout::Grouped).is_err());
}

#[test]
fn gauge_keeps_only_the_latest_value() {
    let mut chart = Chart::gauge(
        NullRenderer::default(),
        vec![Datum::new().with("value", 10.0)],
        Config::new(),
    )
    .expect("chart init");
    chart.draw().expect("draw");
    chart
        .keep_drawing(vec![Datum::new().with("value", 20.0), Datum::new().with("value", 65.0)])
        .expect("batch");
    assert_eq!(chart.data(), [Datum::new().with("value", 65.0)].as_slice());

    let value = chart
        .container()
        .surface()
        .plot()
        .find(&|node| node.has_class("value"))
        .and_then(|node| node.text())
        .map(str::to_owned);
    assert_eq!(value.as_deref(), Some("65"));
}

#[test]
fn json_payloads_push_one_datum_or_a_batch() {
    let mut chart = Chart::piechart(NullRenderer::default(), Vec::new(), Config::new()).expect("chart init");
    chart
        .keep_drawing_json(json!({"key": "A", "x": 2}))
        .expect("object payload");
    chart
        .keep_drawing_json(json!([{"key": "B", "x": 1}, {"key": "C", "x": 1}]))
        .expect("array payload");
    assert_eq!(chart.data().len(), 3);
    assert!(chart.keep_drawing_json(json!(42)).is_err());
}
