use proteic::api::{Chart, ChartKind};
use proteic::core::{Config, Datum};
use proteic::render::NullRenderer;

fn point(key: &str, x: f64, y: f64) -> Datum {
    Datum::new().with("key", key).with("x", x).with("y", y)
}

fn day(key: &str, x: &str, y: f64) -> Datum {
    Datum::new().with("key", key).with("x", x).with("y", y)
}

fn sample_data(kind: ChartKind) -> Vec<Datum> {
    match kind {
        ChartKind::Linechart | ChartKind::Scatterplot => vec![
            point("A", 1.0, 10.0),
            point("A", 2.0, 14.0),
            point("B", 1.0, 3.0),
            point("B", 2.0, 8.0),
        ],
        ChartKind::Barchart => vec![
            day("A", "jan", 4.0),
            day("B", "jan", 2.0),
            day("A", "feb", 5.0),
        ],
        ChartKind::Streamgraph | ChartKind::StackedArea => vec![
            day("A", "16/01/01", 3.0),
            day("B", "16/01/01", 1.0),
            day("A", "16/01/02", 2.0),
            day("B", "16/01/02", 4.0),
        ],
        ChartKind::Swimlane => vec![
            Datum::new()
                .with("key", "lane 1")
                .with("start", "16/01/01")
                .with("end", "16/01/05"),
            Datum::new()
                .with("key", "lane 2")
                .with("start", "16/01/03")
                .with("end", "16/01/09"),
        ],
        ChartKind::Gauge => vec![Datum::new().with("value", 42.0)],
        ChartKind::Sunburst => vec![
            Datum::new().with("id", "root").with("parent", "").with("label", "root"),
            Datum::new().with("id", "a").with("parent", "root").with("value", 2.0).with("label", "a"),
            Datum::new().with("id", "b").with("parent", "root").with("value", 1.0).with("label", "b"),
        ],
        ChartKind::Network => vec![
            Datum::new().with("id", "n1").with("key", "G1"),
            Datum::new().with("id", "n2").with("key", "G2"),
            Datum::new()
                .with("class", "link")
                .with("source", "n1")
                .with("target", "n2")
                .with("value", 2.0),
        ],
        ChartKind::PieChart => vec![
            Datum::new().with("key", "A").with("x", 3.0),
            Datum::new().with("key", "B").with("x", 1.0),
        ],
    }
}

#[test]
fn linechart_smoke_flow() {
    let config = Config::new().with("markerSize", 20).with("areaOpacity", 0.3);
    let mut chart = Chart::linechart(NullRenderer::default(), sample_data(ChartKind::Linechart), config)
        .expect("chart init");
    assert_eq!(
        chart.container().component_names(),
        vec!["xy-axes", "lineset", "areaset", "pointset", "legend"]
    );

    chart.draw().expect("draw");
    assert_eq!(chart.renderer().render_count, 1);
    assert!(chart.renderer().last_node_count > 10);

    chart.keep_drawing(point("A", 3.0, 20.0)).expect("keep drawing");
    assert_eq!(chart.data().len(), 5);
    assert_eq!(chart.renderer().render_count, 2);

    let svg = chart.svg();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(r#"class="proteic""#));
    assert!(svg.contains("lineSeries"));
}

#[test]
fn every_chart_kind_draws_its_sample_data() {
    for kind in ChartKind::ALL {
        let mut chart = Chart::new(NullRenderer::default(), kind, sample_data(kind), Config::new())
            .unwrap_or_else(|err| panic!("{} init: {err}", kind.name()));
        chart
            .draw()
            .unwrap_or_else(|err| panic!("{} draw: {err}", kind.name()));
        assert_eq!(chart.renderer().render_count, 1, "{}", kind.name());
        assert!(chart.renderer().last_node_count > 2, "{}", kind.name());
    }
}

#[test]
fn stored_data_keeps_raw_values_after_drawing() {
    let data = sample_data(ChartKind::Streamgraph);
    let mut chart =
        Chart::streamgraph(NullRenderer::default(), data.clone(), Config::new()).expect("chart init");
    chart.draw().expect("draw");
    assert_eq!(chart.data(), data.as_slice());
}

#[test]
fn centered_charts_translate_the_plot_to_its_middle() {
    let chart = Chart::piechart(
        NullRenderer::default(),
        sample_data(ChartKind::PieChart),
        Config::new(),
    )
    .expect("chart init");
    // 500 wide minus the 100 right margin, 500 high.
    assert_eq!(chart.container().offset(), (200.0, 250.0));
}

#[test]
fn scatterplot_canvas_mode_paints_stamps() {
    let config = Config::new().with("canvas", true);
    let mut chart = Chart::scatterplot(
        NullRenderer::default(),
        sample_data(ChartKind::Scatterplot),
        config,
    )
    .expect("chart init");
    chart.draw().expect("draw");
    assert_eq!(chart.canvas().map(|canvas| canvas.stamps().len()), Some(4));
    assert_eq!(chart.renderer().last_stamp_count, 4);
}

#[test]
fn tracing_setup_reports_whether_a_subscriber_was_installed() {
    let installed = proteic::telemetry::init_default_tracing();
    if !cfg!(feature = "telemetry") {
        assert!(!installed);
    }
    assert!(!proteic::telemetry::init_tracing_with_filter("proteic=debug"));
}
