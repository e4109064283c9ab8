use proteic::api::Chart;
use proteic::core::{Config, Datum};
use proteic::interaction::PointerEventKind;
use proteic::render::{KEY_ATTR, NullRenderer};
use std::cell::RefCell;
use std::rc::Rc;

fn series_data() -> Vec<Datum> {
    let point = |key: &str, x: f64, y: f64| Datum::new().with("key", key).with("x", x).with("y", y);
    vec![point("A", 1.0, 2.0), point("A", 2.0, 3.0), point("B", 1.0, 1.0), point("B", 2.0, 4.0)]
}

fn line_opacity(chart: &Chart<NullRenderer>, key: &str) -> Option<String> {
    chart
        .container()
        .surface()
        .plot()
        .find(&|node| node.has_class("lineSeries") && node.attr(KEY_ATTR) == Some(key))
        .and_then(|node| node.style("opacity"))
        .map(str::to_owned)
}

fn drawn_chart() -> Chart<NullRenderer> {
    let mut chart =
        Chart::linechart(NullRenderer::default(), series_data(), Config::new()).expect("chart init");
    chart.draw().expect("draw");
    chart
}

#[test]
fn toggling_a_key_twice_restores_it() {
    let mut chart = drawn_chart();
    assert!(chart.legend_toggle("A").expect("toggle"));
    assert_eq!(line_opacity(&chart, "A").as_deref(), Some("0.06"));
    assert_eq!(line_opacity(&chart, "B").as_deref(), Some("1"));
    assert_eq!(chart.hidden_keys(), ["A".to_owned()].as_slice());

    assert!(chart.legend_toggle("A").expect("toggle back"));
    assert_eq!(line_opacity(&chart, "A").as_deref(), Some("1"));
    assert!(chart.hidden_keys().is_empty());
}

#[test]
fn unknown_legend_key_is_ignored() {
    let mut chart = drawn_chart();
    assert!(!chart.legend_toggle("Z").expect("toggle"));
    assert!(chart.hidden_keys().is_empty());
}

#[test]
fn clicking_the_legend_entry_hides_the_series() {
    let mut chart = drawn_chart();
    let clicks = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&clicks);
    chart.on(PointerEventKind::Click, move |_| *counter.borrow_mut() += 1);

    let (width, _) = chart.container().plot_size();
    let (dx, dy) = chart.container().offset();
    // Second entry (B) sits one row below the first.
    let (x, y) = (dx + width + 15.0, dy + 25.0 + 10.0);
    chart.pointer_down(x, y).expect("down");
    chart.pointer_up(x, y).expect("up");

    assert_eq!(*clicks.borrow(), 1);
    assert_eq!(chart.hidden_keys(), ["B".to_owned()].as_slice());
    assert_eq!(line_opacity(&chart, "B").as_deref(), Some("0.06"));
}

#[test]
fn hidden_keys_survive_a_redraw() {
    let mut chart = drawn_chart();
    chart.legend_toggle("B").expect("toggle");
    chart
        .keep_drawing(Datum::new().with("key", "B").with("x", 3.0).with("y", 2.0))
        .expect("keep drawing");
    assert_eq!(line_opacity(&chart, "B").as_deref(), Some("0.06"));

    let swatch_fill = chart
        .container()
        .surface()
        .plot()
        .find(&|node| node.has_class("legend-entry") && node.attr(proteic::render::LEGEND_KEY_ATTR) == Some("B"))
        .and_then(|entry| entry.children().iter().find(|child| child.tag() == "rect"))
        .and_then(|rect| rect.style("fill"))
        .map(str::to_owned);
    assert_eq!(swatch_fill.as_deref(), Some("transparent"));
}
