use std::cell::RefCell;
use std::rc::Rc;

use proteic::api::Chart;
use proteic::core::{Config, Datum};
use proteic::interaction::{HitRegion, HitShape, HitTarget, PointerEventKind};
use proteic::render::NullRenderer;

fn scatter() -> Chart<NullRenderer> {
    let point = |key: &str, x: f64, y: f64| Datum::new().with("key", key).with("x", x).with("y", y);
    let data = vec![point("A", 1.0, 10.0), point("A", 5.0, 2.0), point("B", 9.0, 7.0)];
    let mut chart = Chart::scatterplot(NullRenderer::default(), data, Config::new()).expect("chart init");
    chart.draw().expect("draw");
    chart
}

/// Surface coordinates of the anchor of the first region matching `pick`.
fn surface_anchor(chart: &Chart<NullRenderer>, pick: impl Fn(&HitRegion) -> bool) -> (f64, f64) {
    let region = chart
        .container()
        .context()
        .hits
        .regions()
        .iter()
        .find(|region| pick(region))
        .cloned()
        .expect("hit region");
    let (x, y) = match region.shape {
        HitShape::Rect { x, y, width, height } => (x + width / 2.0, y + height / 2.0),
        HitShape::Circle { cx, cy, .. } => (cx, cy),
        HitShape::Sector { cx, cy, arc } => {
            let (dx, dy) = arc.centroid();
            (cx + dx, cy + dy)
        }
    };
    let (dx, dy) = chart.container().offset();
    (x + dx, y + dy)
}

fn recorder(chart: &mut Chart<NullRenderer>, kind: PointerEventKind) -> Rc<RefCell<Vec<Option<f64>>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    chart.on(kind, move |event| {
        let y = event.hit.as_ref().and_then(|hit| hit.datum.number("y"));
        sink.borrow_mut().push(y);
    });
    seen
}

#[test]
fn hover_and_leave_follow_the_pointer() {
    let mut chart = scatter();
    let hovers = recorder(&mut chart, PointerEventKind::Hover);
    let leaves = recorder(&mut chart, PointerEventKind::Leave);
    let (x, y) = surface_anchor(&chart, |region| region.datum.number("y") == Some(2.0));

    chart.pointer_move(x, y).expect("move onto point");
    chart.pointer_move(x + 0.5, y).expect("move within point");
    assert_eq!(*hovers.borrow(), vec![Some(2.0)]);
    assert_eq!(chart.hovered().and_then(|datum| datum.number("x")), Some(5.0));

    chart.pointer_move(1.0, 1.0).expect("move away");
    assert_eq!(*leaves.borrow(), vec![Some(2.0)]);
    assert!(chart.hovered().is_none());
}

#[test]
fn leaving_the_surface_ends_the_hover() {
    let mut chart = scatter();
    let leaves = recorder(&mut chart, PointerEventKind::Leave);
    let (x, y) = surface_anchor(&chart, |region| region.datum.number("y") == Some(7.0));
    chart.pointer_move(x, y).expect("move");
    chart.pointer_leave().expect("leave");
    assert_eq!(*leaves.borrow(), vec![Some(7.0)]);
    chart.pointer_leave().expect("second leave");
    assert_eq!(leaves.borrow().len(), 1);
}

#[test]
fn click_requires_release_over_the_pressed_element() {
    let mut chart = scatter();
    let clicks = recorder(&mut chart, PointerEventKind::Click);
    let ups = recorder(&mut chart, PointerEventKind::Up);
    let (x, y) = surface_anchor(&chart, |region| region.datum.number("y") == Some(10.0));

    chart.pointer_down(x, y).expect("down");
    chart.pointer_up(x, y).expect("up");
    assert_eq!(*clicks.borrow(), vec![Some(10.0)]);

    chart.pointer_down(x, y).expect("down");
    chart.pointer_up(1.0, 1.0).expect("up elsewhere");
    assert_eq!(clicks.borrow().len(), 1);
    assert_eq!(ups.borrow().len(), 2);
}

#[test]
fn non_finite_pointer_positions_are_rejected() {
    let mut chart = scatter();
    assert!(chart.pointer_move(f64::NAN, 0.0).is_err());
    assert!(chart.wheel(0.0, 10.0, 10.0).is_err());
}

fn network() -> Chart<NullRenderer> {
    let data = vec![
        Datum::new().with("id", "a").with("key", "g1").with("weight", 20),
        Datum::new().with("id", "b").with("key", "g1").with("weight", 40),
        Datum::new().with("id", "c").with("key", "g2").with("weight", 60),
        Datum::new().with("class", "link").with("source", "a").with("target", "b").with("value", 3),
        Datum::new().with("class", "link").with("source", "b").with("target", "c").with("value", 5),
    ];
    let mut chart = Chart::network(NullRenderer::default(), data, Config::new()).expect("chart init");
    chart.draw().expect("draw");
    chart
}

fn node_center(chart: &Chart<NullRenderer>, node: usize) -> (f64, f64) {
    let region = chart
        .container()
        .context()
        .hits
        .regions()
        .iter()
        .find(|region| region.target == HitTarget::NetworkNode { index: node })
        .cloned()
        .expect("node region");
    match region.shape {
        HitShape::Circle { cx, cy, .. } => (cx, cy),
        other => panic!("unexpected node shape {other:?}"),
    }
}

#[test]
fn dragging_a_network_node_moves_it_with_the_pointer() {
    let mut chart = network();
    let (x, y) = surface_anchor(&chart, |region| region.target == HitTarget::NetworkNode { index: 0 });
    chart.pointer_down(x, y).expect("down");
    chart.pointer_move(x + 40.0, y - 25.0).expect("drag");

    let (dx, dy) = chart.container().offset();
    let (cx, cy) = node_center(&chart, 0);
    assert!((cx - (x + 40.0 - dx)).abs() < 1e-9);
    assert!((cy - (y - 25.0 - dy)).abs() < 1e-9);

    chart.pointer_up(x + 40.0, y - 25.0).expect("release");
    chart.pointer_move(x, y).expect("plain move");
    let released = node_center(&chart, 0);
    assert!(released.0.is_finite() && released.1.is_finite());
}

#[test]
fn wheel_zooms_the_network() {
    let mut chart = network();
    let (width, height) = chart.container().plot_size();
    let (dx, dy) = chart.container().offset();
    chart
        .wheel(2.0, dx + width / 2.0, dy + height / 2.0)
        .expect("zoom");
    let scaled = chart
        .container()
        .surface()
        .plot()
        .find(&|node| node.tag() == "circle" && node.attr("transform").is_some())
        .and_then(|node| node.attr("transform"))
        .map(str::to_owned);
    assert!(scaled.is_some_and(|transform| transform.ends_with("scale(2)")));

    let mut fixed = Chart::network(
        NullRenderer::default(),
        vec![Datum::new().with("id", "a")],
        Config::new().with("zoom", false),
    )
    .expect("chart init");
    fixed.draw().expect("draw");
    fixed.wheel(2.0, 10.0, 10.0).expect("ignored zoom");
    assert!(fixed
        .container()
        .surface()
        .plot()
        .find(&|node| node.attr("transform").is_some_and(|t| t.contains("scale(")))
        .is_none());
}

#[test]
fn sunburst_hover_dims_unrelated_arcs_and_fills_the_indicator() {
    let node = |id: &str, parent: &str, value: f64| {
        Datum::new()
            .with("id", id)
            .with("parent", parent)
            .with("label", id)
            .with("value", value)
    };
    let data = vec![
        node("root", "", 0.0),
        node("a", "root", 0.0),
        node("b", "root", 4.0),
        node("a1", "a", 1.0),
        node("a2", "a", 3.0),
    ];
    let mut chart = Chart::sunburst(NullRenderer::default(), data, Config::new()).expect("chart init");
    chart.draw().expect("draw");

    let (x, y) = surface_anchor(&chart, |region| region.datum.text("id") == Some("a2"));
    chart.pointer_move(x, y).expect("hover");

    let plot = chart.container().surface().plot();
    let value = plot
        .find(&|node| node.has_class("value"))
        .and_then(|node| node.text())
        .map(str::to_owned);
    let label = plot
        .find(&|node| node.has_class("label"))
        .and_then(|node| node.text())
        .map(str::to_owned);
    assert_eq!(value.as_deref(), Some("3"));
    assert_eq!(label.as_deref(), Some("a2"));

    let opacities: Vec<String> = plot
        .select_all("sunburst")
        .iter()
        .flat_map(|disk| disk.children())
        .filter_map(|path| path.style("opacity"))
        .map(str::to_owned)
        .collect();
    assert_eq!(opacities.iter().filter(|opacity| *opacity == "1").count(), 2);
    assert_eq!(opacities.iter().filter(|opacity| *opacity == "0.3").count(), 3);

    chart.pointer_leave().expect("leave");
    let plot = chart.container().surface().plot();
    let value = plot
        .find(&|node| node.has_class("value"))
        .and_then(|node| node.text())
        .map(str::to_owned);
    assert_eq!(value.as_deref(), Some(""));
}
