use std::f64::consts::TAU;

use approx::assert_relative_eq;
use indexmap::IndexMap;
use proptest::prelude::*;
use proteic::core::pie::pie;
use proteic::core::stack::StackRow;
use proteic::core::{FieldValue, ForceSimulation, Hierarchy, LinearScale, StackLayout, StackOffset, StackOrder};
use proteic::Datum;

fn stack_rows(values: &[Vec<f64>]) -> (Vec<StackRow>, Vec<String>) {
    let width = values.iter().map(Vec::len).max().unwrap_or(0);
    let keys: Vec<String> = (0..width).map(|index| format!("k{index}")).collect();
    let rows = values
        .iter()
        .enumerate()
        .map(|(x, row)| StackRow {
            x: FieldValue::Number(x as f64),
            values: row
                .iter()
                .enumerate()
                .map(|(index, value)| (keys[index].clone(), *value))
                .collect::<IndexMap<String, f64>>(),
        })
        .collect();
    (rows, keys)
}

proptest! {
    #[test]
    fn pie_slices_cover_the_full_turn(values in prop::collection::vec(0.0f64..1000.0, 1..12)) {
        let slices = pie(&values);
        prop_assert_eq!(slices.len(), values.len());
        let covered: f64 = slices.iter().map(|slice| slice.end_angle - slice.start_angle).sum();
        if values.iter().any(|value| *value > 0.0) {
            prop_assert!((covered - TAU).abs() < 1e-9);
        } else {
            prop_assert_eq!(covered, 0.0);
        }
        for slice in &slices {
            prop_assert!(slice.start_angle <= slice.end_angle);
            prop_assert!(slice.end_angle <= TAU + 1e-9);
        }
    }

    #[test]
    fn stacked_band_heights_match_the_values(
        values in prop::collection::vec(prop::collection::vec(0.0f64..100.0, 3), 2..8),
        inside_out in any::<bool>(),
        wiggle in any::<bool>(),
    ) {
        let (rows, keys) = stack_rows(&values);
        let layout = StackLayout::new(
            if inside_out { StackOrder::InsideOut } else { StackOrder::None },
            if wiggle { StackOffset::Wiggle } else { StackOffset::None },
        );
        let series = layout.stack(&rows, &keys);
        prop_assert_eq!(series.len(), keys.len());
        for (key_index, serie) in series.iter().enumerate() {
            for (row_index, point) in serie.points.iter().enumerate() {
                prop_assert!((point.y1 - point.y0 - values[row_index][key_index]).abs() < 1e-6);
            }
        }
        // Bands of one column tile a contiguous span equal to the column total.
        for (row_index, row) in values.iter().enumerate() {
            let low = series.iter().map(|serie| serie.points[row_index].y0).fold(f64::INFINITY, f64::min);
            let high = series.iter().map(|serie| serie.points[row_index].y1).fold(f64::NEG_INFINITY, f64::max);
            let total: f64 = row.iter().sum();
            prop_assert!((high - low - total).abs() < 1e-6);
        }
    }

    #[test]
    fn linear_scale_inverts_its_mapping(
        start in -1e4f64..1e4,
        span in 1e-3f64..1e4,
        value in -1e4f64..1e4,
    ) {
        let scale = LinearScale::new((start, start + span), (0.0, 500.0)).expect("scale");
        let round_trip = scale.invert(scale.to_pixel(value));
        prop_assert!((round_trip - value).abs() <= 1e-6 * value.abs().max(1.0) * (1.0 + 1e4 / span));
    }
}

#[test]
fn force_layout_settles_around_the_center() {
    let ids: Vec<String> = ["a", "b", "c", "d"].iter().map(|id| (*id).to_owned()).collect();
    let links = vec![
        ("a".to_owned(), "b".to_owned()),
        ("b".to_owned(), "c".to_owned()),
        ("c".to_owned(), "a".to_owned()),
        ("d".to_owned(), "missing".to_owned()),
    ];
    let mut simulation = ForceSimulation::new(&ids, &links, (200.0, 150.0));
    assert_eq!(simulation.links().len(), 3);
    let ticks = simulation.settle();
    assert!(ticks > 0);
    assert!(simulation.alpha() < 0.001);

    let nodes = simulation.nodes();
    let mean_x = nodes.iter().map(|node| node.x).sum::<f64>() / nodes.len() as f64;
    let mean_y = nodes.iter().map(|node| node.y).sum::<f64>() / nodes.len() as f64;
    assert_relative_eq!(mean_x, 200.0, epsilon = 1e-3);
    assert_relative_eq!(mean_y, 150.0, epsilon = 1e-3);
    for pair in nodes.windows(2) {
        let distance = ((pair[0].x - pair[1].x).powi(2) + (pair[0].y - pair[1].y).powi(2)).sqrt();
        assert!(distance > 1.0, "nodes {} and {} overlap", pair[0].id, pair[1].id);
    }
}

#[test]
fn pinned_nodes_stay_put() {
    let ids: Vec<String> = vec!["a".to_owned(), "b".to_owned()];
    let links = vec![("a".to_owned(), "b".to_owned())];
    let mut simulation = ForceSimulation::new(&ids, &links, (0.0, 0.0));
    simulation.pin(0, 40.0, -20.0);
    for _ in 0..10 {
        simulation.tick();
    }
    assert_eq!((simulation.nodes()[0].x, simulation.nodes()[0].y), (40.0, -20.0));
    simulation.unpin(0);
    assert!(simulation.nodes()[0].fx.is_none());
}

#[test]
fn partition_spans_follow_summed_values() {
    let node = |id: &str, parent: &str, value: f64| {
        Datum::new().with("id", id).with("parent", parent).with("value", value)
    };
    let data = vec![
        node("root", "", 0.0),
        node("left", "root", 3.0),
        node("right", "root", 0.0),
        node("right.a", "right", 0.5),
        node("right.b", "right", 0.5),
    ];
    let mut tree = Hierarchy::stratify(&data, "id", "parent").expect("tree");
    tree.sum("value");
    tree.partition();
    let root = tree.node(tree.root());
    assert_relative_eq!(root.value, 4.0);
    let spans: Vec<(String, f64)> = tree
        .descendants()
        .into_iter()
        .map(|index| {
            let node = tree.node(index);
            (node.id.clone(), node.x1 - node.x0)
        })
        .collect();
    let span_of = |id: &str| spans.iter().find(|(name, _)| name == id).map(|(_, span)| *span);
    assert_eq!(span_of("left").map(|span| (span * 100.0).round()), Some(75.0));
    assert_eq!(span_of("right.a").map(|span| (span * 1000.0).round()), Some(125.0));
    assert_relative_eq!(tree.node(3).y0, 2.0 / 3.0, epsilon = 1e-12);
}
