//! Per-kind default configuration.

use serde_json::{Value, json};

use crate::core::config::Config;

use super::ChartKind;

/// Width `"N%"` and `"auto"` widths resolve against this when the host does
/// not set `containerWidth`.
pub const DEFAULT_CONTAINER_WIDTH: f64 = 960.0;

fn margins(top: f64, right: f64, bottom: f64, left: f64) -> [(&'static str, Value); 4] {
    [
        ("marginTop", json!(top)),
        ("marginRight", json!(right)),
        ("marginBottom", json!(bottom)),
        ("marginLeft", json!(left)),
    ]
}

fn xy_axes(
    x: (&str, &str, bool),
    y: (&str, &str, bool, bool),
) -> [(&'static str, Value); 10] {
    [
        ("xAxisType", json!(x.0)),
        ("xAxisFormat", json!(x.1)),
        ("xAxisLabel", json!("")),
        ("xAxisGrid", json!(x.2)),
        ("yAxisType", json!(y.0)),
        ("yAxisFormat", json!(y.1)),
        ("yAxisLabel", json!("")),
        ("yAxisShow", json!(y.2)),
        ("yAxisGrid", json!(y.3)),
        ("legend", json!(true)),
    ]
}

fn build<I>(groups: I) -> Config
where
    I: IntoIterator<Item = (&'static str, Value)>,
{
    let mut config = Config::from_pairs([
        ("containerWidth", json!(DEFAULT_CONTAINER_WIDTH)),
        ("loadingIcon", json!("loading.gif")),
    ]);
    for (key, value) in groups {
        config.put(key, value);
    }
    config
}

/// Defaults for one chart kind.
#[must_use]
pub fn defaults_for(kind: ChartKind) -> Config {
    match kind {
        ChartKind::Linechart => build(
            [
                ("colorScale", json!("category7")),
                ("curve", json!("monotoneX")),
                ("areaOpacity", json!(0)),
                ("markerShape", json!("dot")),
                ("markerSize", json!(0)),
                ("markerOutlineWidth", json!(2)),
                ("width", json!("100%")),
                ("height", json!(250)),
                ("propertyX", json!("x")),
                ("propertyY", json!("y")),
                ("propertyKey", json!("key")),
                ("maxNumberOfElements", json!(10)),
            ]
            .into_iter()
            .chain(margins(20.0, 250.0, 130.0, 150.0))
            .chain(xy_axes(("linear", "", true), ("linear", "", true, true))),
        ),
        ChartKind::Barchart => build(
            [
                ("colorScale", json!("category5")),
                ("stacked", json!(false)),
                ("stackOrder", json!("none")),
                ("stackOffset", json!("none")),
                ("width", json!("100%")),
                ("height", json!(350)),
                ("propertyX", json!("x")),
                ("propertyY", json!("y")),
                ("propertyKey", json!("key")),
            ]
            .into_iter()
            .chain(margins(20.0, 250.0, 130.0, 150.0))
            .chain(xy_axes(("categorical", "", false), ("linear", "", true, true))),
        ),
        ChartKind::Gauge => build(
            [
                ("colorScale", json!("divergingSpectral2")),
                ("invertColorScale", json!(true)),
                ("minLevel", json!(0)),
                ("maxLevel", json!(100)),
                ("minAngle", json!(-90)),
                ("maxAngle", json!(90)),
                ("ringWidth", json!(50)),
                ("ringMargin", json!(20)),
                ("labelInset", json!(10)),
                ("needleNutRadius", json!(25)),
                ("needleLenghtRatio", json!(0.8)),
                ("numericIndicator", json!(true)),
                ("label", json!("km/h")),
                ("width", json!("50%")),
                ("height", json!(250)),
                ("ticks", json!(10)),
                ("propertyValue", json!("value")),
            ]
            .into_iter()
            .chain(margins(20.0, 250.0, 30.0, 50.0)),
        ),
        ChartKind::Scatterplot => build(
            [
                ("colorScale", json!("category7")),
                ("markerShape", json!("circle")),
                ("markerSize", json!(15)),
                ("markerOutlineWidth", json!(2)),
                ("width", json!("100%")),
                ("height", json!(250)),
                ("propertyX", json!("x")),
                ("propertyY", json!("y")),
                ("propertyKey", json!("key")),
                ("maxNumberOfElements", json!(100)),
                ("canvas", json!(false)),
            ]
            .into_iter()
            .chain(margins(20.0, 250.0, 130.0, 150.0))
            .chain(xy_axes(("linear", ".1f", true), ("linear", ".1f", true, true))),
        ),
        ChartKind::Streamgraph => build(
            [
                ("colorScale", json!("category4")),
                ("stacked", json!(true)),
                ("stackOrder", json!("insideOut")),
                ("stackOffset", json!("wiggle")),
                ("width", json!("100%")),
                ("height", json!(250)),
                ("propertyX", json!("x")),
                ("propertyY", json!("y")),
                ("propertyKey", json!("key")),
                ("maxNumberOfElements", json!(100)),
            ]
            .into_iter()
            .chain(margins(20.0, 250.0, 130.0, 150.0))
            .chain(xy_axes(("time", "%y/%m/%d", true), ("linear", "", false, false))),
        ),
        ChartKind::StackedArea => build(
            [
                ("colorScale", json!("category2")),
                ("stacked", json!(true)),
                ("stackOrder", json!("insideOut")),
                ("stackOffset", json!("none")),
                ("width", json!("100%")),
                ("height", json!(250)),
                ("propertyX", json!("x")),
                ("propertyY", json!("y")),
                ("propertyKey", json!("key")),
                ("maxNumberOfElements", json!(100)),
            ]
            .into_iter()
            .chain(margins(20.0, 250.0, 130.0, 150.0))
            .chain(xy_axes(("time", "%y/%m/%d", true), ("linear", "", true, true))),
        ),
        ChartKind::Swimlane => build(
            [
                ("colorScale", json!("category3")),
                ("width", json!("100%")),
                ("height", json!(250)),
                ("propertyStart", json!("start")),
                ("propertyEnd", json!("end")),
                ("propertyKey", json!("key")),
            ]
            .into_iter()
            .chain(margins(20.0, 250.0, 30.0, 50.0))
            .chain(xy_axes(("time", "%y/%m/%d", true), ("categorical", "s", true, true))),
        ),
        ChartKind::Sunburst => build(
            [
                ("colorScale", json!("category8")),
                ("width", json!("50%")),
                ("height", json!(450)),
                ("tickLabel", json!("")),
                ("maxNumberOfElements", json!(5)),
            ]
            .into_iter()
            .chain(margins(20.0, 20.0, 30.0, 50.0)),
        ),
        ChartKind::Network => build(
            [
                ("colorScale", json!("category7")),
                ("width", json!("100%")),
                ("height", json!(250)),
                ("nodeRadius", json!(8.5)),
                ("legend", json!(true)),
                ("linkWeight", json!(1)),
                ("nodeWeight", json!(8)),
                ("minLinkWeight", json!(0)),
                ("maxLinkWeight", json!(10)),
                ("minNodeWeight", json!(0)),
                ("maxNodeWeight", json!(100)),
                ("weighted", json!(false)),
                ("labelShow", json!(true)),
                ("labelField", json!("id")),
                ("propertyKey", json!("key")),
                ("zoom", json!(true)),
            ]
            .into_iter()
            .chain(margins(20.0, 250.0, 130.0, 150.0)),
        ),
        ChartKind::PieChart => build(
            [
                ("colorScale", json!("category8")),
                ("width", json!(500)),
                ("height", json!(500)),
                ("maxNumberOfElements", json!(5)),
                ("legend", json!(true)),
                ("propertyX", json!("x")),
                ("propertyKey", json!("key")),
            ]
            .into_iter()
            .chain(margins(0.0, 100.0, 0.0, 0.0)),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::defaults_for;
    use crate::api::ChartKind;

    #[test]
    fn every_kind_resolves_a_positive_plot_size() {
        for kind in ChartKind::ALL {
            let config = defaults_for(kind);
            let width = config.inner_width().expect("inner width");
            let height = config.inner_height().expect("inner height");
            assert!(width > 0.0 && height > 0.0, "{} has an empty plot", kind.name());
        }
    }

    #[test]
    fn stack_settings_follow_the_chart_kind() {
        let stream = defaults_for(ChartKind::Streamgraph);
        assert_eq!(stream.str_or("stackOffset", ""), "wiggle");
        let area = defaults_for(ChartKind::StackedArea);
        assert_eq!(area.str_or("stackOffset", ""), "none");
        assert_eq!(area.str_or("stackOrder", ""), "insideOut");
    }
}
