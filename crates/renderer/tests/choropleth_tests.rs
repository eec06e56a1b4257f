//! Choropleth rendering, zoom and prop updates over the two-region fixture.

use std::sync::{Arc, Mutex};

use projection::ZoomEvent;
use renderer::{
    svg_to_png, ChoroplethMap, ChoroplethProps, ColorScale, ControlAction, EventKind,
    AccessorConfig, LinearColorScale, RasterOptions, UiEvent,
};
use serde_json::{json, Value};
use test_utils::{assert_approx_eq, grid_topology, region_records, TWO_REGIONS};
use topology::Topology;
use viz_common::{Accessor, Color};

fn gray_scale() -> Arc<dyn ColorScale> {
    Arc::new(
        LinearColorScale::between(
            0.0,
            20.0,
            Color::Hex("#000000".to_string()),
            Color::Hex("#ffffff".to_string()),
        )
        .unwrap()
        .with_no_data(Color::Hex("#cccccc".to_string())),
    )
}

fn two_regions_props(data: Vec<Value>) -> ChoroplethProps {
    ChoroplethProps::new(
        Arc::new(Topology::from_json(TWO_REGIONS).unwrap()),
        Arc::new(data),
        "id",
        "mean",
        gray_scale(),
    )
    .layers(["regions", "border"])
}

fn recorder() -> (Arc<Mutex<Vec<ZoomEvent>>>, impl Fn(ZoomEvent) + Send + Sync + 'static) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    (events, move |event| sink.lock().unwrap().push(event))
}

// =============================================================================
// RENDERING
// =============================================================================

#[test]
fn test_regions_filled_from_data() {
    let map = ChoroplethMap::new(two_regions_props(region_records(&[1, 2], "id", "mean", 10.0))).unwrap();
    let svg = map.render_svg().unwrap();

    let groups = svg.find_all("g");
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].get_attr("data-layer"), Some("regions"));

    let regions = groups[0].find_all("path");
    assert_eq!(regions[0].get_attr("data-key"), Some("1"));
    assert_eq!(regions[0].get_attr("fill"), Some("#808080"));
    assert_eq!(regions[1].get_attr("fill"), Some("#ffffff"));
}

#[test]
fn test_missing_datum_uses_no_data_color() {
    let map = ChoroplethMap::new(two_regions_props(vec![json!({"id": 2, "mean": 5.0})])).unwrap();
    let svg = map.render_svg().unwrap();
    let regions = svg.find_all("g")[0].find_all("path");
    assert_eq!(regions[0].get_attr("fill"), Some("#cccccc"));
    assert_eq!(regions[1].get_attr("fill"), Some("#404040"));
}

#[test]
fn test_nested_key_and_value_paths_join() {
    let data = vec![
        json!({"location": {"id": 1}, "stats": {"mean": 10.0}}),
        json!({"location": {"id": 2}, "stats": {"mean": 20.0}}),
    ];
    let props = ChoroplethProps::new(
        Arc::new(Topology::from_json(TWO_REGIONS).unwrap()),
        Arc::new(data),
        "location.id",
        "stats.mean",
        gray_scale(),
    )
    .layers(["regions"]);
    let svg = ChoroplethMap::new(props).unwrap().render_svg().unwrap();

    let regions = svg.find_all("path");
    assert_eq!(regions[0].get_attr("fill"), Some("#808080"));
    assert_eq!(regions[1].get_attr("fill"), Some("#ffffff"));
}

#[test]
fn test_accessor_config_sets_join_fields() {
    let config: AccessorConfig = serde_json::from_value(json!({
        "labelKey": "name",
        "symbolColorKey": "color",
        "symbolTypeKey": "shape",
        "keyField": "location.id",
        "valueField": "stats.mean"
    }))
    .unwrap();
    let data = vec![json!({"location": {"id": 2}, "stats": {"mean": 0.0}})];
    let props = two_regions_props(data).accessors(&config);
    assert_eq!(props.key_field, Accessor::path("location.id"));

    let svg = ChoroplethMap::new(props).unwrap().render_svg().unwrap();
    let regions = svg.find_all("g")[0].find_all("path");
    assert_eq!(regions[0].get_attr("fill"), Some("#cccccc"));
    assert_eq!(regions[1].get_attr("fill"), Some("#000000"));
}

#[test]
fn test_function_accessors_join() {
    let data = vec![json!({"code": "r1", "count": 2}), json!({"code": "r2", "count": 1})];
    let key = Accessor::func(|d| {
        let code = d.get("code")?.as_str()?;
        code.strip_prefix('r')?.parse::<i64>().ok().map(Value::from)
    });
    let value = Accessor::func(|d| Some(json!(d.get("count")?.as_f64()? * 10.0)));
    let props = ChoroplethProps::new(
        Arc::new(Topology::from_json(TWO_REGIONS).unwrap()),
        Arc::new(data),
        key,
        value,
        gray_scale(),
    )
    .layers(["regions"]);
    let svg = ChoroplethMap::new(props).unwrap().render_svg().unwrap();

    let regions = svg.find_all("path");
    assert_eq!(regions[0].get_attr("fill"), Some("#ffffff"));
    assert_eq!(regions[1].get_attr("fill"), Some("#808080"));
}

#[test]
fn test_selected_region_drawn_last_with_heavy_stroke() {
    let mut props = two_regions_props(vec![]);
    props.selected_locations = vec![json!(1.0)];
    let svg = ChoroplethMap::new(props).unwrap().render_svg().unwrap();

    let regions = svg.find_all("g")[0].find_all("path");
    assert_eq!(regions[1].get_attr("data-key"), Some("1"));
    assert!(regions[1].has_class("selected"));
    assert_eq!(regions[1].get_attr("stroke-width"), Some("2"));
    assert!(!regions[0].has_class("selected"));
}

#[test]
fn test_widget_has_controls_and_sized_svg() {
    let map = ChoroplethMap::new(two_regions_props(vec![])).unwrap();
    let root = map.render().unwrap();

    assert!(root.has_class("choropleth"));
    assert_eq!(root.get_attr("width"), Some("600px"));
    let buttons = root.find_all("button");
    assert_eq!(buttons.len(), 3);
    let svg = root.find_all("svg")[0];
    assert_eq!(svg.get_attr("height"), Some("400px"));
    assert_eq!(svg.get_attr("overflow"), Some("hidden"));
}

#[test]
fn test_zoom_in_adds_detail() {
    let topology = Topology::from_json(
        r#"{"type":"Topology","arcs":[[[0,0],[1,0.01],[2,0],[3,0.02],[4,0],[100,0]]],
            "objects":{"line":{"type":"LineString","arcs":[0],"id":1}}}"#,
    )
    .unwrap();
    let props = ChoroplethProps::new(Arc::new(topology), Arc::new(vec![]), "id", "v", gray_scale())
        .layers(["line"])
        .size(100.0, 100.0);
    let mut map = ChoroplethMap::new(props).unwrap();

    let segments = |map: &ChoroplethMap| -> usize {
        let svg = map.render_svg().unwrap();
        let d = svg.find_all("path")[0].get_attr("d").unwrap_or("").to_string();
        d.matches('L').count()
    };

    let mut previous = segments(&map);
    for _ in 0..12 {
        map.zoom_in().unwrap();
        let current = segments(&map);
        assert!(current >= previous);
        previous = current;
    }
    assert_eq!(previous, 5);
}

// =============================================================================
// ZOOM AND PROPS
// =============================================================================

#[test]
fn test_zoom_listener_receives_each_step() {
    let (events, sink) = recorder();
    let mut map = ChoroplethMap::new(two_regions_props(vec![]).on_zoom(sink)).unwrap();
    let initial = map.view();

    map.dispatch(ControlAction::ZoomIn).unwrap();
    map.zoom_in().unwrap();
    map.zoom_out().unwrap();
    map.dispatch(ControlAction::ZoomReset).unwrap();

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 4);
    assert_approx_eq!(events[0].scale, initial.scale * 1.5, 1e-9);
    assert_approx_eq!(events[1].scale, initial.scale * 2.25, 1e-9);
    assert_approx_eq!(events[2].scale, initial.scale * 1.5, 1e-9);
    assert_eq!(events[3].scale, initial.scale);
    assert_eq!(events[3].translate, initial.translate);
}

#[test]
fn test_custom_scale_factor() {
    let mut props = two_regions_props(vec![]);
    props.scale_factor = 2.0;
    let mut map = ChoroplethMap::new(props).unwrap();
    let initial = map.view();
    let event = map.zoom_in().unwrap();
    assert_approx_eq!(event.scale, initial.scale * 2.0, 1e-9);
}

#[test]
fn test_set_props_resyncs_only_on_change() {
    let (events, sink) = recorder();
    let props = two_regions_props(vec![]).on_zoom(sink);
    let mut map = ChoroplethMap::new(props.clone()).unwrap();

    // same identities and size: nothing to rebuild
    let staleness = map.set_props(props.clone()).unwrap();
    assert!(!staleness.any());
    assert!(events.lock().unwrap().is_empty());

    let mut resized = props.clone();
    resized.width = 300.0;
    let staleness = map.set_props(resized).unwrap();
    assert!(staleness.size);
    let events = events.lock().unwrap();
    assert_eq!(events.len(), 1);
    // 20 units wide in 300px
    assert_approx_eq!(events[0].scale, 0.95 * 15.0, 1e-9);
}

#[test]
fn test_new_data_recolors_without_refit() {
    let mut map = ChoroplethMap::new(two_regions_props(vec![])).unwrap();
    map.zoom_in().unwrap();
    let zoomed = map.view();

    let mut props = map.props().clone();
    props.data = Arc::new(region_records(&[1, 2], "id", "mean", 20.0));
    let staleness = map.set_props(props).unwrap();
    assert!(staleness.data && !staleness.topology && !staleness.size);
    assert_eq!(map.view(), zoomed);

    let svg = map.render_svg().unwrap();
    let regions = svg.find_all("g")[0].find_all("path");
    assert_eq!(regions[0].get_attr("fill"), Some("#ffffff"));
}

#[test]
fn test_new_topology_refits() {
    let mut map = ChoroplethMap::new(two_regions_props(vec![])).unwrap();
    let mut props = map.props().clone();
    props.topology = Arc::new(Topology::from_value(grid_topology(4, 4, 10.0)).unwrap());
    props.layers = vec!["cells".to_string()];
    map.set_props(props).unwrap();

    // 40x40 into 600x400 is height-bound
    assert_approx_eq!(map.view().scale, 0.95 * 10.0, 1e-9);
    assert_eq!(map.render_svg().unwrap().find_all("path").len(), 16);
}

#[test]
fn test_features_outside_container_are_culled() {
    let props = ChoroplethProps::new(
        Arc::new(Topology::from_value(grid_topology(4, 4, 10.0)).unwrap()),
        Arc::new(vec![]),
        "id",
        "mean",
        gray_scale(),
    )
    .layers(["cells"]);
    let mut map = ChoroplethMap::new(props).unwrap();

    // 4 steps of 1.5 leave only the four middle cells on screen
    for _ in 0..4 {
        map.zoom_in().unwrap();
    }
    let svg = map.render_svg().unwrap();
    let mut indices: Vec<_> = svg
        .find_all("path")
        .iter()
        .filter_map(|p| p.get_attr("data-index").map(String::from))
        .collect();
    indices.sort();
    assert_eq!(indices, vec!["10", "5", "6", "9"]);

    // culled features stay addressable
    assert!(map.feature("cells", 0).is_ok());

    map.zoom_reset().unwrap();
    assert_eq!(map.render_svg().unwrap().find_all("path").len(), 16);
}

// =============================================================================
// EVENTS AND OUTPUT
// =============================================================================

#[test]
fn test_feature_click_gets_joined_datum() {
    let clicked = Arc::new(Mutex::new(None));
    let sink = clicked.clone();
    let props = two_regions_props(region_records(&[1, 2], "id", "mean", 10.0)).on_click(
        move |event, feature, datum| {
            assert_eq!(event.kind, EventKind::Click);
            *sink.lock().unwrap() = Some((feature.id.clone(), datum.cloned()));
        },
    );
    let map = ChoroplethMap::new(props).unwrap();

    let mut event = UiEvent::new(EventKind::Click).at(450.0, 200.0);
    assert!(map.click_feature("regions", 1, &mut event).unwrap());
    let (id, datum) = clicked.lock().unwrap().clone().unwrap();
    assert_eq!(id, Some(json!(2)));
    assert_eq!(datum.unwrap()["mean"], json!(20.0));

    assert!(map.click_feature("regions", 7, &mut event).is_err());
    assert!(!map.hover_feature("regions", 0, &mut event).unwrap());
}

#[test]
fn test_map_rasterizes_to_png() {
    let map = ChoroplethMap::new(
        two_regions_props(region_records(&[1, 2], "id", "mean", 10.0)).size(120.0, 80.0),
    )
    .unwrap();
    let svg = map.render_svg().unwrap().to_string();
    let png = svg_to_png(&svg, &RasterOptions::default()).unwrap();
    assert_eq!(&png[1..4], b"PNG");
}
