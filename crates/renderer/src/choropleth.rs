//! Zoomable choropleth map.
//!
//! [`ChoroplethMap`] owns the derived map state and the current view. Its
//! zoom and prop-update methods are a thin adapter over the pure functions
//! in `projection`: each computes the next state, stores it, and notifies
//! the zoom listener.

use std::fmt;
use std::sync::Arc;

use projection::{
    detect_changes, pan, recompute, resync, Container, MapProps, MapState, Staleness, ViewState,
    ZoomDirection, ZoomEvent, DEFAULT_ZOOM_FACTOR,
};
use serde_json::Value;
use topology::{Feature, FeatureGeometry, Topology};
use tracing::debug;
use viz_common::{canonical_key, Accessor, BoundingBox};

use crate::controls::{render_controls, ControlAction};
use crate::error::{RenderError, RenderResult};
use crate::event::{FeatureHandler, UiEvent, ZoomHandler};
use crate::legend::AccessorConfig;
use crate::markup::{number, Element, SVG_NS};
use crate::path::{geometry_path, POINT_RADIUS};
use crate::scale::ColorScale;

const STROKE: &str = "#ffffff";
const STROKE_WIDTH: &str = "0.5";
const SELECTED_STROKE: &str = "#000000";
const SELECTED_STROKE_WIDTH: &str = "2";
const SELECTED_STROKE_WIDTH_PX: f64 = 2.0;

fn feature_extent(feature: &Feature) -> BoundingBox {
    let mut bounds = BoundingBox::empty();
    feature
        .geometry
        .for_each_position(&mut |p| bounds.extend(p[0], p[1]));
    bounds
}

#[derive(Clone)]
pub struct ChoroplethProps {
    /// Names of topology objects to draw, bottom to top
    pub layers: Vec<String>,
    pub topology: Arc<Topology>,
    pub data: Arc<Vec<Value>>,
    /// Resolves the datum key matched against feature ids
    pub key_field: Accessor,
    /// Resolves the datum value fed to the color scale
    pub value_field: Accessor,
    pub color_scale: Arc<dyn ColorScale>,
    /// Keys of features drawn with a heavier outline
    pub selected_locations: Vec<Value>,
    pub width: f64,
    pub height: f64,
    /// Zoom step multiplier
    pub scale_factor: f64,
    pub zoom_handler: Option<ZoomHandler>,
    pub click_handler: Option<FeatureHandler>,
    pub hover_handler: Option<FeatureHandler>,
}

impl ChoroplethProps {
    pub fn new(
        topology: Arc<Topology>,
        data: Arc<Vec<Value>>,
        key_field: impl Into<Accessor>,
        value_field: impl Into<Accessor>,
        color_scale: Arc<dyn ColorScale>,
    ) -> Self {
        let container = Container::default();
        Self {
            layers: Vec::new(),
            topology,
            data,
            key_field: key_field.into(),
            value_field: value_field.into(),
            color_scale,
            selected_locations: Vec::new(),
            width: container.width,
            height: container.height,
            scale_factor: DEFAULT_ZOOM_FACTOR,
            zoom_handler: None,
            click_handler: None,
            hover_handler: None,
        }
    }

    pub fn layers<S: Into<String>>(mut self, layers: impl IntoIterator<Item = S>) -> Self {
        self.layers = layers.into_iter().map(Into::into).collect();
        self
    }

    /// Take the join key and value accessors from a shared configuration.
    /// Unset entries keep the current accessors.
    pub fn accessors(mut self, config: &AccessorConfig) -> Self {
        if let Some(key_field) = &config.key_field {
            self.key_field = key_field.clone();
        }
        if let Some(value_field) = &config.value_field {
            self.value_field = value_field.clone();
        }
        self
    }

    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn on_zoom(mut self, handler: impl Fn(ZoomEvent) + Send + Sync + 'static) -> Self {
        self.zoom_handler = Some(Arc::new(handler));
        self
    }

    pub fn on_click(
        mut self,
        handler: impl Fn(&UiEvent, &Feature, Option<&Value>) + Send + Sync + 'static,
    ) -> Self {
        self.click_handler = Some(Arc::new(handler));
        self
    }

    pub fn on_hover(
        mut self,
        handler: impl Fn(&UiEvent, &Feature, Option<&Value>) + Send + Sync + 'static,
    ) -> Self {
        self.hover_handler = Some(Arc::new(handler));
        self
    }

    fn map_props(&self) -> MapProps {
        MapProps::new(
            self.topology.clone(),
            self.data.clone(),
            self.key_field.clone(),
            Container::new(self.width, self.height),
        )
    }

    fn is_selected(&self, key: Option<&Value>) -> bool {
        let key = match key.and_then(canonical_key) {
            Some(key) => key,
            None => return false,
        };
        self.selected_locations
            .iter()
            .any(|s| canonical_key(s).as_deref() == Some(key.as_str()))
    }
}

impl fmt::Debug for ChoroplethProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChoroplethProps")
            .field("layers", &self.layers)
            .field("data", &self.data.len())
            .field("key_field", &self.key_field)
            .field("value_field", &self.value_field)
            .field("selected_locations", &self.selected_locations)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("scale_factor", &self.scale_factor)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub struct ChoroplethMap {
    props: ChoroplethProps,
    state: MapState,
}

impl ChoroplethMap {
    /// Presimplify the topology, fit it to the container and index the data.
    pub fn new(props: ChoroplethProps) -> RenderResult<Self> {
        let state = MapState::new(&props.map_props())?;
        Ok(Self { props, state })
    }

    pub fn props(&self) -> &ChoroplethProps {
        &self.props
    }

    pub fn state(&self) -> &MapState {
        &self.state
    }

    pub fn view(&self) -> ViewState {
        self.state.view
    }

    /// Replace the props, rebuilding only the derived state whose inputs
    /// changed, then resync the zoom listener if anything was rebuilt.
    pub fn set_props(&mut self, props: ChoroplethProps) -> RenderResult<Staleness> {
        let next = props.map_props();
        let staleness = detect_changes(&self.props.map_props(), &next);
        if staleness.any() {
            self.state = recompute(&self.state, &next, staleness)?;
        }
        self.props = props;
        if staleness.any() {
            self.resync();
        }
        Ok(staleness)
    }

    pub fn zoom(&mut self, direction: ZoomDirection) -> RenderResult<ZoomEvent> {
        self.state.view = self.state.zoomed(direction, self.props.scale_factor)?;
        Ok(self.notify())
    }

    pub fn zoom_in(&mut self) -> RenderResult<ZoomEvent> {
        self.zoom(ZoomDirection::In)
    }

    pub fn zoom_out(&mut self) -> RenderResult<ZoomEvent> {
        self.zoom(ZoomDirection::Out)
    }

    pub fn zoom_reset(&mut self) -> RenderResult<ZoomEvent> {
        self.zoom(ZoomDirection::Reset)
    }

    /// Drag the map by a screen-space delta.
    pub fn pan(&mut self, dx: f64, dy: f64) -> ZoomEvent {
        self.state.view = pan(&self.state.view, [dx, dy]);
        self.notify()
    }

    /// Handle a press on one of the zoom controls.
    pub fn dispatch(&mut self, action: ControlAction) -> RenderResult<ZoomEvent> {
        self.zoom(action.direction())
    }

    /// Tell the zoom listener the current view without changing it.
    pub fn resync(&self) -> ZoomEvent {
        let event = resync(&self.state.view);
        if let Some(handler) = &self.props.zoom_handler {
            handler(event);
        }
        event
    }

    fn notify(&self) -> ZoomEvent {
        debug!(scale = self.state.view.scale, translate = ?self.state.view.translate, "View changed");
        self.resync()
    }

    pub fn feature(&self, layer: &str, index: usize) -> RenderResult<&Feature> {
        self.state
            .layers
            .get(layer)
            .ok_or_else(|| RenderError::LayerNotFound(layer.to_string()))?
            .features
            .get(index)
            .ok_or_else(|| RenderError::FeatureNotFound {
                layer: layer.to_string(),
                index,
            })
    }

    /// The datum joined to `feature`, if any.
    pub fn datum(&self, feature: &Feature) -> Option<&Value> {
        feature.id.as_ref().and_then(|id| self.state.data.get(id))
    }

    /// Dispatch a click on a feature. Returns whether a handler ran.
    pub fn click_feature(&self, layer: &str, index: usize, event: &mut UiEvent) -> RenderResult<bool> {
        self.dispatch_feature(self.props.click_handler.as_ref(), layer, index, event)
    }

    pub fn hover_feature(&self, layer: &str, index: usize, event: &mut UiEvent) -> RenderResult<bool> {
        self.dispatch_feature(self.props.hover_handler.as_ref(), layer, index, event)
    }

    fn dispatch_feature(
        &self,
        handler: Option<&FeatureHandler>,
        layer: &str,
        index: usize,
        event: &mut UiEvent,
    ) -> RenderResult<bool> {
        let feature = self.feature(layer, index)?;
        match handler {
            Some(handler) => {
                handler(event, feature, self.datum(feature));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// The full widget: controls plus the map SVG.
    pub fn render(&self) -> RenderResult<Element> {
        Ok(Element::new("div")
            .class(["choropleth"])
            .attr("width", format!("{}px", number(self.props.width)))
            .attr("height", format!("{}px", number(self.props.height)))
            .child(render_controls())
            .child(self.render_svg()?))
    }

    /// The map SVG alone, suitable for rasterizing.
    pub fn render_svg(&self) -> RenderResult<Element> {
        let layers = self
            .props
            .layers
            .iter()
            .map(|name| self.render_layer(name))
            .collect::<RenderResult<Vec<_>>>()?;

        Ok(Element::new("svg")
            .attr("xmlns", SVG_NS)
            .attr("width", format!("{}px", number(self.props.width)))
            .attr("height", format!("{}px", number(self.props.height)))
            .attr("overflow", "hidden")
            .attr("style", "pointer-events:all;")
            .children(layers))
    }

    fn render_layer(&self, name: &str) -> RenderResult<Element> {
        let collection = self
            .state
            .layers
            .get(name)
            .ok_or_else(|| RenderError::LayerNotFound(name.to_string()))?;

        let view = &self.state.view;
        let mut paths = Vec::with_capacity(collection.len());
        let mut selected = Vec::new();

        let visible = self.visible_extent();
        let mut culled = 0;

        for (index, feature) in collection.features.iter().enumerate() {
            if !feature_extent(feature).intersects(&visible) {
                culled += 1;
                continue;
            }
            let d = geometry_path(&feature.geometry, view);
            if d.is_empty() {
                continue;
            }
            let is_selected = self.props.is_selected(feature.id.as_ref());
            let path = self.render_feature(feature, index, d, is_selected);
            // selected outlines go last so neighbours don't paint over them
            if is_selected {
                selected.push(path);
            } else {
                paths.push(path);
            }
        }
        paths.extend(selected);

        debug!(layer = name, paths = paths.len(), culled, scale = view.scale, "Rendered layer");
        Ok(Element::new("g")
            .class(["layer"])
            .attr("data-layer", name)
            .children(paths))
    }

    /// The container in unprojected coordinates, padded so point markers and
    /// strokes straddling the edge still draw.
    fn visible_extent(&self) -> BoundingBox {
        let ViewState {
            scale,
            translate: [tx, ty],
        } = self.state.view;
        let pad = (POINT_RADIUS + SELECTED_STROKE_WIDTH_PX) / scale;
        BoundingBox::from_corners([
            [-tx / scale - pad, -ty / scale - pad],
            [
                (self.props.width - tx) / scale + pad,
                (self.props.height - ty) / scale + pad,
            ],
        ])
    }

    fn render_feature(&self, feature: &Feature, index: usize, d: String, selected: bool) -> Element {
        let value = self
            .datum(feature)
            .and_then(|datum| self.props.value_field.resolve(datum))
            .and_then(|value| value.as_f64());
        let color = self.props.color_scale.color(value);

        let (stroke, stroke_width) = if selected {
            (SELECTED_STROKE, SELECTED_STROKE_WIDTH)
        } else {
            (STROKE, STROKE_WIDTH)
        };

        let lineal = matches!(
            feature.geometry,
            FeatureGeometry::LineString(_) | FeatureGeometry::MultiLineString(_)
        );
        let (fill, stroke) = if lineal {
            ("none".to_string(), if selected { SELECTED_STROKE.to_string() } else { color })
        } else {
            (color, stroke.to_string())
        };

        Element::new("path")
            .class(["feature", if selected { "selected" } else { "" }])
            .attr("d", d)
            .attr("fill", fill)
            .attr("stroke", stroke)
            .attr("stroke-width", stroke_width)
            .attr("data-index", index)
            .opt_attr("data-key", feature.id.as_ref().and_then(canonical_key))
    }
}
