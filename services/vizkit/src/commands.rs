//! Command implementations. Each returns its output so `main` decides where
//! it goes. Failures are `VizError`s so the exit status can tell bad input
//! from internal faults.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use projection::{ViewState, ZoomEvent};
use renderer::{svg_to_png, ChoroplethMap, ChoroplethProps, ControlAction, LinearColorScale, RasterOptions};
use test_utils::{generate_json_rows, GeneratorConfig};
use topology::Topology;
use viz_common::{BoundingBox, VizError, VizResult};

use crate::config::RenderConfig;

/// Synthetic rows as a pretty-printed JSON array.
pub fn generate(config: Option<&Path>) -> VizResult<String> {
    let config = match config {
        Some(path) => {
            let source = read_file(path, "config")?;
            GeneratorConfig::from_yaml_str(&source).map_err(|e| VizError::InvalidConfig {
                field: "config".to_string(),
                message: format!("{}: {}", path.display(), e),
            })?
        }
        None => GeneratorConfig::default(),
    };

    let rows = generate_json_rows(&config);
    info!(rows = rows.len(), "Generated synthetic rows");
    Ok(serde_json::to_string_pretty(&rows)?)
}

/// YAML config when given, then `VIZKIT_*` overrides either way.
pub fn load_config(path: Option<&Path>) -> VizResult<RenderConfig> {
    let config = match path {
        Some(path) => RenderConfig::from_yaml_file(path)
            .map_err(|e| VizError::InvalidConfig {
                field: "config".to_string(),
                message: format!("{:#}", e),
            })?
            .with_env_overrides(),
        None => RenderConfig::from_env(),
    };
    validate(&config)?;
    Ok(config)
}

pub fn load_topology(path: &Path) -> VizResult<Topology> {
    Ok(Topology::from_file(path)?)
}

#[derive(Debug, Serialize)]
pub struct LayerSummary {
    pub name: String,
    pub features: usize,
}

#[derive(Debug, Serialize)]
pub struct TopologySummary {
    pub arcs: usize,
    pub points: usize,
    pub quantized: bool,
    pub layers: Vec<LayerSummary>,
    pub bounds: BoundingBox,
    /// Points drawn at the view fitted to the configured container
    pub visible_points: usize,
    pub initial_view: ViewState,
}

/// Structural summary of a topology as seen by the map.
pub fn inspect(topology: Topology, config: &RenderConfig) -> VizResult<TopologySummary> {
    let map = build_map(Arc::new(topology), Arc::new(Vec::new()), config)?;
    let state = map.state();
    let simplified = &state.simplified;

    let layers = state
        .layers
        .iter()
        .map(|(name, collection)| LayerSummary {
            name: name.clone(),
            features: collection.len(),
        })
        .collect();

    Ok(TopologySummary {
        arcs: simplified.arcs.len(),
        points: simplified.arcs.iter().map(Vec::len).sum(),
        quantized: simplified.transform.is_some(),
        layers,
        bounds: state.bounds,
        visible_points: simplified.visible_point_count(state.initial.scale),
        initial_view: state.initial,
    })
}

/// Output of a render run.
#[derive(Debug)]
pub struct Rendered {
    pub svg: String,
    pub view: ViewState,
}

/// Render `topology` joined with `data`, after replaying the zoom `steps`.
pub fn render(
    topology: Topology,
    data: Vec<Value>,
    config: &RenderConfig,
    steps: &[ControlAction],
) -> VizResult<Rendered> {
    let mut map = build_map(Arc::new(topology), Arc::new(data), config)?;

    for step in steps {
        let ZoomEvent { scale, translate } = map.dispatch(*step)?;
        debug!(action = step.name(), scale, ?translate, "Applied zoom step");
    }

    let svg = map.render_svg()?.to_document();
    info!(bytes = svg.len(), scale = map.view().scale, "Rendered map");
    Ok(Rendered {
        svg,
        view: map.view(),
    })
}

/// Rasterize a rendered SVG document.
pub fn rasterize(svg: &str, config: &RenderConfig, pixel_ratio: f32) -> VizResult<Vec<u8>> {
    let options = RasterOptions {
        background: config.background.clone(),
        pixel_ratio,
    };
    Ok(svg_to_png(svg, &options)?)
}

/// Parse a JSON array of data records.
pub fn load_data(path: &Path) -> VizResult<Vec<Value>> {
    let content = read_file(path, "data")?;
    let parsed: Value = serde_json::from_str(&content)
        .map_err(|e| VizError::InvalidData(format!("{}: {}", path.display(), e)))?;
    match parsed {
        Value::Array(records) => Ok(records),
        other => Err(VizError::InvalidData(format!(
            "Data file must hold a JSON array, found {}",
            type_name(&other)
        ))),
    }
}

/// Parse zoom step names. Both `zoom-in` and the short `in` are accepted.
pub fn parse_steps(names: &[String]) -> VizResult<Vec<ControlAction>> {
    names
        .iter()
        .map(|name| {
            ControlAction::parse(name)
                .or_else(|| ControlAction::parse(&format!("zoom-{}", name)))
                .ok_or_else(|| VizError::InvalidConfig {
                    field: "zoom".to_string(),
                    message: format!("Unknown zoom step: {}", name),
                })
        })
        .collect()
}

fn validate(config: &RenderConfig) -> VizResult<()> {
    config.validate().map_err(|message| VizError::InvalidConfig {
        field: "render".to_string(),
        message,
    })
}

fn read_file(path: &Path, field: &str) -> VizResult<String> {
    std::fs::read_to_string(path).map_err(|e| VizError::InvalidConfig {
        field: field.to_string(),
        message: format!("Failed to read {}: {}", path.display(), e),
    })
}

fn build_map(
    topology: Arc<Topology>,
    data: Arc<Vec<Value>>,
    config: &RenderConfig,
) -> VizResult<ChoroplethMap> {
    validate(config)?;

    let layers: Vec<String> = if config.layers.is_empty() {
        topology.layer_names().map(String::from).collect()
    } else {
        config.layers.clone()
    };

    let scale = LinearColorScale::from_gradient(config.gradient(&data)?)?;

    let mut props = ChoroplethProps::new(
        topology,
        data,
        config.key_field.as_str(),
        config.value_field.as_str(),
        Arc::new(scale),
    )
    .layers(layers)
    .size(config.width, config.height);
    props.scale_factor = config.scale_factor;
    props.selected_locations = config.selected.clone();

    Ok(ChoroplethMap::new(props)?)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
