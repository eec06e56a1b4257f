//! Render configuration: defaults, YAML files and `VIZKIT_*` environment
//! overrides.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use viz_common::{
    Accessor, Color, ColorStop, GradientConfig, Interpolation, OutOfRangeBehavior, VizError,
    VizResult,
};

/// Ramp used when no stops are configured.
const LOW_COLOR: &str = "#f7fbff";
const HIGH_COLOR: &str = "#08306b";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Container width in pixels
    pub width: f64,

    /// Container height in pixels
    pub height: f64,

    /// Zoom step multiplier
    pub scale_factor: f64,

    /// Datum path matched against feature ids, e.g. `location.id`
    pub key_field: String,

    /// Datum path mapped to color
    pub value_field: String,

    /// Layers to draw; empty draws every layer
    pub layers: Vec<String>,

    /// Color stops; empty spans the data range with a blue ramp
    pub stops: Vec<ColorStop>,

    pub no_data_color: Color,

    /// Blend between stops: `linear` or `step`
    pub interpolation: Interpolation,

    /// Values beyond the stops: `clamp` or `transparent`
    pub out_of_range: OutOfRangeBehavior,

    /// JSON gradient file; replaces the stop and blend settings above
    pub gradient_file: Option<PathBuf>,

    /// Keys of regions to outline
    pub selected: Vec<Value>,

    /// PNG background; transparent when unset
    pub background: Option<Color>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 400.0,
            scale_factor: 1.5,
            key_field: "id".to_string(),
            value_field: "mean".to_string(),
            layers: Vec::new(),
            stops: Vec::new(),
            no_data_color: Color::Hex("#cccccc".to_string()),
            interpolation: Interpolation::default(),
            out_of_range: OutOfRangeBehavior::default(),
            gradient_file: None,
            selected: Vec::new(),
            background: None,
        }
    }
}

impl RenderConfig {
    /// Defaults overridden by environment variables.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Load from a YAML file. Missing fields take their defaults.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: RenderConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        debug!(path = %path.display(), "Loaded render config");
        Ok(config)
    }

    /// Apply `VIZKIT_*` variables from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(width) = lookup("VIZKIT_WIDTH").and_then(|v| v.parse().ok()) {
            self.width = width;
        }

        if let Some(height) = lookup("VIZKIT_HEIGHT").and_then(|v| v.parse().ok()) {
            self.height = height;
        }

        if let Some(factor) = lookup("VIZKIT_SCALE_FACTOR").and_then(|v| v.parse().ok()) {
            self.scale_factor = factor;
        }

        if let Some(field) = lookup("VIZKIT_KEY_FIELD") {
            self.key_field = field;
        }

        if let Some(field) = lookup("VIZKIT_VALUE_FIELD") {
            self.value_field = field;
        }

        if let Some(layers) = lookup("VIZKIT_LAYERS") {
            self.layers = layers
                .split(',')
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(String::from)
                .collect();
        }

        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        let positive = |v: f64| v.is_finite() && v > 0.0;

        if !positive(self.width) || !positive(self.height) {
            return Err(format!(
                "width and height must be positive, got {}x{}",
                self.width, self.height
            ));
        }

        if !positive(self.scale_factor) {
            return Err("scale_factor must be > 0".to_string());
        }

        if self.key_field.is_empty() || self.value_field.is_empty() {
            return Err("key_field and value_field must be set".to_string());
        }

        if self.stops.len() == 1 {
            return Err("stops needs at least two entries".to_string());
        }

        Ok(())
    }

    /// Gradient for the color scale: the gradient file when set, otherwise
    /// the configured stops and blend settings.
    pub fn gradient(&self, data: &[Value]) -> VizResult<GradientConfig> {
        let mut gradient = match &self.gradient_file {
            Some(path) => {
                let source = std::fs::read_to_string(path).map_err(|e| VizError::InvalidConfig {
                    field: "gradient_file".to_string(),
                    message: format!("{}: {}", path.display(), e),
                })?;
                GradientConfig::from_json(&source)?
            }
            None => GradientConfig {
                stops: self.resolve_stops(data),
                interpolation: self.interpolation.clone(),
                out_of_range: self.out_of_range.clone(),
                no_data_color: None,
            },
        };

        if gradient.no_data_color.is_none() {
            gradient.no_data_color = Some(self.no_data_color.clone());
        }
        gradient.validate()?;
        Ok(gradient)
    }

    /// Configured stops, or a two-stop ramp spanning `value_field` in `data`.
    pub fn resolve_stops(&self, data: &[Value]) -> Vec<ColorStop> {
        if !self.stops.is_empty() {
            return self.stops.clone();
        }

        let value = Accessor::path(&self.value_field);
        let (min, max) = data
            .iter()
            .filter_map(|d| value.resolve(d).as_ref().and_then(Value::as_f64))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        let (min, max) = match (min.is_finite(), max.is_finite()) {
            (true, true) if max > min => (min, max),
            (true, true) => (min, min + 1.0),
            _ => (0.0, 1.0),
        };

        vec![
            ColorStop::new(min, Color::Hex(LOW_COLOR.to_string())),
            ColorStop::new(max, Color::Hex(HIGH_COLOR.to_string())),
        ]
    }
}
