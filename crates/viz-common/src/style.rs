//! Color and gradient configuration for choropleth fills.
//!
//! Gradients are defined in JSON or YAML as an ordered list of color stops,
//! mapping a data value onto a fill color.

use serde::{Deserialize, Serialize};

/// Continuous gradient color mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientConfig {
    /// Color stops defining the gradient
    pub stops: Vec<ColorStop>,

    /// How to interpolate between stops
    #[serde(default)]
    pub interpolation: Interpolation,

    /// How to handle values outside the defined range
    #[serde(default)]
    pub out_of_range: OutOfRangeBehavior,

    /// Fill for regions without a datum
    #[serde(default)]
    pub no_data_color: Option<Color>,
}

impl GradientConfig {
    /// Parse a gradient from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, StyleError> {
        serde_json::from_str(json).map_err(|e| StyleError::ParseError(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), StyleError> {
        if self.stops.len() < 2 {
            return Err(StyleError::ValidationError(
                "Gradient must have at least 2 color stops".to_string(),
            ));
        }

        for pair in self.stops.windows(2) {
            if pair[1].value <= pair[0].value {
                return Err(StyleError::ValidationError(
                    "Color stops must be in ascending value order".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Interpolate color for a given value.
    ///
    /// An empty gradient yields the no-data color.
    pub fn interpolate(&self, value: f64) -> Color {
        let (first, last) = match (self.stops.first(), self.stops.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return self.no_data(),
        };

        if value.is_nan() {
            return self.no_data();
        }

        if value < first.value || value > last.value {
            let edge = if value < first.value { first } else { last };
            return match self.out_of_range {
                OutOfRangeBehavior::Clamp => edge.color.clone(),
                OutOfRangeBehavior::Transparent => Color::transparent(),
            };
        }

        for pair in self.stops.windows(2) {
            let (low, high) = (&pair[0], &pair[1]);
            if value <= high.value {
                let t = (value - low.value) / (high.value - low.value);
                return low.color.lerp(&high.color, t, &self.interpolation);
            }
        }

        last.color.clone()
    }

    /// Color used where no value is available.
    pub fn no_data(&self) -> Color {
        self.no_data_color
            .clone()
            .unwrap_or_else(|| Color::Hex("#cccccc".to_string()))
    }
}

/// A color stop in a gradient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorStop {
    /// The data value at this stop
    pub value: f64,

    /// The color at this stop
    pub color: Color,

    /// Optional label for legend
    #[serde(default)]
    pub label: Option<String>,
}

impl ColorStop {
    pub fn new(value: f64, color: Color) -> Self {
        Self {
            value,
            color,
            label: None,
        }
    }
}

/// Color representation supporting multiple formats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    /// "#RRGGBB", "#RRGGBBAA" or a CSS color name
    Hex(String),

    /// RGB array: [r, g, b] or [r, g, b, a]
    Array(Vec<u8>),

    /// Explicit RGBA
    Rgba { r: u8, g: u8, b: u8, a: u8 },
}

impl Color {
    pub fn transparent() -> Self {
        Color::Rgba {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Convert to RGBA tuple.
    pub fn to_rgba(&self) -> (u8, u8, u8, u8) {
        match self {
            Color::Hex(s) if s.starts_with('#') => parse_hex_color(s),
            Color::Hex(name) => named_color(name),
            Color::Array(arr) => {
                let r = arr.first().copied().unwrap_or(0);
                let g = arr.get(1).copied().unwrap_or(0);
                let b = arr.get(2).copied().unwrap_or(0);
                let a = arr.get(3).copied().unwrap_or(255);
                (r, g, b, a)
            }
            Color::Rgba { r, g, b, a } => (*r, *g, *b, *a),
        }
    }

    /// Format as an SVG/CSS color value.
    pub fn to_css(&self) -> String {
        let (r, g, b, a) = self.to_rgba();
        if a == 255 {
            format!("#{:02x}{:02x}{:02x}", r, g, b)
        } else {
            format!("rgba({},{},{},{:.3})", r, g, b, a as f64 / 255.0)
        }
    }

    /// Linear interpolation between two colors.
    pub fn lerp(&self, other: &Color, t: f64, interp: &Interpolation) -> Color {
        let (r1, g1, b1, a1) = self.to_rgba();
        let (r2, g2, b2, a2) = other.to_rgba();

        let t = t.clamp(0.0, 1.0);

        let lerp_u8 = |a: u8, b: u8, t: f64| -> u8 {
            ((a as f64) * (1.0 - t) + (b as f64) * t).round() as u8
        };

        match interp {
            Interpolation::Linear => Color::Rgba {
                r: lerp_u8(r1, r2, t),
                g: lerp_u8(g1, g2, t),
                b: lerp_u8(b1, b2, t),
                a: lerp_u8(a1, a2, t),
            },
            Interpolation::Step => {
                if t < 0.5 {
                    self.clone()
                } else {
                    other.clone()
                }
            }
        }
    }
}

fn parse_hex_color(s: &str) -> (u8, u8, u8, u8) {
    let s = s.trim_start_matches('#');
    let channel = |i: usize| {
        s.get(i..i + 2)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
            .unwrap_or(0)
    };

    match s.len() {
        6 => (channel(0), channel(2), channel(4), 255),
        8 => (channel(0), channel(2), channel(4), channel(6)),
        _ => (0, 0, 0, 255),
    }
}

fn named_color(name: &str) -> (u8, u8, u8, u8) {
    match name.to_lowercase().as_str() {
        "transparent" | "none" => (0, 0, 0, 0),
        "black" => (0, 0, 0, 255),
        "white" => (255, 255, 255, 255),
        "red" => (255, 0, 0, 255),
        "green" => (0, 128, 0, 255),
        "blue" => (0, 0, 255, 255),
        "yellow" => (255, 255, 0, 255),
        "steelblue" => (70, 130, 180, 255),
        "orange" => (255, 165, 0, 255),
        "purple" => (128, 0, 128, 255),
        "gray" | "grey" => (128, 128, 128, 255),
        _ => (0, 0, 0, 255),
    }
}

/// Interpolation method between color stops.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    #[default]
    Linear,
    Step,
}

/// Behavior for values outside the gradient range.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutOfRangeBehavior {
    #[default]
    Clamp,
    Transparent,
}

/// Style-related errors.
#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_stop() -> GradientConfig {
        GradientConfig::from_json(
            r##"{"stops":[{"value":0,"color":"#000000"},{"value":100,"color":"#FFFFFF"}]}"##,
        )
        .unwrap()
    }

    #[test]
    fn test_parse_gradient() {
        let json = r##"{"stops":[{"value":-40,"color":"#9013FE","label":"low"},{"value":0,"color":"#00FFFF"},{"value":40,"color":"#FF0000","label":"high"}],"interpolation":"linear","out_of_range":"clamp","no_data_color":"white"}"##;

        let config = GradientConfig::from_json(json).unwrap();
        config.validate().unwrap();
        assert_eq!(config.stops.len(), 3);
        assert_eq!(config.no_data().to_rgba(), (255, 255, 255, 255));
    }

    #[test]
    fn test_interpolate_midpoint() {
        let color = two_stop().interpolate(50.0);
        let (r, g, b, a) = color.to_rgba();
        assert_eq!((r, g, b, a), (128, 128, 128, 255));
    }

    #[test]
    fn test_out_of_range_clamps() {
        let config = two_stop();
        assert_eq!(config.interpolate(-10.0).to_rgba(), (0, 0, 0, 255));
        assert_eq!(config.interpolate(1000.0).to_rgba(), (255, 255, 255, 255));
    }

    #[test]
    fn test_out_of_range_transparent() {
        let mut config = two_stop();
        config.out_of_range = OutOfRangeBehavior::Transparent;
        assert_eq!(config.interpolate(-10.0).to_rgba().3, 0);
    }

    #[test]
    fn test_validate_rejects_unordered_stops() {
        let config = GradientConfig::from_json(
            r##"{"stops":[{"value":10,"color":"red"},{"value":5,"color":"blue"}]}"##,
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(StyleError::ValidationError(_))
        ));
    }

    #[test]
    fn test_color_parsing() {
        let hex = Color::Hex("#FF5500".to_string());
        assert_eq!(hex.to_rgba(), (255, 85, 0, 255));

        let arr = Color::Array(vec![100, 150, 200]);
        assert_eq!(arr.to_rgba(), (100, 150, 200, 255));

        let named = Color::Hex("red".to_string());
        assert_eq!(named.to_rgba(), (255, 0, 0, 255));
    }

    #[test]
    fn test_color_to_css() {
        assert_eq!(Color::Hex("#FF5500".to_string()).to_css(), "#ff5500");
        assert_eq!(Color::transparent().to_css(), "rgba(0,0,0,0.000)");
    }
}
