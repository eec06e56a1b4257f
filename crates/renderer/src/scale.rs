//! Value-to-fill mapping for choropleth regions.

use viz_common::{Color, ColorStop, GradientConfig};

use crate::error::RenderResult;

/// Maps a region's value to a CSS fill. `None` means the region has no
/// datum.
pub trait ColorScale: Send + Sync {
    fn color(&self, value: Option<f64>) -> String;
}

impl<F> ColorScale for F
where
    F: Fn(Option<f64>) -> String + Send + Sync,
{
    fn color(&self, value: Option<f64>) -> String {
        self(value)
    }
}

/// Piecewise-linear scale over ascending color stops.
#[derive(Debug, Clone)]
pub struct LinearColorScale {
    gradient: GradientConfig,
}

impl LinearColorScale {
    pub fn new(stops: Vec<ColorStop>) -> RenderResult<Self> {
        Self::from_gradient(GradientConfig {
            stops,
            interpolation: Default::default(),
            out_of_range: Default::default(),
            no_data_color: None,
        })
    }

    pub fn from_gradient(gradient: GradientConfig) -> RenderResult<Self> {
        gradient.validate()?;
        Ok(Self { gradient })
    }

    /// Two-stop scale from `low` to `high` over `[min, max]`.
    pub fn between(min: f64, max: f64, low: Color, high: Color) -> RenderResult<Self> {
        Self::new(vec![ColorStop::new(min, low), ColorStop::new(max, high)])
    }

    pub fn with_no_data(mut self, color: Color) -> Self {
        self.gradient.no_data_color = Some(color);
        self
    }

    /// `(first stop, last stop)` values.
    pub fn domain(&self) -> (f64, f64) {
        let first = self.gradient.stops.first().map_or(f64::NAN, |s| s.value);
        let last = self.gradient.stops.last().map_or(f64::NAN, |s| s.value);
        (first, last)
    }

    pub fn gradient(&self) -> &GradientConfig {
        &self.gradient
    }
}

impl ColorScale for LinearColorScale {
    fn color(&self, value: Option<f64>) -> String {
        match value {
            Some(v) => self.gradient.interpolate(v).to_css(),
            None => self.gradient.no_data().to_css(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;

    fn hex(s: &str) -> Color {
        Color::Hex(s.to_string())
    }

    #[test]
    fn test_endpoints_and_midpoint() {
        let scale = LinearColorScale::between(0.0, 100.0, hex("#000000"), hex("#ffffff")).unwrap();
        assert_eq!(scale.color(Some(0.0)), "#000000");
        assert_eq!(scale.color(Some(100.0)), "#ffffff");
        assert_eq!(scale.domain(), (0.0, 100.0));
    }

    #[test]
    fn test_no_data() {
        let scale = LinearColorScale::between(0.0, 1.0, hex("#000000"), hex("#ffffff"))
            .unwrap()
            .with_no_data(hex("#123456"));
        assert_eq!(scale.color(None), "#123456");
    }

    #[test]
    fn test_rejects_unordered_stops() {
        let err = LinearColorScale::between(5.0, 1.0, hex("#000000"), hex("#ffffff")).unwrap_err();
        assert!(matches!(err, RenderError::InvalidColorScale(_)));
    }

    #[test]
    fn test_closure_scale() {
        let scale = |v: Option<f64>| match v {
            Some(v) if v > 10.0 => "red".to_string(),
            Some(_) => "blue".to_string(),
            None => "grey".to_string(),
        };
        assert_eq!(ColorScale::color(&scale, Some(11.0)), "red");
        assert_eq!(ColorScale::color(&scale, None), "grey");
    }
}
