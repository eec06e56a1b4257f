//! SVG to PNG through usvg, resvg and tiny-skia.

use tracing::debug;
use viz_common::Color;

use crate::error::{RenderError, RenderResult};

#[derive(Debug, Clone, PartialEq)]
pub struct RasterOptions {
    /// Fill behind the drawing; transparent when unset
    pub background: Option<Color>,
    /// Output pixels per SVG user unit
    pub pixel_ratio: f32,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            background: None,
            pixel_ratio: 1.0,
        }
    }
}

/// Render an SVG document into a pixmap sized from its root width/height.
pub fn rasterize(svg: &str, options: &RasterOptions) -> RenderResult<tiny_skia::Pixmap> {
    let opt = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg, &opt).map_err(|e| RenderError::SvgParse(e.to_string()))?;

    let size = tree.size();
    let width = (size.width() * options.pixel_ratio).ceil() as u32;
    let height = (size.height() * options.pixel_ratio).ceil() as u32;
    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or(RenderError::PixmapAllocation { width, height })?;

    if let Some(background) = &options.background {
        let (r, g, b, a) = background.to_rgba();
        pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));
    }

    let transform = tiny_skia::Transform::from_scale(options.pixel_ratio, options.pixel_ratio);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    debug!(width, height, "Rasterized SVG");
    Ok(pixmap)
}

/// Render an SVG document and encode it as PNG.
pub fn svg_to_png(svg: &str, options: &RasterOptions) -> RenderResult<Vec<u8>> {
    rasterize(svg, options)?
        .encode_png()
        .map_err(|e| RenderError::PngEncode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="20px" height="10px">
        <path d="M0,0L10,0L10,10L0,10Z" fill="#ff0000"/>
    </svg>"##;

    #[test]
    fn test_rasterize_size_and_fill() {
        let pixmap = rasterize(SQUARE, &RasterOptions::default()).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (20, 10));

        let inside = pixmap.pixel(5, 5).unwrap();
        assert_eq!((inside.red(), inside.green(), inside.blue(), inside.alpha()), (255, 0, 0, 255));
        let outside = pixmap.pixel(15, 5).unwrap();
        assert_eq!(outside.alpha(), 0);
    }

    #[test]
    fn test_background_and_ratio() {
        let options = RasterOptions {
            background: Some(Color::Hex("white".to_string())),
            pixel_ratio: 2.0,
        };
        let pixmap = rasterize(SQUARE, &options).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (40, 20));
        let outside = pixmap.pixel(35, 10).unwrap();
        assert_eq!((outside.red(), outside.alpha()), (255, 255));
    }

    #[test]
    fn test_png_signature() {
        let png = svg_to_png(SQUARE, &RasterOptions::default()).unwrap();
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_invalid_svg() {
        assert!(matches!(
            rasterize("<not-svg", &RasterOptions::default()),
            Err(RenderError::SvgParse(_))
        ));
    }
}
