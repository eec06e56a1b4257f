//! Markup rendering for data visualization widgets.
//!
//! Every widget is a render function producing an [`markup::Element`] tree:
//! - Choropleth map with zoom controls and level-of-detail paths
//! - Legend items with d3-style symbols
//! - Tick tracks
//!
//! [`raster`] turns the SVG output into PNG.

pub mod choropleth;
pub mod controls;
pub mod error;
pub mod event;
pub mod legend;
pub mod markup;
pub mod path;
pub mod raster;
pub mod scale;
pub mod symbol;
pub mod ticks;

pub use choropleth::{ChoroplethMap, ChoroplethProps};
pub use controls::ControlAction;
pub use error::{RenderError, RenderResult};
pub use event::{EventKind, UiEvent};
pub use legend::{AccessorConfig, Legend, LegendConfig, LegendItem};
pub use markup::{Element, Node};
pub use raster::{rasterize, svg_to_png, RasterOptions};
pub use scale::{ColorScale, LinearColorScale};
pub use symbol::{symbol_path, SymbolType};
pub use ticks::Ticks;
