//! Legend symbols: the standard d3 symbol shapes as SVG path data.
//!
//! Every shape is centred on the origin and sized by area, so all types look
//! equally heavy at the same `size`.

use std::f64::consts::PI;
use std::fmt;

use crate::markup::{number, Element};

/// Default symbol area in square pixels; fits a `-8 -8 16 16` viewBox.
pub const DEFAULT_SYMBOL_SIZE: f64 = 64.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SymbolType {
    #[default]
    Circle,
    Cross,
    Diamond,
    Square,
    TriangleDown,
    TriangleUp,
}

impl SymbolType {
    pub const ALL: [SymbolType; 6] = [
        SymbolType::Circle,
        SymbolType::Cross,
        SymbolType::Diamond,
        SymbolType::Square,
        SymbolType::TriangleDown,
        SymbolType::TriangleUp,
    ];

    /// Parse a d3 symbol name; anything unrecognised is a circle.
    pub fn parse(name: &str) -> Self {
        match name {
            "cross" => SymbolType::Cross,
            "diamond" => SymbolType::Diamond,
            "square" => SymbolType::Square,
            "triangle-down" => SymbolType::TriangleDown,
            "triangle-up" => SymbolType::TriangleUp,
            _ => SymbolType::Circle,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SymbolType::Circle => "circle",
            SymbolType::Cross => "cross",
            SymbolType::Diamond => "diamond",
            SymbolType::Square => "square",
            SymbolType::TriangleDown => "triangle-down",
            SymbolType::TriangleUp => "triangle-up",
        }
    }
}

impl fmt::Display for SymbolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Path data for `kind` with area `size`.
pub fn symbol_path(kind: SymbolType, size: f64) -> String {
    let n = number;
    match kind {
        SymbolType::Circle => {
            let r = (size / PI).sqrt();
            format!(
                "M0,{r}A{r},{r} 0 1,1 0,{nr}A{r},{r} 0 1,1 0,{r}Z",
                r = n(r),
                nr = n(-r)
            )
        }
        SymbolType::Cross => {
            let r = (size / 5.0).sqrt() / 2.0;
            format!(
                "M{a},{b}H{b}V{a}H{c}V{b}H{d}V{c}H{c}V{d}H{b}V{c}H{a}Z",
                a = n(-3.0 * r),
                b = n(-r),
                c = n(r),
                d = n(3.0 * r)
            )
        }
        SymbolType::Diamond => {
            let tan30 = (1.0f64 / 3.0).sqrt();
            let ry = (size / (2.0 * tan30)).sqrt();
            let rx = ry * tan30;
            format!(
                "M0,{}L{},0 0,{} {},0Z",
                n(-ry),
                n(rx),
                n(ry),
                n(-rx)
            )
        }
        SymbolType::Square => {
            let r = size.sqrt() / 2.0;
            format!(
                "M{nr},{nr}L{r},{nr} {r},{r} {nr},{r}Z",
                r = n(r),
                nr = n(-r)
            )
        }
        SymbolType::TriangleDown => {
            let sqrt3 = 3.0f64.sqrt();
            let rx = (size / sqrt3).sqrt();
            let ry = rx * sqrt3 / 2.0;
            format!("M0,{}L{},{} {},{}Z", n(ry), n(rx), n(-ry), n(-rx), n(-ry))
        }
        SymbolType::TriangleUp => {
            let sqrt3 = 3.0f64.sqrt();
            let rx = (size / sqrt3).sqrt();
            let ry = rx * sqrt3 / 2.0;
            format!("M0,{}L{},{} {},{}Z", n(-ry), n(rx), n(ry), n(-rx), n(ry))
        }
    }
}

/// A filled `<path>` for the symbol.
pub fn symbol_element(kind: SymbolType, size: f64, color: Option<&str>) -> Element {
    Element::new("path")
        .attr("d", symbol_path(kind, size))
        .attr("class", format!("symbol symbol-{}", kind))
        .opt_attr("fill", color)
}
