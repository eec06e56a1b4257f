//! Tick marks along a slider track.

use crate::markup::{number, Element, Style, SVG_NS};

/// Vertical tick lines at the given x positions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ticks {
    pub x: Vec<f64>,
    pub class: Option<String>,
    pub style: Option<Style>,
    pub tick_class: Option<String>,
    pub tick_style: Option<Style>,
}

impl Ticks {
    pub fn new(x: impl IntoIterator<Item = f64>) -> Self {
        Self {
            x: x.into_iter().collect(),
            ..Self::default()
        }
    }

    /// One `<line>` per position, duplicates included.
    pub fn render(&self) -> Element {
        let lines = self.x.iter().map(|&x| {
            let x = number(x);
            Element::new("line")
                .class([self.tick_class.as_deref().unwrap_or("")])
                .style(self.tick_style.as_ref())
                .attr("x1", &x)
                .attr("x2", &x)
                .attr("y1", "0%")
                .attr("y2", "100%")
                .attr("stroke", "black")
        });

        Element::new("svg")
            .attr("xmlns", SVG_NS)
            .class(["track-ticks", self.class.as_deref().unwrap_or("")])
            .style(self.style.as_ref())
            .attr("width", "100%")
            .attr("height", "100%")
            .children(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_line_per_position() {
        let svg = Ticks::new([0.0, 25.5, 100.0]).render();
        let lines = svg.find_all("line");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].get_attr("x1"), Some("25.5"));
        assert_eq!(lines[1].get_attr("x2"), Some("25.5"));
        assert_eq!(lines[1].get_attr("y1"), Some("0%"));
        assert_eq!(lines[1].get_attr("y2"), Some("100%"));
        assert_eq!(lines[1].get_attr("stroke"), Some("black"));
        assert_eq!(svg.get_attr("width"), Some("100%"));
    }

    #[test]
    fn test_duplicates_and_empty() {
        assert_eq!(Ticks::new([5.0, 5.0]).render().find_all("line").len(), 2);
        assert!(Ticks::new([]).render().find_all("line").is_empty());
    }

    #[test]
    fn test_classes_and_styles() {
        let mut style = Style::new();
        style.insert("stroke-width".into(), "2px".into());
        let ticks = Ticks {
            class: Some("years".into()),
            tick_class: Some("tick".into()),
            tick_style: Some(style),
            ..Ticks::new([1.0])
        };
        let svg = ticks.render();
        assert_eq!(svg.get_attr("class"), Some("track-ticks years"));
        assert!(svg.get_attr("style").is_none());
        let line = svg.find_all("line")[0];
        assert!(line.has_class("tick"));
        assert_eq!(line.get_attr("style"), Some("stroke-width:2px;"));
    }
}
