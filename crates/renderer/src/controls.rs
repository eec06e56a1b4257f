//! Zoom control buttons.

use projection::ZoomDirection;

use crate::markup::Element;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    ZoomIn,
    ZoomReset,
    ZoomOut,
}

impl ControlAction {
    pub const ALL: [ControlAction; 3] = [
        ControlAction::ZoomIn,
        ControlAction::ZoomReset,
        ControlAction::ZoomOut,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ControlAction::ZoomIn => "zoom-in",
            ControlAction::ZoomReset => "zoom-reset",
            ControlAction::ZoomOut => "zoom-out",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.name() == name)
    }

    pub fn direction(&self) -> ZoomDirection {
        match self {
            ControlAction::ZoomIn => ZoomDirection::In,
            ControlAction::ZoomReset => ZoomDirection::Reset,
            ControlAction::ZoomOut => ZoomDirection::Out,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ControlAction::ZoomIn => "+",
            ControlAction::ZoomReset => "reset",
            ControlAction::ZoomOut => "\u{2212}",
        }
    }
}

/// The in / reset / out button group.
pub fn render_controls() -> Element {
    Element::new("div").class(["controls"]).children(ControlAction::ALL.iter().map(|action| {
        Element::new("button")
            .class([action.name()])
            .attr("type", "button")
            .attr("data-action", action.name())
            .text(action.label())
    }))
}
