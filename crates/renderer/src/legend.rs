//! Legend items: a symbol and a label resolved from a data item.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use viz_common::{display_value, Accessor};

use crate::event::{ItemHandler, UiEvent};
use crate::markup::{Element, Node, Style, SVG_NS};
use crate::symbol::{symbol_element, SymbolType, DEFAULT_SYMBOL_SIZE};

/// Replaces accessor-based label resolution for an item.
pub type LabelRenderer = Arc<dyn Fn(&Value) -> Node + Send + Sync>;

const CLEAR_ICON_PATH: &str = "M-3,-3L3,3 M-3,3L3,-3";
const SYMBOL_VIEWBOX: &str = "-8 -8 16 16";

/// Serializable accessor configuration, as consumers usually provide it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessorConfig {
    pub label_key: Accessor,
    pub symbol_color_key: Accessor,
    pub symbol_type_key: Accessor,
    /// Datum value for maps built from the same configuration
    #[serde(default)]
    pub value_field: Option<Accessor>,
    /// Datum join key for maps built from the same configuration
    #[serde(default)]
    pub key_field: Option<Accessor>,
}

/// Settings shared by every item of a legend.
#[derive(Clone)]
pub struct LegendConfig {
    pub label_key: Accessor,
    pub symbol_color_key: Accessor,
    pub symbol_type_key: Accessor,
    pub item_style: Option<Style>,
    /// Render a clear ("x") icon before each item
    pub render_clear: bool,
    pub label_renderer: Option<LabelRenderer>,
    pub on_click: Option<ItemHandler>,
    pub on_clear: Option<ItemHandler>,
    pub on_hover: Option<ItemHandler>,
}

impl LegendConfig {
    pub fn new(
        label_key: impl Into<Accessor>,
        symbol_color_key: impl Into<Accessor>,
        symbol_type_key: impl Into<Accessor>,
    ) -> Self {
        Self {
            label_key: label_key.into(),
            symbol_color_key: symbol_color_key.into(),
            symbol_type_key: symbol_type_key.into(),
            item_style: None,
            render_clear: false,
            label_renderer: None,
            on_click: None,
            on_clear: None,
            on_hover: None,
        }
    }

    pub fn on_click(mut self, handler: impl Fn(&UiEvent, &Value) + Send + Sync + 'static) -> Self {
        self.on_click = Some(Arc::new(handler));
        self
    }

    pub fn on_clear(mut self, handler: impl Fn(&UiEvent, &Value) + Send + Sync + 'static) -> Self {
        self.on_clear = Some(Arc::new(handler));
        self
    }

    /// Show the clear icon. Independent of whether a clear handler is set.
    pub fn render_clear(mut self, render: bool) -> Self {
        self.render_clear = render;
        self
    }

    pub fn on_hover(mut self, handler: impl Fn(&UiEvent, &Value) + Send + Sync + 'static) -> Self {
        self.on_hover = Some(Arc::new(handler));
        self
    }

    pub fn label_renderer(mut self, renderer: impl Fn(&Value) -> Node + Send + Sync + 'static) -> Self {
        self.label_renderer = Some(Arc::new(renderer));
        self
    }
}

impl From<AccessorConfig> for LegendConfig {
    fn from(config: AccessorConfig) -> Self {
        Self::new(config.label_key, config.symbol_color_key, config.symbol_type_key)
    }
}

impl fmt::Debug for LegendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LegendConfig")
            .field("label_key", &self.label_key)
            .field("symbol_color_key", &self.symbol_color_key)
            .field("symbol_type_key", &self.symbol_type_key)
            .field("item_style", &self.item_style)
            .field("render_clear", &self.render_clear)
            .field("label_renderer", &self.label_renderer.is_some())
            .field("on_click", &self.on_click.is_some())
            .field("on_clear", &self.on_clear.is_some())
            .field("on_hover", &self.on_hover.is_some())
            .finish()
    }
}

/// One legend entry bound to its configuration.
#[derive(Debug, Clone, Copy)]
pub struct LegendItem<'a> {
    pub item: &'a Value,
    pub config: &'a LegendConfig,
}

impl<'a> LegendItem<'a> {
    pub fn new(item: &'a Value, config: &'a LegendConfig) -> Self {
        Self { item, config }
    }

    pub fn label(&self) -> Node {
        match &self.config.label_renderer {
            Some(render) => render(self.item),
            None => Node::Text(self.config.label_key.resolve_text(self.item)),
        }
    }

    pub fn color(&self) -> Option<String> {
        match self.config.symbol_color_key.resolve(self.item) {
            None | Some(Value::Null) => None,
            value => Some(display_value(value.as_ref())),
        }
    }

    pub fn symbol_type(&self) -> SymbolType {
        self.config
            .symbol_type_key
            .resolve(self.item)
            .as_ref()
            .and_then(Value::as_str)
            .map(SymbolType::parse)
            .unwrap_or_default()
    }

    pub fn render(&self) -> Element {
        let config = self.config;
        let mut li = Element::new("li")
            .class(["legend-item"])
            .opt_attr("data-key", Some(config.label_key.resolve_text(self.item)).filter(|k| !k.is_empty()))
            .style(config.item_style.as_ref());

        if config.render_clear {
            li = li.child(
                Element::new("svg")
                    .attr("xmlns", SVG_NS)
                    .attr("viewBox", SYMBOL_VIEWBOX)
                    .attr("width", "1em")
                    .attr("height", "1em")
                    .class(["clear"])
                    .child(
                        Element::new("path")
                            .attr("d", CLEAR_ICON_PATH)
                            .attr("stroke", "black")
                            .attr("stroke-width", "1.5"),
                    ),
            );
        }

        let wrapper_classes = ["legend-item-wrapper", if config.on_click.is_some() { "clickable" } else { "" }];
        let symbol = Element::new("svg")
            .attr("xmlns", SVG_NS)
            .attr("viewBox", SYMBOL_VIEWBOX)
            .attr("width", "1em")
            .attr("height", "1em")
            .class(["symbol-svg"])
            .child(symbol_element(
                self.symbol_type(),
                DEFAULT_SYMBOL_SIZE,
                self.color().as_deref(),
            ));

        li.child(
            Element::new("div")
                .class(wrapper_classes)
                .child(symbol)
                .child(Element::new("span").child(self.label())),
        )
    }

    /// Dispatch a click on the item body. Returns whether a handler ran.
    pub fn click(&self, event: &mut UiEvent) -> bool {
        self.dispatch(self.config.on_click.as_ref(), event, true)
    }

    /// Dispatch a click on the clear icon.
    pub fn clear(&self, event: &mut UiEvent) -> bool {
        self.dispatch(self.config.on_clear.as_ref(), event, true)
    }

    /// Hover events are observed without being consumed.
    pub fn hover(&self, event: &mut UiEvent) -> bool {
        self.dispatch(self.config.on_hover.as_ref(), event, false)
    }

    fn dispatch(&self, handler: Option<&ItemHandler>, event: &mut UiEvent, consume: bool) -> bool {
        match handler {
            Some(handler) => {
                if consume {
                    event.consume();
                }
                handler(event, self.item);
                true
            }
            None => false,
        }
    }
}

/// A `<ul>` of legend items sharing one configuration.
#[derive(Debug, Clone)]
pub struct Legend {
    pub items: Vec<Value>,
    pub config: LegendConfig,
    pub title: Option<String>,
    pub class: Option<String>,
}

impl Legend {
    pub fn new(items: Vec<Value>, config: LegendConfig) -> Self {
        Self {
            items,
            config,
            title: None,
            class: None,
        }
    }

    pub fn item(&self, index: usize) -> Option<LegendItem<'_>> {
        self.items.get(index).map(|item| LegendItem::new(item, &self.config))
    }

    pub fn render(&self) -> Element {
        let list = Element::new("ul")
            .class(["legend-list"])
            .children(self.items.iter().map(|item| LegendItem::new(item, &self.config).render()));

        let mut container = Element::new("div").class(["legend", self.class.as_deref().unwrap_or("")]);
        if let Some(title) = &self.title {
            container = container.child(Element::new("h3").class(["legend-title"]).text(title.clone()));
        }
        container.child(list)
    }
}
