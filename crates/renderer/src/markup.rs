//! Minimal element tree serialised to SVG/HTML text.

use std::collections::BTreeMap;
use std::fmt;

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Inline style declarations, serialised as `name:value;` in key order.
pub type Style = BTreeMap<String, String>;

/// Tags written as `<tag/>` when they have no children.
const SELF_CLOSING: &[&str] = &["path", "line", "circle", "rect", "polyline", "polygon"];

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Text(text)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute, replacing any earlier value.
    pub fn attr(mut self, name: &str, value: impl ToString) -> Self {
        let value = value.to_string();
        match self.attrs.iter_mut().find(|(n, _)| n == name) {
            Some(existing) => existing.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
        self
    }

    pub fn opt_attr(self, name: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.attr(name, value),
            None => self,
        }
    }

    /// Append space-separated class names; empty names are skipped.
    pub fn class<'a>(self, names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut classes: Vec<String> = self
            .get_attr("class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();
        classes.extend(names.into_iter().filter(|n| !n.is_empty()).map(str::to_string));
        if classes.is_empty() {
            return self;
        }
        let joined = classes.join(" ");
        self.attr("class", joined)
    }

    pub fn style(self, style: Option<&Style>) -> Self {
        match style {
            Some(style) if !style.is_empty() => {
                let css: String = style.iter().map(|(k, v)| format!("{}:{};", k, v)).collect();
                self.attr("style", css)
            }
            _ => self,
        }
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = impl Into<Node>>) -> Self {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.get_attr("class")
            .map(|c| c.split_whitespace().any(|n| n == name))
            .unwrap_or(false)
    }

    /// Child elements, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|c| match c {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// Depth-first search for every descendant (or self) with `tag`.
    pub fn find_all(&self, tag: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect(tag, &mut found);
        found
    }

    fn collect<'a>(&'a self, tag: &str, found: &mut Vec<&'a Element>) {
        if self.tag == tag {
            found.push(self);
        }
        for child in self.elements() {
            child.collect(tag, found);
        }
    }

    /// Concatenated text of all descendants.
    pub fn text_content(&self) -> String {
        self.children
            .iter()
            .map(|c| match c {
                Node::Text(t) => t.clone(),
                Node::Element(e) => e.text_content(),
            })
            .collect()
    }

    /// Serialise with an XML declaration, for standalone `.svg` files.
    pub fn to_document(&self) -> String {
        format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{}", self)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        for (name, value) in &self.attrs {
            write!(f, " {}=\"{}\"", name, escape(value, true))?;
        }
        if self.children.is_empty() && SELF_CLOSING.contains(&self.tag.as_str()) {
            return f.write_str("/>");
        }
        f.write_str(">")?;
        for child in &self.children {
            match child {
                Node::Element(e) => write!(f, "{}", e)?,
                Node::Text(t) => f.write_str(&escape(t, false))?,
            }
        }
        write!(f, "</{}>", self.tag)
    }
}

fn escape(raw: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Compact number form for coordinates: three decimals, no trailing zeros,
/// no negative zero.
pub fn number(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{}", rounded)
}
