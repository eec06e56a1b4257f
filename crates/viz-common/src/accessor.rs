//! Field accessors: resolve a value out of a JSON record either by a
//! dotted field path or by a caller-supplied function.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Resolver function form of an [`Accessor`].
pub type AccessorFn = Arc<dyn Fn(&Value) -> Option<Value> + Send + Sync>;

/// One step in a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// A parsed field path such as `region.name` or `values[2].mean`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    raw: String,
    segments: Vec<PathSegment>,
}

impl FieldPath {
    pub fn parse(raw: &str) -> Self {
        let mut segments = Vec::new();
        for part in raw.split('.') {
            let mut rest = part;
            // leading key before any bracket
            let key_end = rest.find('[').unwrap_or(rest.len());
            if key_end > 0 {
                segments.push(PathSegment::Key(rest[..key_end].to_string()));
            }
            rest = &rest[key_end..];

            while let Some(stripped) = rest.strip_prefix('[') {
                let Some(close) = stripped.find(']') else {
                    segments.push(PathSegment::Key(rest.to_string()));
                    break;
                };
                let inner = stripped[..close].trim_matches(|c| c == '"' || c == '\'');
                segments.push(match inner.parse::<usize>() {
                    Ok(i) => PathSegment::Index(i),
                    Err(_) => PathSegment::Key(inner.to_string()),
                });
                rest = &stripped[close + 1..];
            }
        }

        Self {
            raw: raw.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Walk the path through `item`. Returns `None` as soon as a step is missing.
    ///
    /// A top-level key spelled exactly like the raw path (`"a.b"`) wins over
    /// the split path.
    pub fn lookup<'a>(&self, item: &'a Value) -> Option<&'a Value> {
        if let Some(literal) = item.as_object().and_then(|map| map.get(&self.raw)) {
            return Some(literal);
        }
        if self.segments.is_empty() {
            return None;
        }
        self.segments
            .iter()
            .try_fold(item, |current, segment| match (segment, current) {
                (PathSegment::Key(key), Value::Object(map)) => map.get(key),
                (PathSegment::Key(key), Value::Array(items)) => {
                    key.parse::<usize>().ok().and_then(|i| items.get(i))
                }
                (PathSegment::Index(i), Value::Array(items)) => items.get(*i),
                (PathSegment::Index(i), Value::Object(map)) => map.get(&i.to_string()),
                _ => None,
            })
    }
}

/// Either a field path or a resolver function, dispatched at call time.
///
/// `None` from [`Accessor::resolve`] is the "undefined" result: renderers
/// degrade (empty label, default color) instead of failing.
#[derive(Clone)]
pub enum Accessor {
    Path(FieldPath),
    Func(AccessorFn),
}

impl Accessor {
    pub fn path(raw: &str) -> Self {
        Accessor::Path(FieldPath::parse(raw))
    }

    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Option<Value> + Send + Sync + 'static,
    {
        Accessor::Func(Arc::new(f))
    }

    pub fn resolve(&self, item: &Value) -> Option<Value> {
        match self {
            Accessor::Path(path) => path.lookup(item).cloned(),
            Accessor::Func(f) => f(item),
        }
    }

    /// Resolve and render as display text; undefined and null become "".
    pub fn resolve_text(&self, item: &Value) -> String {
        display_value(self.resolve(item).as_ref())
    }
}

/// Text form of a resolved value.
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accessor::Path(path) => f.debug_tuple("Path").field(&path.as_str()).finish(),
            Accessor::Func(_) => f.write_str("Func(..)"),
        }
    }
}

/// Paths compare by text, functions by identity.
impl PartialEq for Accessor {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Accessor::Path(a), Accessor::Path(b)) => a == b,
            (Accessor::Func(a), Accessor::Func(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<&str> for Accessor {
    fn from(raw: &str) -> Self {
        Accessor::path(raw)
    }
}

impl From<String> for Accessor {
    fn from(raw: String) -> Self {
        Accessor::path(&raw)
    }
}

impl<'de> Deserialize<'de> for Accessor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Accessor::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_nested_path() {
        let path = FieldPath::parse("values[2].mean");
        assert_eq!(
            path.segments(),
            &[
                PathSegment::Key("values".into()),
                PathSegment::Index(2),
                PathSegment::Key("mean".into()),
            ]
        );
    }

    #[test]
    fn test_lookup_missing_is_none() {
        let item = json!({"region": {"name": "North"}});
        assert!(FieldPath::parse("region.code").lookup(&item).is_none());
        assert!(FieldPath::parse("region.name.first").lookup(&item).is_none());
        assert!(FieldPath::parse("").lookup(&item).is_none());
    }

    #[test]
    fn test_lookup_array_index() {
        let item = json!({"colors": ["red", "blue"]});
        assert_eq!(
            FieldPath::parse("colors[1]").lookup(&item),
            Some(&json!("blue"))
        );
        assert_eq!(
            FieldPath::parse("colors.0").lookup(&item),
            Some(&json!("red"))
        );
    }

    #[test]
    fn test_path_and_function_agree() {
        let item = json!({"region": {"name": "North"}});
        let by_path = Accessor::path("region.name");
        let by_fn = Accessor::func(|item| item.get("region")?.get("name").cloned());
        assert_eq!(by_path.resolve(&item), by_fn.resolve(&item));
        assert_eq!(by_path.resolve_text(&item), "North");
    }

    #[test]
    fn test_resolve_text_degrades() {
        let item = json!({"count": 3, "empty": null});
        assert_eq!(Accessor::path("count").resolve_text(&item), "3");
        assert_eq!(Accessor::path("empty").resolve_text(&item), "");
        assert_eq!(Accessor::path("absent").resolve_text(&item), "");
    }

    #[test]
    fn test_literal_dotted_key_wins() {
        let item = json!({"a.b": "literal", "a": {"b": "nested"}});
        assert_eq!(FieldPath::parse("a.b").lookup(&item), Some(&json!("literal")));

        let nested_only = json!({"a": {"b": "nested"}});
        assert_eq!(
            FieldPath::parse("a.b").lookup(&nested_only),
            Some(&json!("nested"))
        );
    }

    #[test]
    fn test_accessor_equality() {
        assert_eq!(Accessor::path("a.b"), Accessor::from("a.b"));
        assert_ne!(Accessor::path("a"), Accessor::path("b"));

        let f = Accessor::func(|item| item.get("a").cloned());
        assert_eq!(f, f.clone());
        assert_ne!(f, Accessor::func(|item| item.get("a").cloned()));
        assert_ne!(f, Accessor::path("a"));
    }

    #[test]
    fn test_deserialize_from_string() {
        let accessor: Accessor = serde_json::from_str("\"a.b\"").unwrap();
        assert_eq!(accessor.resolve(&json!({"a": {"b": 1}})), Some(json!(1)));
    }
}
