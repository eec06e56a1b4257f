//! Synthetic data generator for demo and test fixtures.
//!
//! Rows are the Cartesian product of categorical primary keys, repeated for
//! each time period, with sinusoidal value fields so that every series is
//! predictable and visibly varies across keys and periods.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// A categorical key and the values it ranges over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimaryKey {
    pub name: String,
    pub values: Vec<Value>,
}

impl PrimaryKey {
    pub fn new(name: impl Into<String>, values: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// A numeric series oscillating across `range`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueKey {
    pub name: String,
    pub range: [f64; 2],

    /// Also emit `<name>_ub` and `<name>_lb`
    #[serde(default)]
    pub uncertainty: bool,
}

impl ValueKey {
    pub fn new(name: impl Into<String>, range: [f64; 2], uncertainty: bool) -> Self {
        Self {
            name: name.into(),
            range,
            uncertainty,
        }
    }

    /// Half the range span.
    pub fn amplitude(&self) -> f64 {
        (self.range[1] - self.range[0]) / 2.0
    }

    /// Range midpoint.
    pub fn midpoint(&self) -> f64 {
        (self.range[1] + self.range[0]) / 2.0
    }
}

/// Generator configuration. `length` is the number of time periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_primary_keys")]
    pub primary_keys: Vec<PrimaryKey>,

    #[serde(default = "default_value_keys")]
    pub value_keys: Vec<ValueKey>,

    #[serde(default = "default_year")]
    pub year: i64,

    #[serde(default = "default_length")]
    pub length: usize,
}

fn default_primary_keys() -> Vec<PrimaryKey> {
    vec![
        PrimaryKey::new("Sex", [1, 2, 3]),
        PrimaryKey::new("Age", [1, 2, 3]),
        PrimaryKey::new("Location", [1, 2]),
    ]
}

fn default_value_keys() -> Vec<ValueKey> {
    vec![
        ValueKey::new("mean", [100.0, 200.0], true),
        ValueKey::new("Population", [200.0, 500.0], false),
    ]
}

fn default_year() -> i64 {
    2000
}

fn default_length() -> usize {
    10
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            primary_keys: default_primary_keys(),
            value_keys: default_value_keys(),
            year: default_year(),
            length: default_length(),
        }
    }
}

impl GeneratorConfig {
    /// Parse from YAML (JSON is valid YAML, so this reads both).
    pub fn from_yaml_str(source: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(source)
    }
}

/// One generated record.
///
/// Serializes as a flat object. Fields merge in the order `id`, value
/// fields, primary keys, `year_id`; a later field replaces an earlier one of
/// the same name.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticRow {
    pub id: String,
    pub year_id: i64,
    pub keys: BTreeMap<String, Value>,
    pub values: BTreeMap<String, f64>,
}

impl SyntheticRow {
    fn to_map(&self) -> Map<String, Value> {
        let mut record = Map::new();
        record.insert("id".to_string(), Value::from(self.id.clone()));
        for (name, value) in &self.values {
            record.insert(name.clone(), Value::from(*value));
        }
        for (name, value) in &self.keys {
            record.insert(name.clone(), value.clone());
        }
        record.insert("year_id".to_string(), Value::from(self.year_id));
        record
    }

    pub fn to_json(&self) -> Value {
        Value::Object(self.to_map())
    }
}

impl Serialize for SyntheticRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_map().serialize(serializer)
    }
}

/// Round down to one decimal place.
pub fn floor10(x: f64) -> f64 {
    (x * 10.0).floor() / 10.0
}

/// Cartesian product of all primary-key values.
///
/// The first key varies fastest and the last slowest. No keys gives a
/// single empty combination; a key with no values gives none.
pub fn composite_keys(primary_keys: &[PrimaryKey]) -> Vec<BTreeMap<String, Value>> {
    let mut combinations = vec![BTreeMap::new()];
    for key in primary_keys {
        let mut next = Vec::with_capacity(combinations.len() * key.values.len());
        for value in &key.values {
            for partial in &combinations {
                let mut combination = partial.clone();
                combination.insert(key.name.clone(), value.clone());
                next.push(combination);
            }
        }
        combinations = next;
    }
    combinations
}

/// Value fields for period `period` of row `row`.
///
/// `value = floor10(amp * sin(2 * period / length + k + row) + mid)` for the
/// `k`-th value key.
pub fn generate_values(
    value_keys: &[ValueKey],
    period: usize,
    length: usize,
    row: usize,
) -> BTreeMap<String, f64> {
    let mut values = BTreeMap::new();
    for (k, key) in value_keys.iter().enumerate() {
        let amplitude = key.amplitude();
        let phase = 2.0 * period as f64 / length as f64 + k as f64 + row as f64;
        let value = floor10(amplitude * phase.sin() + key.midpoint());
        values.insert(key.name.clone(), value);

        if key.uncertainty {
            values.insert(format!("{}_ub", key.name), floor10(value + amplitude / 4.0));
            values.insert(format!("{}_lb", key.name), floor10(value - amplitude / 4.0));
        }
    }
    values
}

/// Generate `length * N` rows, period-major, each with a fresh UUID `id`.
pub fn generate_rows(config: &GeneratorConfig) -> Vec<SyntheticRow> {
    let keys = composite_keys(&config.primary_keys);
    let mut rows = Vec::with_capacity(config.length * keys.len());

    for period in 0..config.length {
        for (row, key) in keys.iter().enumerate() {
            rows.push(SyntheticRow {
                id: uuid::Uuid::new_v4().to_string(),
                year_id: config.year + period as i64,
                keys: key.clone(),
                values: generate_values(&config.value_keys, period, config.length, row),
            });
        }
    }

    debug!(
        rows = rows.len(),
        combinations = keys.len(),
        periods = config.length,
        "Generated synthetic rows"
    );
    rows
}

/// Generate rows as JSON records.
pub fn generate_json_rows(config: &GeneratorConfig) -> Vec<Value> {
    generate_rows(config).iter().map(SyntheticRow::to_json).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    fn small_config() -> GeneratorConfig {
        GeneratorConfig {
            primary_keys: vec![
                PrimaryKey::new("k1", ["a", "b", "c"]),
                PrimaryKey::new("k2", ["x", "y"]),
            ],
            value_keys: vec![ValueKey::new("mean", [100.0, 200.0], true)],
            year: 1990,
            length: 1,
        }
    }

    #[test]
    fn test_composite_key_order() {
        let keys = composite_keys(&small_config().primary_keys);
        let pairs: Vec<(Value, Value)> = keys
            .iter()
            .map(|k| (k["k1"].clone(), k["k2"].clone()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (json!("a"), json!("x")),
                (json!("b"), json!("x")),
                (json!("c"), json!("x")),
                (json!("a"), json!("y")),
                (json!("b"), json!("y")),
                (json!("c"), json!("y")),
            ]
        );
    }

    #[test]
    fn test_three_by_two_single_period() {
        let rows = generate_rows(&small_config());
        assert_eq!(rows.len(), 6);

        let ids: HashSet<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), 6);
        assert!(rows.iter().all(|r| r.year_id == 1990));

        let combos: HashSet<String> = rows
            .iter()
            .map(|r| format!("{}-{}", r.keys["k1"], r.keys["k2"]))
            .collect();
        assert_eq!(combos.len(), 6);
    }

    #[test]
    fn test_default_config_row_count() {
        let rows = generate_rows(&GeneratorConfig::default());
        // 3 * 3 * 2 combinations over 10 periods
        assert_eq!(rows.len(), 180);
        assert_eq!(rows[0].year_id, 2000);
        assert_eq!(rows[179].year_id, 2009);
        assert!(rows[0].values.contains_key("mean_ub"));
        assert!(!rows[0].values.contains_key("Population_ub"));
    }

    #[test]
    fn test_first_value_matches_formula() {
        let rows = generate_rows(&small_config());
        // period 0, row 0, key 0: floor10(50 * sin(0) + 150)
        assert_eq!(rows[0].values["mean"], 150.0);
        assert_eq!(rows[0].values["mean_ub"], 162.5);
        assert_eq!(rows[0].values["mean_lb"], 137.5);
        // row 1: floor10(50 * sin(1) + 150) = floor10(192.07...)
        assert_eq!(rows[1].values["mean"], 192.0);
    }

    #[test]
    fn test_deterministic_values() {
        let config = GeneratorConfig::default();
        let a = generate_rows(&config);
        let b = generate_rows(&config);
        let strip = |rows: &[SyntheticRow]| -> Vec<(i64, BTreeMap<String, Value>, BTreeMap<String, f64>)> {
            rows.iter()
                .map(|r| (r.year_id, r.keys.clone(), r.values.clone()))
                .collect()
        };
        assert_eq!(strip(&a), strip(&b));
        assert_ne!(a[0].id, b[0].id);
    }

    #[test]
    fn test_uncertainty_brackets_value() {
        for row in generate_rows(&GeneratorConfig::default()) {
            let value = row.values["mean"];
            assert!(row.values["mean_lb"] <= value);
            assert!(value <= row.values["mean_ub"]);
        }
    }

    #[test]
    fn test_empty_inputs() {
        let no_keys = GeneratorConfig {
            primary_keys: vec![],
            length: 3,
            ..GeneratorConfig::default()
        };
        assert_eq!(generate_rows(&no_keys).len(), 3);

        let empty_values = GeneratorConfig {
            primary_keys: vec![PrimaryKey::new("k", Vec::<i64>::new())],
            ..GeneratorConfig::default()
        };
        assert!(generate_rows(&empty_values).is_empty());

        let no_value_keys = GeneratorConfig {
            value_keys: vec![],
            length: 1,
            ..GeneratorConfig::default()
        };
        let rows = generate_rows(&no_value_keys);
        assert_eq!(rows.len(), 18);
        assert!(rows[0].values.is_empty());

        let no_periods = GeneratorConfig {
            length: 0,
            ..GeneratorConfig::default()
        };
        assert!(generate_rows(&no_periods).is_empty());
    }

    #[test]
    fn test_json_row_shape() {
        let row = generate_json_rows(&small_config()).remove(0);
        assert!(row["id"].is_string());
        assert_eq!(row["year_id"], json!(1990));
        assert_eq!(row["k1"], json!("a"));
        assert_eq!(row["mean"], json!(150.0));
    }

    #[test]
    fn test_primary_keys_and_year_win_name_collisions() {
        let config = GeneratorConfig {
            primary_keys: vec![
                PrimaryKey::new("mean", ["KEY"]),
                PrimaryKey::new("year_id", [1]),
                PrimaryKey::new("id", ["fixed"]),
            ],
            value_keys: vec![ValueKey::new("mean", [100.0, 200.0], false)],
            year: 2000,
            length: 1,
        };
        let rows = generate_rows(&config);
        let row = rows[0].to_json();

        assert_eq!(row["mean"], json!("KEY"));
        assert_eq!(row["year_id"], json!(2000));
        assert_eq!(row["id"], json!("fixed"));

        // serde output matches the explicit conversion
        assert_eq!(serde_json::to_value(&rows[0]).unwrap(), row);
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = r#"
primary_keys:
  - name: location_id
    values: [1, 2]
value_keys:
  - name: rate
    range: [0, 1]
year: 2010
length: 2
"#;
        let config = GeneratorConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.primary_keys[0].values, vec![json!(1), json!(2)]);
        assert!(!config.value_keys[0].uncertainty);
        assert_eq!(generate_rows(&config).len(), 4);
    }
}
