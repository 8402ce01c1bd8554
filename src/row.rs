use serde::{Deserialize, Deserializer};
use serde_json::Value;

use std::ops::AddAssign;

/// One material-impact record from an export file.
///
/// Identity fields that are absent (or `null`) fall back to `"UNKNOWN"`, and
/// absent indicator fields count as zero, so a partially filled row still
/// aggregates cleanly. Scalar `id`/`sequence`/`mat_kbob` values of any JSON
/// type are accepted and keep their JSON text form, which makes
/// `"sequence": 1` and `"sequence": "1"` the same key.
///
/// An indicator holding anything other than a number, or an identity field
/// holding an array or object, fails deserialization; the extractor reports
/// such rows and skips them.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Row {
    #[serde(default = "unknown", deserialize_with = "scalar_to_text")]
    pub id: String,
    #[serde(default = "unknown", deserialize_with = "scalar_to_text")]
    pub sequence: String,
    #[serde(default = "unknown", deserialize_with = "scalar_to_text")]
    pub mat_kbob: String,
    #[serde(default)]
    pub gwp_relative: f64,
    #[serde(default)]
    pub gwp_absolute: f64,
    #[serde(default)]
    pub penr_relative: f64,
    #[serde(default)]
    pub penr_absolute: f64,
    #[serde(default)]
    pub ubp_relative: f64,
    #[serde(default)]
    pub ubp_absolute: f64,
}

impl Default for Row {
    fn default() -> Self {
        Self {
            id: unknown(),
            sequence: unknown(),
            mat_kbob: unknown(),
            gwp_relative: 0.0,
            gwp_absolute: 0.0,
            penr_relative: 0.0,
            penr_absolute: 0.0,
            ubp_relative: 0.0,
            ubp_absolute: 0.0,
        }
    }
}

fn unknown() -> String {
    "UNKNOWN".to_string()
}

/// Renders any JSON scalar to text; `null` counts as missing.
fn scalar_to_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(unknown()),
        other => Err(serde::de::Error::custom(format!(
            "expected a scalar, found {other}"
        ))),
    }
}

/// Running sums for the six impact indicators.
///
/// One `Totals` holds the grand total; [`crate::Report`] keeps a further one
/// per material. Rows are added with `+=`:
///
/// ```
/// use lcatotals::{Row, Totals};
///
/// let mut totals = Totals::default();
/// totals += &Row {
///     gwp_relative: 2.5,
///     ..Default::default()
/// };
/// totals += &Row {
///     gwp_relative: 1.0,
///     ..Default::default()
/// };
/// assert_eq!(totals.gwp_relative, 3.5);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Totals {
    pub gwp_relative: f64,
    pub gwp_absolute: f64,
    pub penr_relative: f64,
    pub penr_absolute: f64,
    pub ubp_relative: f64,
    pub ubp_absolute: f64,
}

impl Totals {
    /// Returns the `(indicator, value)` pairs in report order: GWP, then
    /// PENR, then UBP, relative before absolute.
    #[must_use]
    pub fn metrics(&self) -> [(&'static str, f64); 6] {
        [
            ("gwp_relative", self.gwp_relative),
            ("gwp_absolute", self.gwp_absolute),
            ("penr_relative", self.penr_relative),
            ("penr_absolute", self.penr_absolute),
            ("ubp_relative", self.ubp_relative),
            ("ubp_absolute", self.ubp_absolute),
        ]
    }
}

impl AddAssign<&Row> for Totals {
    fn add_assign(&mut self, row: &Row) {
        self.gwp_relative += row.gwp_relative;
        self.gwp_absolute += row.gwp_absolute;
        self.penr_relative += row.penr_relative;
        self.penr_absolute += row.penr_absolute;
        self.ubp_relative += row.ubp_relative;
        self.ubp_absolute += row.ubp_absolute;
    }
}
