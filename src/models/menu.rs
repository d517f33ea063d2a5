use std::fmt;

use serde::{Deserialize, Serialize};

/// A quantity as it appears in menu files: either a number or free text
/// such as `"1/2"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Number(f64),
    Text(String),
}

impl Quantity {
    /// Zero and empty text render as absent.
    pub fn is_present(&self) -> bool {
        match self {
            Quantity::Number(n) => *n != 0.0 && !n.is_nan(),
            Quantity::Text(s) => !s.trim().is_empty(),
        }
    }

    /// Numeric value, parsing plain decimal text.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Quantity::Number(n) => Some(*n),
            Quantity::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Number(n) => write!(f, "{}", n),
            Quantity::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_quantity: Option<Quantity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_unit: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative_quantity: Option<Quantity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative_unit: Option<String>,
}

impl Ingredient {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            metric_quantity: None,
            metric_unit: None,
            alternative_quantity: None,
            alternative_unit: None,
        }
    }

    /// Metric measure as displayed, e.g. `"200 g"`.
    pub fn metric_text(&self) -> Option<String> {
        measure_text(self.metric_quantity.as_ref(), self.metric_unit.as_deref())
    }

    /// Alternative (household) measure as displayed, e.g. `"1 cup"`.
    pub fn alternative_text(&self) -> Option<String> {
        measure_text(
            self.alternative_quantity.as_ref(),
            self.alternative_unit.as_deref(),
        )
    }
}

fn measure_text(quantity: Option<&Quantity>, unit: Option<&str>) -> Option<String> {
    let quantity = quantity.filter(|q| q.is_present());
    let unit = unit.map(str::trim).filter(|u| !u.is_empty());

    match (quantity, unit) {
        (Some(q), Some(u)) => Some(format!("{} {}", q, u)),
        (Some(q), None) => Some(q.to_string()),
        (None, Some(u)) => Some(u.to_string()),
        (None, None) => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
}

/// An immutable catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub menu_name: String,
    pub dishes: Vec<Dish>,
}
