//! Module implementing unit-tagged values and the parameter tables built from them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::error::ModelError;

/// A table of default parameters, indexed by variable name.
pub type ParameterMap = BTreeMap<String, Quantity>;

/// Represents a numeric value tagged with a physical unit.
/// An empty unit denotes a dimensionless value.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Quantity {
    /// The magnitude, expressed in `unit`.
    value: f64,
    /// The unit expression, e.g., `ms`, `nS/mV` or `nA * ms**-1`.
    unit: String,
}

impl Quantity {
    /// Create a new quantity with the specified value and unit.
    pub fn new(value: f64, unit: &str) -> Self {
        Quantity {
            value,
            unit: unit.trim().to_string(),
        }
    }

    /// Create a new dimensionless quantity.
    pub fn scalar(value: f64) -> Self {
        Quantity {
            value,
            unit: String::new(),
        }
    }

    /// Returns the magnitude of the quantity.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Returns the unit of the quantity.
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Returns true if the quantity has no unit.
    pub fn is_dimensionless(&self) -> bool {
        self.unit.is_empty()
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_dimensionless() {
            write!(f, "{}", self.value)
        } else {
            write!(f, "{} * {}", self.value, self.unit)
        }
    }
}

impl FromStr for Quantity {
    type Err = ModelError;

    /// Parse `<number>` or `<number> * <unit expression>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (value, unit) = match s.split_once('*') {
            Some((value, unit)) => (value.trim(), unit.trim()),
            None => (s, ""),
        };

        if value.is_empty() || (unit.is_empty() && s.contains('*')) {
            return Err(ModelError::ParseError(format!(
                "Invalid quantity '{}'",
                s
            )));
        }

        let value = value
            .parse::<f64>()
            .map_err(|e| ModelError::ParseError(format!("Invalid quantity '{}': {}", s, e)))?;

        Ok(Quantity::new(value, unit))
    }
}

/// Build a parameter table from (name, value) pairs.
pub fn parameter_map(entries: &[(&str, Quantity)]) -> ParameterMap {
    entries
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}
