//! User configuration document
//!
//! The document is an open JSON object; only `audit_probability` is read by
//! the tracker and every other key is carried through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Probability used when none is configured or the configured one is unusable
pub const DEFAULT_AUDIT_PROBABILITY: f64 = 0.1;

const AUDIT_PROBABILITY_KEY: &str = "audit_probability";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config {
    values: Map<String, Value>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// The configured audit probability, or the default if it is missing,
    /// not a number, or outside `[0, 1]`.
    ///
    /// Numeric strings such as `"0.25"` are accepted.
    pub fn audit_probability(&self) -> f64 {
        let Some(raw) = self.values.get(AUDIT_PROBABILITY_KEY) else {
            return DEFAULT_AUDIT_PROBABILITY;
        };

        let parsed = match raw {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };

        match parsed {
            Some(p) if is_probability(p) => p,
            _ => {
                log::warn!(
                    "Invalid audit_probability {}, using {}",
                    raw,
                    DEFAULT_AUDIT_PROBABILITY
                );
                DEFAULT_AUDIT_PROBABILITY
            }
        }
    }

    /// Set the audit probability. Returns false and leaves the config alone if
    /// `p` is not a probability.
    pub fn set_audit_probability(&mut self, p: f64) -> bool {
        if !is_probability(p) {
            return false;
        }
        let Some(number) = serde_json::Number::from_f64(p) else {
            return false;
        };
        self.values
            .insert(AUDIT_PROBABILITY_KEY.to_string(), Value::Number(number));
        true
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// Map-update: incoming keys replace existing ones
    pub fn update_from(&mut self, other: Config) {
        self.values.extend(other.values);
    }
}

fn is_probability(p: f64) -> bool {
    p.is_finite() && (0.0..=1.0).contains(&p)
}
