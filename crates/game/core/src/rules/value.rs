//! Rule values.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::document::{DataValue, ValueType};

/// The `value` of a rule source: a boolean, number or string.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl RuleValue {
    /// Read a JSON value; anything other than a boolean, number or string is rejected.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Bool(b) => Some(Self::Bool(*b)),
            serde_json::Value::Number(n) => n.as_f64().map(Self::Number),
            serde_json::Value::String(s) => Some(Self::Text(s.clone())),
            _ => None,
        }
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Bool(_) => ValueType::Bool,
            Self::Number(_) => ValueType::Number,
            Self::Text(_) => ValueType::Text,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }
}

impl From<RuleValue> for DataValue {
    fn from(value: RuleValue) -> Self {
        match value {
            RuleValue::Bool(b) => Self::Bool(b),
            RuleValue::Number(n) => Self::Number(n),
            RuleValue::Text(s) => Self::Text(s),
        }
    }
}

impl From<f64> for RuleValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl fmt::Display for RuleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "\"{s}\""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_scalar_json() {
        assert_eq!(RuleValue::from_json(&json!(5)), Some(RuleValue::Number(5.0)));
        assert_eq!(RuleValue::from_json(&json!(true)), Some(RuleValue::Bool(true)));
        assert_eq!(
            RuleValue::from_json(&json!("far")),
            Some(RuleValue::Text("far".into()))
        );
        assert_eq!(RuleValue::from_json(&json!([1])), None);
        assert_eq!(RuleValue::from_json(&json!(null)), None);
    }

    #[test]
    fn converts_to_data() {
        assert_eq!(DataValue::from(RuleValue::Number(2.5)), DataValue::Number(2.5));
        assert_eq!(RuleValue::Text("x".into()).value_type(), ValueType::Text);
    }
}
