//! Persisted rule element sources and their schema check.
//!
//! Sources arrive as raw JSON because stored data can predate the current
//! schema. [`RuleElementSource::parse`] is the syntactic stage of validation:
//! it reports every missing, unknown or mistyped field at once instead of
//! stopping at the first.

use std::str::FromStr;

use serde_json::{Map, Value};
use strum::IntoEnumIterator;

use super::condition::Condition;
use super::hook::HookPhase;
use super::kind::{RuleKind, RuleTypeRegistry};
use super::message::RuleElementMessage;
use super::selector::SelectorSource;
use super::value::RuleValue;

const ENABLED: &str = "enabled";
const HOOK: &str = "hook";
const CONDITIONS: &str = "conditions";
const LABEL: &str = "label";
const PRIORITY: &str = "priority";
const SELECTORS: &str = "selectors";
const TARGET: &str = "target";
const TYPE: &str = "type";
const VALUE: &str = "value";

/// Every field of a rule source, in schema order.
pub const FIELDS: [&str; 9] = [
    ENABLED, HOOK, CONDITIONS, LABEL, PRIORITY, SELECTORS, TARGET, TYPE, VALUE,
];

/// A schema-checked rule source.
///
/// `selectors` and `target` are still unchecked strings and shapes; the rule
/// element validates them against the rule kind.
#[derive(Clone, Debug, PartialEq)]
pub struct RuleElementSource {
    pub enabled: bool,
    pub hook: HookPhase,
    pub conditions: Vec<Condition>,
    pub label: String,
    pub priority: f64,
    pub selectors: Vec<SelectorSource>,
    pub target: String,
    pub kind: RuleKind,
    pub value: RuleValue,
}

impl RuleElementSource {
    /// A source with no conditions, label or selectors, at priority 0.
    pub fn new(kind: RuleKind, target: impl Into<String>, value: impl Into<RuleValue>) -> Self {
        Self {
            enabled: true,
            hook: HookPhase::AfterSpecial,
            conditions: Vec::new(),
            label: String::new(),
            priority: 0.0,
            selectors: Vec::new(),
            target: target.into(),
            kind,
            value: value.into(),
        }
    }

    #[must_use]
    pub fn with_hook(mut self, hook: HookPhase) -> Self {
        self.hook = hook;
        self
    }

    #[must_use]
    pub fn with_selector(mut self, selector: impl Into<SelectorSource>) -> Self {
        self.selectors.push(selector.into());
        self
    }

    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Parse source text. Text that is not JSON is a syntax error.
    pub fn parse_str(
        raw: &str,
        registry: &RuleTypeRegistry,
    ) -> Result<Self, Vec<RuleElementMessage>> {
        let value: Value = serde_json::from_str(raw).map_err(|e| {
            vec![RuleElementMessage::SyntaxError {
                property: "rule".into(),
                reason: e.to_string(),
            }]
        })?;
        Self::parse(&value, registry)
    }

    /// Check a raw source against the schema.
    pub fn parse(
        raw: &Value,
        registry: &RuleTypeRegistry,
    ) -> Result<Self, Vec<RuleElementMessage>> {
        let Value::Object(object) = raw else {
            return Err(vec![RuleElementMessage::WrongType {
                property: "rule".into(),
                expected: "an object".into(),
            }]);
        };

        let mut fields = Fields {
            object,
            messages: Vec::new(),
        };

        let enabled = fields.bool(ENABLED);
        let hook = fields.identifier(HOOK, |s| HookPhase::from_str(s).ok(), || {
            one_of(HookPhase::iter().map(|h| h.to_string()))
        });
        let conditions = fields.conditions();
        let label = fields.string(LABEL);
        let priority = fields.number(PRIORITY);
        let selectors = fields.selectors();
        let target = fields.string(TARGET);
        let kind = fields.identifier(TYPE, |s| registry.resolve(s), || {
            one_of(registry.identifiers().into_iter().map(str::to_owned))
        });
        let value = fields.value();

        for key in object.keys() {
            if !FIELDS.contains(&key.as_str()) {
                fields.messages.push(RuleElementMessage::AdditionalProperty {
                    property: key.clone(),
                });
            }
        }

        match (enabled, hook, conditions, label, priority, selectors, target, kind, value) {
            (
                Some(enabled),
                Some(hook),
                Some(conditions),
                Some(label),
                Some(priority),
                Some(selectors),
                Some(target),
                Some(kind),
                Some(value),
            ) if fields.messages.is_empty() => Ok(Self {
                enabled,
                hook,
                conditions,
                label,
                priority,
                selectors,
                target,
                kind,
                value,
            }),
            _ => Err(fields.messages),
        }
    }

    /// Persisted JSON form.
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        object.insert(ENABLED.into(), Value::Bool(self.enabled));
        object.insert(HOOK.into(), Value::String(self.hook.to_string()));
        object.insert(
            CONDITIONS.into(),
            Value::Array(
                self.conditions
                    .iter()
                    .map(|c| Value::String(c.to_string()))
                    .collect(),
            ),
        );
        object.insert(LABEL.into(), Value::String(self.label.clone()));
        object.insert(PRIORITY.into(), number(self.priority));
        object.insert(
            SELECTORS.into(),
            Value::Array(self.selectors.iter().map(SelectorSource::to_json).collect()),
        );
        object.insert(TARGET.into(), Value::String(self.target.clone()));
        object.insert(TYPE.into(), Value::String(self.kind.to_string()));
        let value = match &self.value {
            RuleValue::Bool(b) => Value::Bool(*b),
            RuleValue::Number(n) => number(*n),
            RuleValue::Text(s) => Value::String(s.clone()),
        };
        object.insert(VALUE.into(), value);
        Value::Object(object)
    }
}

/// Disabled sources are skipped before any validation.
pub fn is_disabled(raw: &Value) -> bool {
    raw.get(ENABLED) == Some(&Value::Bool(false))
}

fn number(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

fn one_of(identifiers: impl Iterator<Item = String>) -> String {
    let identifiers: Vec<String> = identifiers.collect();
    format!("one of {}", identifiers.join(", "))
}

/// Field reader that records a message for every problem it finds.
struct Fields<'a> {
    object: &'a Map<String, Value>,
    messages: Vec<RuleElementMessage>,
}

impl<'a> Fields<'a> {
    fn required(&mut self, property: &str) -> Option<&'a Value> {
        let value = self.object.get(property);
        if value.is_none() {
            self.messages.push(RuleElementMessage::MissingProperty {
                property: property.to_owned(),
            });
        }
        value
    }

    fn wrong_type(&mut self, property: &str, expected: impl Into<String>) {
        self.messages.push(RuleElementMessage::WrongType {
            property: property.to_owned(),
            expected: expected.into(),
        });
    }

    fn bool(&mut self, property: &str) -> Option<bool> {
        let value = self.required(property)?;
        let parsed = value.as_bool();
        if parsed.is_none() {
            self.wrong_type(property, "a boolean");
        }
        parsed
    }

    fn number(&mut self, property: &str) -> Option<f64> {
        let value = self.required(property)?;
        let parsed = value.as_f64();
        if parsed.is_none() {
            self.wrong_type(property, "a number");
        }
        parsed
    }

    fn string(&mut self, property: &str) -> Option<String> {
        let value = self.required(property)?;
        let parsed = value.as_str().map(str::to_owned);
        if parsed.is_none() {
            self.wrong_type(property, "a string");
        }
        parsed
    }

    /// A string from a closed vocabulary.
    fn identifier<T>(
        &mut self,
        property: &str,
        resolve: impl Fn(&str) -> Option<T>,
        expected: impl Fn() -> String,
    ) -> Option<T> {
        let raw = self.string(property)?;
        let parsed = resolve(&raw);
        if parsed.is_none() {
            self.wrong_type(property, expected());
        }
        parsed
    }

    fn conditions(&mut self) -> Option<Vec<Condition>> {
        let value = self.required(CONDITIONS)?;
        let Some(items) = value.as_array() else {
            self.wrong_type(CONDITIONS, "an array");
            return None;
        };

        let parsed: Option<Vec<Condition>> = items
            .iter()
            .map(|item| item.as_str().and_then(|s| Condition::from_str(s).ok()))
            .collect();
        if parsed.is_none() {
            self.wrong_type(
                CONDITIONS,
                format!(
                    "an array of conditions ({})",
                    one_of(Condition::iter().map(|c| c.to_string()))
                ),
            );
        }
        parsed
    }

    fn selectors(&mut self) -> Option<Vec<SelectorSource>> {
        let value = self.required(SELECTORS)?;
        match value.as_array() {
            Some(items) => Some(items.iter().map(SelectorSource::from_json).collect()),
            None => {
                self.wrong_type(SELECTORS, "an array");
                None
            }
        }
    }

    fn value(&mut self) -> Option<RuleValue> {
        let value = self.required(VALUE)?;
        let parsed = RuleValue::from_json(value);
        if parsed.is_none() {
            self.wrong_type(VALUE, "a boolean, number or string");
        }
        parsed
    }
}
