//! Composite accumulators shared by every derived statistic.
//!
//! A [`CompositeNumber`] is a persisted base value plus the labeled components
//! rules contributed during the current pass:
//!
//! ```text
//! total = clamp(source + Σ components[i].value, bounds.min, bounds.max)
//! ```
//!
//! Composites are never carried across passes. Each pass rebuilds them from the
//! persisted source, which is what makes derivation idempotent.

use serde::{Deserialize, Serialize};

/// Optional lower/upper limits for a composite total.
///
/// When both limits are set and `min > max`, the lower limit wins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl Bounds {
    /// No limits in either direction.
    pub const UNBOUNDED: Self = Self {
        min: None,
        max: None,
    };

    pub const fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub const fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub const fn at_most(max: f64) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    pub const fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Clamp a value into these bounds.
    pub fn clamp(&self, value: f64) -> f64 {
        let mut value = value;
        if let Some(max) = self.max {
            value = value.min(max);
        }
        if let Some(min) = self.min {
            value = value.max(min);
        }
        value
    }
}

/// A single labeled contribution to a composite.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Component {
    pub fn new(value: f64) -> Self {
        Self { value, label: None }
    }

    pub fn labeled(value: f64, label: impl Into<String>) -> Self {
        Self {
            value,
            label: Some(label.into()),
        }
    }
}

/// What a composite can be built from: a bare number or a partial record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompositeSource {
    Number(f64),
    Record {
        source: f64,
        #[serde(default)]
        bounds: Option<Bounds>,
    },
}

impl From<f64> for CompositeSource {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Base value + labeled components + bounds ⇒ clamped total.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CompositeNumber {
    pub source: f64,
    #[serde(default)]
    pub bounds: Bounds,
    #[serde(default)]
    pub components: Vec<Component>,
}

impl CompositeNumber {
    /// Create an unbounded composite with no components.
    pub fn new(source: f64) -> Self {
        Self {
            source,
            bounds: Bounds::UNBOUNDED,
            components: Vec::new(),
        }
    }

    /// Build from a bare number or a partial record; missing bounds are unbounded.
    pub fn from_source(source: impl Into<CompositeSource>) -> Self {
        match source.into() {
            CompositeSource::Number(value) => Self::new(value),
            CompositeSource::Record { source, bounds } => Self {
                source,
                bounds: bounds.unwrap_or_default(),
                components: Vec::new(),
            },
        }
    }

    /// Set bounds (builder pattern). Owners set bounds before any `add`.
    #[must_use]
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Append a component for the current pass.
    pub fn add(&mut self, component: Component) {
        self.components.push(component);
    }

    /// Append an unlabeled or labeled value.
    pub fn add_value(&mut self, value: f64, label: Option<&str>) {
        self.add(Component {
            value,
            label: label.map(str::to_owned),
        });
    }

    /// Sum of all component values, before clamping.
    pub fn component_sum(&self) -> f64 {
        self.components.iter().map(|c| c.value).sum()
    }

    /// Clamped total, recomputed on every call.
    pub fn total(&self) -> f64 {
        self.bounds.clamp(self.source + self.component_sum())
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }
}

/// A composite total paired with a current value in `[0, total]`.
///
/// `value` is the only field that survives across passes (e.g. current hit
/// points). The total is rebuilt every pass like any other composite.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CompositeResource {
    pub value: f64,
    #[serde(flatten)]
    pub number: CompositeNumber,
}

impl CompositeResource {
    /// Create a resource; the current value is clamped against the base total.
    pub fn new(number: CompositeNumber, value: f64) -> Self {
        let mut resource = Self { value, number };
        resource.clamp_value();
        resource
    }

    pub fn total(&self) -> f64 {
        self.number.total()
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Set the current value, clamped into `[0, total]`.
    pub fn set_value(&mut self, value: f64) {
        self.value = value;
        self.clamp_value();
    }

    /// Re-clamp the current value after the total changed.
    pub fn clamp_value(&mut self) {
        self.value = self.value.min(self.total()).max(0.0);
    }

    pub fn add(&mut self, component: Component) {
        self.number.add(component);
    }
}
