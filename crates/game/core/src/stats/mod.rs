//! Stat system - accumulators and the formulas that feed them.
//!
//! # Architecture
//!
//! ```text
//! [ SPECIAL (base + permanent + temporary) ]
//!      ↓  afterSpecial rules
//! [ Skills (2 × SPECIAL + ⌊LCK/2⌋ + ranks) ]
//!      ↓  afterSkills rules
//! [ Derived (health, AP, carry weight, ...) ]
//!      ↓  afterComputation rules
//! [ Resources clamped to their totals ]
//! ```
//!
//! Every layer stores its values as [`CompositeNumber`]s so rule elements can
//! add labeled components without knowing which layer they touch.

pub mod composite;
pub mod derived;
pub mod skills;
pub mod special;

pub use composite::{Bounds, Component, CompositeNumber, CompositeResource, CompositeSource};
pub use derived::{DerivedInputs, DerivedStat, DerivedStats};
pub use skills::SkillName;
pub use special::{SpecialName, SpecialValue};
