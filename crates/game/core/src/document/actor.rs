//! Prepared actor documents.

use serde::Serialize;
use strum::IntoEnumIterator;

use super::data::{DataObject, DataValue};
use super::id::DocumentId;
use super::source::{ActorKind, ActorSource};
use crate::config::EngineConfig;
use crate::stats::{
    CompositeNumber, CompositeResource, DerivedInputs, DerivedStat, DerivedStats, SkillName,
    SpecialName, SpecialValue,
};

pub(crate) const LEVEL: &str = "level";
pub(crate) const SPECIALS: &str = "specials";
pub(crate) const SKILLS: &str = "skills";

/// An actor prepared for one derivation pass.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActorDocument {
    pub id: DocumentId,
    pub name: String,
    pub kind: ActorKind,
    pub data: DataObject,
}

impl ActorDocument {
    /// Base data: level and SPECIALs. Skills and derived stats come later in the pass.
    pub fn prepare_base(source: &ActorSource, config: &EngineConfig) -> Self {
        let mut specials = DataObject::new();
        for name in SpecialName::iter() {
            let base = source
                .specials
                .get(&name)
                .copied()
                .unwrap_or(config.default_special);
            specials.insert(name.as_ref(), SpecialValue::new(base, config.special_bounds));
        }

        let level = source.level.max(config.min_level);
        let data = DataObject::new()
            .with(LEVEL, f64::from(level))
            .with(SPECIALS, specials);

        Self {
            id: source.id,
            name: source.name.clone(),
            kind: source.kind,
            data,
        }
    }

    /// Level as currently stored; a replaced non-numeric level reads as the minimum.
    pub fn level(&self, config: &EngineConfig) -> f64 {
        self.data
            .get(LEVEL)
            .and_then(DataValue::as_number)
            .unwrap_or(f64::from(config.min_level))
    }

    pub fn special(&self, name: SpecialName) -> Option<&SpecialValue> {
        match self.data.get(SPECIALS)? {
            DataValue::Object(specials) => specials.get(name.as_ref())?.as_special(),
            _ => None,
        }
    }

    /// Temporary SPECIAL total; a missing SPECIAL reads as 0.
    pub fn special_total(&self, name: SpecialName) -> f64 {
        self.special(name)
            .map(SpecialValue::temporary_total)
            .unwrap_or(0.0)
    }

    pub fn skill(&self, name: SkillName) -> Option<&CompositeNumber> {
        match self.data.get(SKILLS)? {
            DataValue::Object(skills) => skills.get(name.as_ref())?.as_composite(),
            _ => None,
        }
    }

    pub fn derived(&self, stat: DerivedStat) -> Option<&DataValue> {
        self.data.get(stat.as_ref())
    }

    /// Build fresh skill composites from the current SPECIAL totals.
    pub fn prepare_skills(&mut self, source: &ActorSource, config: &EngineConfig) {
        let mut skills = DataObject::new();
        for name in SkillName::iter() {
            let ranks = source.skills.get(&name).copied().unwrap_or(0.0);
            let skill = name.composite(|s| self.special_total(s), ranks, config.skill_bounds);
            skills.insert(name.as_ref(), skill);
        }
        self.data.insert(SKILLS, skills);
    }

    /// Build fresh derived composites from SPECIALs, level and equipped apparel.
    pub fn prepare_derived(
        &mut self,
        source: &ActorSource,
        config: &EngineConfig,
        apparel_threshold: f64,
    ) {
        let inputs = DerivedInputs {
            level: self.level(config),
            apparel_threshold,
        };
        let stats = DerivedStats::compute(|s| self.special_total(s), inputs);

        for stat in DerivedStat::iter() {
            let number = CompositeNumber::new(stats.get(stat)).with_bounds(stat.bounds());
            // Resource values are clamped once, after the last phase.
            let value = match stat {
                DerivedStat::Health => DataValue::Resource(CompositeResource {
                    value: source.health.value,
                    number,
                }),
                DerivedStat::ActionPoints => DataValue::Resource(CompositeResource {
                    value: source.action_points.value,
                    number,
                }),
                _ => DataValue::Composite(number),
            };
            self.data.insert(stat.as_ref(), value);
        }
    }

    /// Clamp every resource's current value into `[0, total]`.
    pub fn finalize_resources(&mut self) {
        for stat in DerivedStat::iter().filter(DerivedStat::is_resource) {
            if let Some(DataValue::Resource(resource)) = self.data.get_mut(stat.as_ref()) {
                resource.clamp_value();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> ActorSource {
        ActorSource::new(DocumentId(1), "Courier")
            .with_special(SpecialName::Strength, 6.0)
            .with_special(SpecialName::Agility, 8.0)
            .with_skill(SkillName::Guns, 10.0)
    }

    #[test]
    fn base_data_fills_missing_specials() {
        let config = EngineConfig::default();
        let actor = ActorDocument::prepare_base(&source(), &config);

        assert_eq!(actor.special_total(SpecialName::Strength), 6.0);
        assert_eq!(actor.special_total(SpecialName::Luck), config.default_special);
        assert_eq!(actor.level(&config), 1.0);
        assert!(actor.skill(SkillName::Guns).is_none());
    }

    #[test]
    fn skills_read_specials() {
        let config = EngineConfig::default();
        let source = source();
        let mut actor = ActorDocument::prepare_base(&source, &config);
        actor.prepare_skills(&source, &config);

        // 2 × 8 + ⌊5 / 2⌋ + 10
        assert_eq!(actor.skill(SkillName::Guns).map(CompositeNumber::total), Some(28.0));
    }

    #[test]
    fn derived_resources_clamp_persisted_value() {
        let config = EngineConfig::default();
        let mut source = source();
        source.health.value = 500.0;

        let mut actor = ActorDocument::prepare_base(&source, &config);
        actor.prepare_skills(&source, &config);
        actor.prepare_derived(&source, &config, 3.0);
        actor.finalize_resources();

        match actor.derived(DerivedStat::Health) {
            Some(DataValue::Resource(health)) => {
                // 10 + 6 + 2 × 5
                assert_eq!(health.total(), 26.0);
                assert_eq!(health.value(), 26.0);
            }
            other => panic!("expected resource, got {other:?}"),
        }
        assert_eq!(
            actor.derived(DerivedStat::DamageThreshold).and_then(DataValue::total),
            Some(3.0)
        );
    }
}
