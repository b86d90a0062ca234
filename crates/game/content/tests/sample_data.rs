//! Loads the bundled sample data and derives it end to end.

use std::path::PathBuf;

use wasteland_content::{
    ActorLoader, ConfigLoader, ItemLoader, MessageCatalogLoader, RuleSourceLoader,
};
use wasteland_core::{
    DataValue, DerivedStat, DocumentId, EngineConfig, RuleElementMessage, RuleEngine,
    RuleTypeRegistry, SkillName, SpecialName,
};

fn data(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join(file)
}

fn engine() -> RuleEngine {
    let config = ConfigLoader::load(&data("engine.toml")).expect("load engine.toml");
    let catalog = MessageCatalogLoader::load(&data("messages.toml")).expect("load messages.toml");
    RuleEngine::new(config, RuleTypeRegistry::default(), catalog)
}

// ============================================================================
// Sample Actor
// ============================================================================

#[test]
fn test_sample_config_matches_defaults() {
    let config = ConfigLoader::load(&data("engine.toml")).expect("load engine.toml");
    assert_eq!(config, EngineConfig::default());
}

#[test]
fn test_courier_derivation() {
    let source = ActorLoader::load(&data("courier.json")).expect("load courier.json");
    let derived = engine().derive_actor(&source).expect("derive courier");

    assert!(!derived.has_errors());
    assert!(derived.reports.iter().all(|report| report.is_clean()));

    let actor = &derived.actor;
    let agility = actor.special(SpecialName::Agility).expect("agility");
    assert_eq!(agility.permanent_total(), 6.0);
    assert_eq!(actor.special_total(SpecialName::Luck), 7.0);

    // 2 * 6 agility + floor(7 luck / 2) + 20 ranks
    assert_eq!(actor.skill(SkillName::Guns).map(|s| s.total()), Some(35.0));
    // 2 * 6 perception + 3 + 5 from the shades
    assert_eq!(actor.skill(SkillName::Lockpick).map(|s| s.total()), Some(20.0));

    let health = match actor.derived(DerivedStat::Health) {
        Some(DataValue::Resource(resource)) => resource,
        other => panic!("expected health resource, got {other:?}"),
    };
    assert_eq!(health.total(), 45.0);
    assert_eq!(health.value(), 40.0);
    assert_eq!(
        actor.derived(DerivedStat::DamageThreshold).and_then(DataValue::total),
        Some(3.0)
    );

    let rifle = derived.item(DocumentId(100)).expect("rifle");
    assert_eq!(rifle.data.get("range").and_then(DataValue::as_number), Some(50.0));
    assert_eq!(rifle.data.get("damage").and_then(DataValue::total), Some(11.0));
}

#[test]
fn test_courier_source_is_unchanged() {
    let source = ActorLoader::load(&data("courier.json")).expect("load courier.json");
    let before = source.clone();

    let engine = engine();
    let first = engine.derive_actor(&source).expect("first pass");
    let second = engine.derive_actor(&source).expect("second pass");

    assert_eq!(source, before);
    assert_eq!(first, second);
}

// ============================================================================
// Sample Catalog
// ============================================================================

#[test]
fn test_catalog_items_derive_without_actor() {
    let items = ItemLoader::load(&data("items.ron")).expect("load items.ron");
    assert_eq!(items.len(), 3);

    let engine = engine();
    for item in &items {
        let derived = engine.derive_item(item).expect("derive item");
        assert!(derived.reports.iter().all(|report| !report.has_errors()));
    }

    let armor = engine.derive_item(&items[1]).expect("derive armor");
    assert_eq!(armor.reports.len(), 1);
    assert_eq!(armor.reports[0].label, "Metal Armor");
}

#[test]
fn test_rule_list_validation_uses_loaded_templates() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("rules.json");
    std::fs::write(
        &path,
        r#"[{ "type": "FlatModifier", "target": "weight", "value": 1 }]"#,
    )
    .expect("write rules");

    let sources = RuleSourceLoader::load(&path).expect("load rules");
    let owner = sources.into_iter().fold(
        wasteland_core::ItemSource::new(
            DocumentId(0),
            "rules",
            wasteland_core::ItemSystem::Misc(Default::default()),
        ),
        wasteland_core::ItemSource::with_rule,
    );

    let reports = engine().validate_item_rules(&owner);
    assert_eq!(reports.len(), 1);
    assert!(reports[0].has_errors());
    assert_eq!(
        reports[0].messages.last(),
        Some(&RuleElementMessage::NotSaved)
    );
    assert_eq!(
        reports[0].rendered.last().map(String::as_str),
        Some("This rule was not applied to the sheet.")
    );
}
