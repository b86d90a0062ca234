//! List registered rule type identifiers

use anyhow::Result;
use clap::Parser;
use console::style;
use wasteland_core::RuleEngine;

/// List registered rule type identifiers
#[derive(Parser)]
pub struct RuleTypes;

impl RuleTypes {
    pub fn execute(self, engine: &RuleEngine) -> Result<()> {
        let registry = engine.registry();
        for identifier in registry.identifiers() {
            match registry.resolve(identifier) {
                Some(kind) if kind.as_ref() == identifier => {
                    println!("{}", style(identifier).bold());
                }
                // Aliases point at the canonical identifier.
                Some(kind) => {
                    println!(
                        "{} {}",
                        style(identifier).bold(),
                        style(format!("-> {kind}")).dim()
                    );
                }
                None => {}
            }
        }
        Ok(())
    }
}
