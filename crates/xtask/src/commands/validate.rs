//! Validate rule sources without an actor
//!
//! Checks the schema and shape of every rule in a JSON array, the way a
//! derivation pass does before any document is selected.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use console::style;
use wasteland_content::RuleSourceLoader;
use wasteland_core::document::MiscSource;
use wasteland_core::{DocumentId, ItemSource, ItemSystem, RuleEngine};

use super::report::print_reports;

/// Validate a JSON array of rule sources
#[derive(Parser)]
pub struct Validate {
    /// JSON file holding an array of rule sources
    #[arg(value_name = "RULES")]
    rules: PathBuf,
}

impl Validate {
    pub fn execute(self, engine: &RuleEngine) -> Result<()> {
        let sources = RuleSourceLoader::load(&self.rules)?;
        let name = self
            .rules
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("rules");

        let owner = sources.into_iter().fold(
            ItemSource::new(DocumentId(0), name, ItemSystem::Misc(MiscSource::default())),
            ItemSource::with_rule,
        );
        let reports = engine.validate_item_rules(&owner);

        println!(
            "{} {} ({} enabled rule(s))",
            style("Rules:").bold().cyan(),
            self.rules.display(),
            reports.len()
        );
        let failed = print_reports(&reports);

        if failed > 0 {
            anyhow::bail!("{} of {} rule(s) failed validation", failed, reports.len());
        }

        println!("{} all rules valid", style("✓").green().bold());
        Ok(())
    }
}
