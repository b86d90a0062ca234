//! Derive an actor snapshot and print the resulting sheet
//!
//! Runs a full derivation pass over a JSON actor snapshot (actor, owned
//! items and their rules) and prints SPECIALs, skills, derived statistics
//! and every rule diagnostic.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use strum::IntoEnumIterator;
use wasteland_content::ActorLoader;
use wasteland_core::{DataValue, DerivedActor, DerivedStat, RuleEngine, SkillName, SpecialName};

use super::report::print_reports;

/// Derive an actor snapshot
#[derive(Parser)]
pub struct Derive {
    /// Actor snapshot JSON file
    #[arg(value_name = "ACTOR")]
    actor: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    /// Character sheet and rule diagnostics
    Summary,
    /// Full JSON output
    Json,
}

impl Derive {
    pub fn execute(self, engine: &RuleEngine) -> Result<()> {
        let source = ActorLoader::load(&self.actor)?;
        let derived = engine
            .derive_actor(&source)
            .with_context(|| format!("Failed to derive {}", self.actor.display()))?;

        match self.format {
            OutputFormat::Summary => print_summary(&derived),
            OutputFormat::Json => print_json(&derived)?,
        }

        Ok(())
    }
}

fn print_summary(derived: &DerivedActor) {
    let actor = &derived.actor;
    println!(
        "{} {} ({}, level {})",
        style("Actor:").bold().cyan(),
        actor.name,
        actor.kind,
        actor.data.get("level").and_then(DataValue::total).unwrap_or_default()
    );
    println!();

    println!("{}", style("SPECIAL:").bold().yellow());
    for name in SpecialName::iter() {
        if let Some(special) = actor.special(name) {
            println!(
                "  {:<14} {:>5} (permanent {})",
                name.as_ref(),
                special.temporary_total(),
                special.permanent_total()
            );
        }
    }
    println!();

    println!("{}", style("Skills:").bold().yellow());
    for name in SkillName::iter() {
        if let Some(skill) = actor.skill(name) {
            println!("  {:<14} {:>5}", name.as_ref(), skill.total());
        }
    }
    println!();

    println!("{}", style("Derived:").bold().yellow());
    for stat in DerivedStat::iter() {
        match actor.derived(stat) {
            Some(DataValue::Resource(resource)) => println!(
                "  {:<14} {:>5} / {}",
                stat.as_ref(),
                resource.value(),
                resource.total()
            ),
            Some(value) => {
                let shown = match value.total() {
                    Some(total) => total.to_string(),
                    None => value.value_type().to_string(),
                };
                println!("  {:<14} {:>5}", stat.as_ref(), shown);
            }
            None => {}
        }
    }
    println!();

    println!("{}", style("Items:").bold().yellow());
    for item in &derived.items {
        println!(
            "  {} ({}, id {})",
            style(&item.name).bold(),
            item.kind,
            item.id
        );
        for (field, value) in item.data.iter() {
            if let Some(total) = value.total() {
                println!("    {field:<20} {total}");
            }
        }
    }
    println!();

    println!("{}", style("Rules:").bold().yellow());
    let failed = print_reports(&derived.reports);
    println!(
        "  {} rule(s), {} with errors",
        derived.reports.len(),
        if failed > 0 {
            style(failed).red().bold()
        } else {
            style(failed).green()
        }
    );
}

fn print_json(derived: &DerivedActor) -> Result<()> {
    let json =
        serde_json::to_string_pretty(derived).context("Failed to serialize actor to JSON")?;
    println!("{}", json);
    Ok(())
}
