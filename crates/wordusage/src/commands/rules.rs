//! Rules command: list the bundled rule table.

use anyhow::Context;
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use wordusage_core::{Rule, RuleTable, Severity};

/// Arguments for the `rules` subcommand.
#[derive(Args, Debug, Default)]
pub struct RulesArgs {
    /// Only list rules with this severity
    #[arg(long, value_enum)]
    pub severity: Option<Severity>,
}

#[derive(Serialize)]
struct RuleInfo<'a> {
    id: &'a str,
    patterns: Vec<String>,
    severity: Severity,
    message: &'a str,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    suggestions: &'a [String],
}

impl<'a> RuleInfo<'a> {
    fn new(rule: &'a Rule) -> Self {
        Self {
            id: &rule.id,
            patterns: rule.patterns.iter().map(|words| words.join(" ")).collect(),
            severity: rule.severity,
            message: &rule.message,
            suggestions: &rule.suggestions,
        }
    }
}

/// List the bundled rules.
#[instrument(name = "cmd_rules", skip_all)]
pub fn cmd_rules(args: RulesArgs, global_json: bool) -> anyhow::Result<()> {
    let table = RuleTable::builtin().context("bundled rule table is invalid")?;
    let rules: Vec<RuleInfo<'_>> = table
        .rules()
        .iter()
        .filter(|rule| args.severity.is_none_or(|s| rule.severity == s))
        .map(RuleInfo::new)
        .collect();

    debug!(count = rules.len(), "listing rules");

    if global_json {
        println!("{}", serde_json::to_string_pretty(&rules)?);
        return Ok(());
    }

    let width = rules.iter().map(|r| r.id.len()).max().unwrap_or(0);
    for rule in &rules {
        let label = format!("{:<7}", rule.severity.as_str());
        let severity = match rule.severity {
            Severity::Error => label.red().to_string(),
            Severity::Warning => label.yellow().to_string(),
        };
        println!(
            "{}  {severity}  {}",
            format!("{:<width$}", rule.id).cyan(),
            rule.patterns.join(", ").dimmed()
        );
    }
    println!();
    println!("{} rules", rules.len());
    Ok(())
}
