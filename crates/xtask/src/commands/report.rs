//! Shared rendering of rule diagnostics.

use console::style;
use wasteland_core::{RuleReport, RuleState, Severity};

/// Print every report that carries messages. Returns the number of reports
/// with at least one error.
pub fn print_reports(reports: &[RuleReport]) -> usize {
    let mut failed = 0;

    for report in reports {
        if report.has_errors() {
            failed += 1;
        }
        if report.messages.is_empty() {
            continue;
        }

        let state = match report.state {
            RuleState::Invalid => style(report.state.as_ref()).red().bold(),
            _ => style(report.state.as_ref()).green(),
        };
        println!(
            "  {} #{} {} [{}]",
            style(format!("item {}", report.item)).dim(),
            report.index,
            style(&report.label).bold(),
            state
        );

        for (message, rendered) in report.messages.iter().zip(&report.rendered) {
            let level = message.severity();
            let severity = match level {
                Severity::Error => style(level.as_ref()).red(),
                Severity::Warning => style(level.as_ref()).yellow(),
                Severity::Info => style(level.as_ref()).cyan(),
            };
            println!("    {:<7} {} {}", severity, style(message.kind()).dim(), rendered);
        }
    }

    failed
}
