//! CLI command implementations, one module per subcommand.

pub mod analyze;
pub mod catalog;
pub mod generate;
pub mod rules;
pub mod scan;
pub mod test;

use crate::cli::{severity_color, CliRunner};
use crate::rules::Finding;
use colored::Colorize;

/// One line per finding, followed by its affected resources
pub(crate) fn print_findings(runner: &CliRunner, findings: &[Finding]) {
    for finding in findings {
        let severity = format!("{:>8}", finding.severity.as_str().to_uppercase())
            .color(severity_color(finding.severity));
        runner.print_line(format!("  {} {} {}", severity, finding.id.bold(), finding.title));
        if !finding.affected_resources.is_empty() {
            runner.print_line(format!(
                "           {}",
                finding.affected_resources.join(", ").dimmed()
            ));
        }
    }
}
