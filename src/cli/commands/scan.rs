use crate::cli::{bad_flag, CliRunner, CommandOutcome, ScanArgs};
use crate::error::EngineResult;
use crate::rules::{evaluate_all_frameworks, evaluate_framework, ComplianceReport, Framework};
use colored::Colorize;

pub fn run(runner: &CliRunner, args: ScanArgs) -> EngineResult<CommandOutcome> {
    let graph = runner.load_graph(&args.graph)?;

    let reports: Vec<ComplianceReport> = if args.framework.eq_ignore_ascii_case("all") {
        evaluate_all_frameworks(&graph)
    } else {
        let framework: Framework = args
            .framework
            .parse()
            .map_err(|e| bad_flag("framework", &args.framework, e))?;
        vec![evaluate_framework(&graph, framework)]
    };

    runner.emit(&reports, |runner| {
        for report in &reports {
            let score = format!("{:>3}", report.score);
            let score = match report.score {
                90..=100 => score.green(),
                70..=89 => score.yellow(),
                _ => score.red(),
            };
            runner.print_heading(&format!(
                "{} {} ({}/{} checks passed)",
                report.framework.display_name(),
                score,
                report.passed_checks,
                report.total_checks
            ));
            super::print_findings(runner, &report.findings);
        }
    })?;

    Ok(CommandOutcome::Success)
}
