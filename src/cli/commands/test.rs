use crate::cli::{bad_flag, status_color, CliRunner, CommandOutcome, TestArgs};
use crate::error::EngineResult;
use crate::validation::{run_tests_with, InfrastructureTest, TestRunSummary};
use colored::Colorize;
use serde::Serialize;

#[derive(Serialize)]
struct TestOutput<'a> {
    summary: TestRunSummary,
    tests: &'a [InfrastructureTest],
}

pub fn run(runner: &CliRunner, args: TestArgs) -> EngineResult<CommandOutcome> {
    let graph = runner.load_graph(&args.graph)?;

    let mut config = runner.config().validation.clone();
    if let Some(ceiling) = args.cost_ceiling {
        if ceiling.is_nan() || ceiling <= 0.0 {
            return Err(bad_flag("cost-ceiling", &ceiling.to_string(), "must be positive"));
        }
        config.monthly_cost_ceiling = ceiling;
    }

    let tests = run_tests_with(&graph, &config);
    let output = TestOutput {
        summary: TestRunSummary::from_tests(&tests),
        tests: &tests,
    };

    runner.emit(&output, |runner| {
        for test in output.tests {
            let status = format!("{:>7}", test.status.to_string().to_uppercase())
                .color(status_color(test.status));
            runner.print_line(format!("  {} {} {}", status, test.name.bold(), test.message));
        }
        let summary = &output.summary;
        runner.print_heading(&format!(
            "{} tests: {} passed, {} failed, {} warnings, {} skipped",
            summary.total, summary.passed, summary.failed, summary.warnings, summary.skipped
        ));
    })?;

    if output.summary.passed() {
        Ok(CommandOutcome::Success)
    } else {
        Ok(CommandOutcome::Failed)
    }
}
