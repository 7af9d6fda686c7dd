use crate::advisory::{analyze_with_advisory, AdvisoryAdapter};
use crate::cli::{AnalyzeArgs, CliRunner, CommandOutcome};
use crate::error::EngineResult;
use crate::rules::{AnalysisSummary, Finding, Severity};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisOutput<'a> {
    summary: AnalysisSummary,
    findings: &'a [Finding],
}

pub async fn run(runner: &CliRunner, args: AnalyzeArgs) -> EngineResult<CommandOutcome> {
    let graph = runner.load_graph(&args.graph)?;

    let adapter = if args.advisory {
        let adapter = runner.config().advisory.build_adapter()?;
        if !adapter.is_configured() {
            runner.print_warning("advisory requested but no advisory endpoint is configured");
        }
        adapter
    } else {
        AdvisoryAdapter::disabled()
    };
    let mut findings = analyze_with_advisory(&graph, &adapter).await;

    if let Some(min) = &args.min_severity {
        let min = Severity::normalize(min);
        findings.retain(|finding| finding.severity >= min);
    }

    let output = AnalysisOutput {
        summary: AnalysisSummary::from_findings(&findings),
        findings: &findings,
    };

    runner.emit(&output, |runner| {
        runner.print_heading(&format!(
            "{} findings, health score {}",
            output.summary.total, output.summary.health_score
        ));
        super::print_findings(runner, output.findings);
        if output.findings.is_empty() {
            runner.print_success("no issues found");
        }
    })?;

    Ok(CommandOutcome::Success)
}

