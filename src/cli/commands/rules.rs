use crate::cli::{bad_flag, CliRunner, CommandOutcome, RulesArgs};
use crate::error::EngineResult;
use crate::rules::{heuristics::HEURISTIC_RULES, Framework, RuleRecord};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RuleInfo {
    id: &'static str,
    set: &'static str,
    title: &'static str,
    severity: crate::rules::Severity,
    category: crate::rules::RuleCategory,
}

fn describe(set: &'static str, rules: &'static [RuleRecord]) -> impl Iterator<Item = RuleInfo> {
    rules.iter().map(move |rule| RuleInfo {
        id: rule.id,
        set,
        title: rule.title,
        severity: rule.severity,
        category: rule.category,
    })
}

pub fn run(runner: &CliRunner, args: RulesArgs) -> EngineResult<CommandOutcome> {
    let rules: Vec<RuleInfo> = match &args.framework {
        Some(raw) => {
            let framework: Framework = raw.parse().map_err(|e| bad_flag("framework", raw, e))?;
            describe(framework.id(), framework.rules()).collect()
        }
        None => Framework::ALL
            .iter()
            .flat_map(|framework| describe(framework.id(), framework.rules()))
            .chain(describe("heuristics", HEURISTIC_RULES))
            .collect(),
    };

    runner.emit(&rules, |runner| {
        for rule in &rules {
            runner.print_line(format!(
                "  {:<12} {:<28} {:<8} {}",
                rule.set, rule.id, rule.severity, rule.title
            ));
        }
    })?;

    Ok(CommandOutcome::Success)
}
