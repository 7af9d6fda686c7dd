use crate::catalog::{entries, entries_for, CatalogEntry};
use crate::cli::{bad_flag, CatalogArgs, CliRunner, CommandOutcome};
use crate::error::EngineResult;
use crate::graph::Provider;

pub fn run(runner: &CliRunner, args: CatalogArgs) -> EngineResult<CommandOutcome> {
    let listed: Vec<&CatalogEntry> = match &args.provider {
        Some(raw) => {
            let provider: Provider = raw.parse().map_err(|e| bad_flag("provider", raw, e))?;
            entries_for(provider).collect()
        }
        None => entries().iter().collect(),
    };

    runner.emit(&listed, |runner| {
        for entry in &listed {
            runner.print_line(format!(
                "  {:<24} {:<28} {:<8} {:<12} ${:.0}-{:.0}/mo",
                entry.component_type,
                entry.display_name,
                entry.provider,
                entry.category,
                entry.cost_range.min_monthly,
                entry.cost_range.max_monthly
            ));
        }
    })?;

    Ok(CommandOutcome::Success)
}
