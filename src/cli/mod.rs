//! Command-line interface.
//!
//! Argument types are declared here with clap's derive API; each subcommand
//! lives in its own file under `commands/`.

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::{Color, Colorize};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub mod commands;

use crate::config::{ConfigLoader, ConfigValidator, EngineConfig};
use crate::error::{EngineError, EngineResult};
use crate::graph::InfraGraph;
use crate::logging::LogLevel;
use crate::rules::Severity;
use crate::validation::TestStatus;

/// Main CLI application structure
#[derive(Parser, Debug)]
#[command(
    name = "infragraph",
    about = "Analyse infrastructure graphs and generate infrastructure-as-code",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<LogLevel>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Colored output
    #[arg(long, global = true, value_enum, default_value = "auto")]
    pub color: ColorMode,

    /// Quiet mode, results only
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score a graph against compliance frameworks
    Scan(ScanArgs),

    /// Run heuristic analysis, optionally with advisory findings
    Analyze(AnalyzeArgs),

    /// Run infrastructure tests; exits non-zero when any test fails
    Test(TestArgs),

    /// Generate infrastructure-as-code
    Generate(GenerateArgs),

    /// List catalog components
    Catalog(CatalogArgs),

    /// List rule identifiers
    Rules(RulesArgs),
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Graph file (JSON, or YAML by extension)
    pub graph: PathBuf,

    /// Framework id, or `all`
    #[arg(short, long, default_value = "all")]
    pub framework: String,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    pub graph: PathBuf,

    /// Ask the configured chat service for extra findings
    #[arg(long)]
    pub advisory: bool,

    /// Only report findings at or above this severity
    #[arg(long)]
    pub min_severity: Option<String>,
}

#[derive(Args, Debug)]
pub struct TestArgs {
    pub graph: PathBuf,

    /// Override the monthly cost ceiling
    #[arg(long)]
    pub cost_ceiling: Option<f64>,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    pub graph: PathBuf,

    /// terraform, pulumi, arm or cloudformation
    #[arg(short, long)]
    pub target: Option<String>,

    /// Directory to write documents into; prints to stdout when absent
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// Only list one provider's components
    #[arg(long)]
    pub provider: Option<String>,
}

#[derive(Args, Debug)]
pub struct RulesArgs {
    /// Only list one framework's rules
    #[arg(long)]
    pub framework: Option<String>,
}

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

/// Color mode options
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Always,
    Never,
    Auto,
}

/// Simple color support detection
fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
        && (std::env::var("FORCE_COLOR").is_ok()
            || std::env::var("TERM")
                .map(|term| !term.is_empty() && term != "dumb")
                .unwrap_or(false))
}

/// Whether a command succeeded from the user's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Success,
    /// The command ran but reported failures (e.g. a failing test)
    Failed,
}

/// Main CLI application runner
pub struct CliRunner {
    config: EngineConfig,
    format: OutputFormat,
    quiet: bool,
}

impl CliRunner {
    /// Load and validate configuration, then apply flag overrides
    pub fn new(cli: &Cli) -> EngineResult<Self> {
        let mut config = ConfigLoader::new().load(cli.config.as_deref())?;
        if let Some(level) = cli.log_level {
            config.logging.level = level;
        }
        ConfigValidator::new().validate(&config)?;

        let color_enabled = match cli.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => supports_color(),
        };
        colored::control::set_override(color_enabled);
        config.logging.ansi = color_enabled;

        Ok(Self::with_config(config, cli.format, cli.quiet))
    }

    pub fn with_config(config: EngineConfig, format: OutputFormat, quiet: bool) -> Self {
        Self {
            config,
            format,
            quiet,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Run the CLI command
    pub async fn run(&self, command: Commands) -> EngineResult<CommandOutcome> {
        match command {
            Commands::Scan(args) => commands::scan::run(self, args),
            Commands::Analyze(args) => commands::analyze::run(self, args).await,
            Commands::Test(args) => commands::test::run(self, args),
            Commands::Generate(args) => commands::generate::run(self, args),
            Commands::Catalog(args) => commands::catalog::run(self, args),
            Commands::Rules(args) => commands::rules::run(self, args),
        }
    }

    pub fn load_graph(&self, path: &Path) -> EngineResult<InfraGraph> {
        let graph = InfraGraph::from_path(path)?;
        tracing::info!(
            path = %path.display(),
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "graph loaded"
        );
        Ok(graph)
    }

    /// Serialize `value` for json/yaml, or call `text` for text output
    pub fn emit<T, F>(&self, value: &T, text: F) -> EngineResult<()>
    where
        T: Serialize,
        F: FnOnce(&Self),
    {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => print!("{}", serde_yaml::to_string(value)?),
            OutputFormat::Text => text(self),
        }
        Ok(())
    }

    pub fn print_line(&self, line: impl AsRef<str>) {
        println!("{}", line.as_ref());
    }

    pub fn print_heading(&self, heading: &str) {
        println!("{}", heading.bold());
    }

    pub fn print_success(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", "✓".green(), message);
        }
    }

    pub fn print_warning(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {}", "!".yellow(), message);
        }
    }

    pub fn print_info(&self, message: &str) {
        if !self.quiet {
            println!("{}", message.dimmed());
        }
    }
}

pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Critical => Color::Magenta,
        Severity::High => Color::Red,
        Severity::Medium => Color::Yellow,
        Severity::Low => Color::Cyan,
    }
}

pub fn status_color(status: TestStatus) -> Color {
    match status {
        TestStatus::Pass => Color::Green,
        TestStatus::Fail => Color::Red,
        TestStatus::Warning => Color::Yellow,
        TestStatus::Skipped => Color::BrightBlack,
    }
}

/// Error for a flag value that could not be parsed
pub(crate) fn bad_flag(flag: &str, value: &str, reason: impl std::fmt::Display) -> EngineError {
    EngineError::invalid_input(format!("--{} {}: {}", flag, value, reason))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from([
            "infragraph",
            "--format",
            "json",
            "generate",
            "graph.json",
            "--target",
            "pulumi",
            "--out",
            "out",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.target.as_deref(), Some("pulumi"));
                assert_eq!(args.out, Some(PathBuf::from("out")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_log_level_flag() {
        let cli = Cli::try_parse_from(["infragraph", "--log-level", "debug", "rules"]).unwrap();
        assert_eq!(cli.log_level, Some(LogLevel::Debug));
    }
}
