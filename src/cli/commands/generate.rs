use crate::cli::{bad_flag, CliRunner, CommandOutcome, GenerateArgs};
use crate::codegen::{generate, GeneratedArtifact, TargetFormat};
use crate::error::EngineResult;
use std::path::{Path, PathBuf};

pub fn run(runner: &CliRunner, args: GenerateArgs) -> EngineResult<CommandOutcome> {
    let graph = runner.load_graph(&args.graph)?;

    let format = match &args.target {
        Some(raw) => raw
            .parse::<TargetFormat>()
            .map_err(|e| bad_flag("target", raw, e))?,
        None => runner.config().codegen.default_target,
    };

    let artifact = match generate(&graph, format) {
        Ok(artifact) => artifact,
        Err(failure) => {
            runner.print_warning(&format!(
                "{} resources rendered before the failure",
                failure.partial.resource_count
            ));
            return Err(failure.into());
        }
    };

    for warning in &artifact.warnings {
        runner.print_warning(warning);
    }
    for skipped in &artifact.skipped {
        runner.print_warning(&format!(
            "skipped {} ({}): {}",
            skipped.node_id, skipped.component_type, skipped.reason
        ));
    }

    let out_dir = args
        .out
        .clone()
        .or_else(|| runner.config().codegen.output_dir.clone());

    let written = match &out_dir {
        Some(dir) => write_documents(dir, &artifact)?,
        None => Vec::new(),
    };

    runner.emit(&artifact, |runner| {
        if written.is_empty() {
            for document in &artifact.documents {
                runner.print_heading(&format!("# {}", document.name));
                runner.print_line(document.content());
            }
        } else {
            for path in &written {
                runner.print_success(&format!("wrote {}", path.display()));
            }
        }
        runner.print_info(&format!(
            "{}: {} resources, {} dependencies, {} skipped",
            artifact.format,
            artifact.resource_count,
            artifact.dependency_count,
            artifact.skipped_count()
        ));
    })?;

    Ok(CommandOutcome::Success)
}

/// Write every document under `dir`, creating it if needed
pub fn write_documents(dir: &Path, artifact: &GeneratedArtifact) -> std::io::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(artifact.documents.len());
    for document in &artifact.documents {
        let path = dir.join(&document.name);
        std::fs::write(&path, document.content())?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::generate_terraform;
    use crate::graph::{InfraGraph, Node};

    #[test]
    fn test_write_documents() {
        let dir = tempfile::tempdir().unwrap();
        let graph = InfraGraph::new(vec![Node::new("vm", "aws-ec2")], vec![]);
        let artifact = generate_terraform(&graph).unwrap();

        let written = write_documents(&dir.path().join("tf"), &artifact).unwrap();
        assert_eq!(written.len(), artifact.documents.len());
        let main = std::fs::read_to_string(dir.path().join("tf").join("main.tf")).unwrap();
        assert!(main.contains("aws_instance"));
    }
}
