use super::CliError;
use angdist_core::common::PipelineConfig;
use angdist_core::domain::{AngdistError, EnergyRecord};
use angdist_core::modules::{parse_records, write_text_artifact};
use std::fs;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Logs go to stderr at `info` unless `RUST_LOG` says otherwise.
pub(super) fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

pub(super) fn compute_error(error: impl Into<AngdistError>) -> CliError {
    CliError::Compute(error.into())
}

pub(super) fn read_input(path: &Path, artifact_name: &str) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| {
        CliError::Compute(AngdistError::io_system(
            "IO.INPUT_READ",
            format!(
                "failed to read {} '{}': {}",
                artifact_name,
                path.display(),
                source
            ),
        ))
    })
}

pub(super) fn write_output(path: &Path, content: &str) -> Result<(), CliError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| {
            CliError::Compute(AngdistError::io_system(
                "IO.OUTPUT_WRITE",
                format!(
                    "failed to create output directory '{}': {}",
                    parent.display(),
                    source
                ),
            ))
        })?;
    }

    write_text_artifact(path, content).map_err(|source| {
        CliError::Compute(AngdistError::io_system(
            "IO.OUTPUT_WRITE",
            format!("failed to write '{}': {}", path.display(), source),
        ))
    })?;
    info!(path = %path.display(), bytes = content.len(), "wrote artifact");
    Ok(())
}

pub(super) fn load_records(
    path: &Path,
    config: &PipelineConfig,
) -> Result<Vec<EnergyRecord>, CliError> {
    let source = read_input(path, "coefficient listing")?;
    parse_records(&source, config).map_err(compute_error)
}
