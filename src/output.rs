//! Writing the runner and manifest to disk.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{error, info, warn};

use crate::discover::find_test_files;
use crate::manifest::Manifest;
use crate::template::{RunnerConfig, RUNNER_LEADER};
use crate::{scan_files, BatchOutcome, RunnerRendererPass};

/// How much of an existing output file is searched for the leader line.
pub const LEADER_SEARCH_LEN: u64 = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    Written,
    Unchanged,
}

/// What to scan and where the results go.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Test files or directories to search.
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    pub manifest: Option<PathBuf>,
    pub config: RunnerConfig,
    /// Overwrite an output file that does not carry the leader line.
    pub force: bool,
}

/// Refuse to clobber a file that does not look like one of our runners.
pub fn check_overwritable(output: &Path) -> Result<()> {
    let file = match fs::File::open(output) {
        Ok(file) => file,
        Err(_) => {
            info!("No previous output file {}", output.display());
            return Ok(());
        }
    };

    let mut head = Vec::new();
    file.take(LEADER_SEARCH_LEN)
        .read_to_end(&mut head)
        .with_context(|| format!("Failed to read existing output {}", output.display()))?;
    if !String::from_utf8_lossy(&head).contains(RUNNER_LEADER) {
        anyhow::bail!(
            "Output file {} exists and was not generated by grm; delete it or pass --force",
            output.display()
        );
    }
    Ok(())
}

/// Leaves the file (and its mtime) alone when the contents already match.
pub fn write_if_changed(path: &Path, contents: &str) -> Result<WriteStatus> {
    if fs::read_to_string(path).is_ok_and(|old| old == contents) {
        info!("Skipped writing {}: unchanged", path.display());
        return Ok(WriteStatus::Unchanged);
    }
    fs::write(path, contents).with_context(|| format!("Can't write output file {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(WriteStatus::Written)
}

/// Scan every input and write the runner, unless any file failed. Failures
/// are returned in the outcome with nothing written.
pub fn generate(request: &GenerateRequest) -> Result<BatchOutcome> {
    let inputs = find_test_files(&request.inputs);
    if inputs.is_empty() {
        anyhow::bail!("no input files");
    }

    let outcome = scan_files(&inputs);
    for (file, diag) in outcome.diagnostics() {
        warn!("{}: {}", file, diag);
    }
    if !outcome.is_success() {
        for failure in &outcome.failures {
            error!("{}", failure);
        }
        return Ok(outcome);
    }

    if !request.force {
        check_overwritable(&request.output)?;
    }
    let runner = RunnerRendererPass::render(&outcome.scanned, &request.config);
    write_if_changed(&request.output, &runner)?;

    if let Some(path) = &request.manifest {
        let json = Manifest::from_files(&outcome.scanned)
            .to_json()
            .context("Failed to serialize manifest")?;
        write_if_changed(path, &json)?;
    }
    Ok(outcome)
}
