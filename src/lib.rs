//! Test runner generator for marker-annotated C test files.
//!
//! Each file goes through its own pipeline:
//! scanner → marker parser → fixture tracker → test registry. The scanned
//! files are then rendered into a single runner source.

use std::fs;
use std::path::{Path, PathBuf};

pub mod discover;
pub mod error;
pub mod manifest;
pub mod output;
pub mod passes;
pub mod registry;
pub mod template;

pub use error::{Diagnostic, FileError, FileFailure, FixtureError, ParseError};
pub use passes::{RegistryBuilderPass, RunnerRendererPass, ScannedFile};
pub use registry::{Callable, FixtureCalls, Invocation, Registry, TestEntry};
pub use template::{DriverStyle, RunnerConfig};

/// Scan one file's source text.
pub fn scan_source(name: &str, source: &str) -> Result<ScannedFile, FileFailure> {
    RegistryBuilderPass::build(name, source)
}

pub fn scan_file(path: &Path) -> Result<ScannedFile, FileFailure> {
    let name = path.display().to_string();
    let source = fs::read_to_string(path).map_err(|e| FileFailure::new(name.clone(), e))?;
    scan_source(&name, &source)
}

/// Scan and render a runner for a single file.
pub fn generate_runner(name: &str, source: &str, config: &RunnerConfig) -> Result<String, FileFailure> {
    let file = scan_source(name, source)?;
    Ok(RunnerRendererPass::render(&[file], config))
}

/// Result of scanning a batch: every file is attempted.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub scanned: Vec<ScannedFile>,
    pub failures: Vec<FileFailure>,
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = (&str, &Diagnostic)> {
        self.scanned
            .iter()
            .flat_map(|f| f.registry.diagnostics().iter().map(move |d| (f.name.as_str(), d)))
    }
}

pub fn scan_files(paths: &[PathBuf]) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();
    for path in paths {
        match scan_file(path) {
            Ok(file) => outcome.scanned.push(file),
            Err(failure) => outcome.failures.push(failure),
        }
    }
    outcome
}
