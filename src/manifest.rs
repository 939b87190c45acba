//! JSON description of what was found in each scanned file.

use serde::Serialize;

use crate::passes::ScannedFile;
use crate::registry::{Callable, FixtureCalls};

#[derive(Debug, Serialize)]
pub struct Manifest<'a> {
    pub files: Vec<FileManifest<'a>>,
}

#[derive(Debug, Serialize)]
pub struct FileManifest<'a> {
    pub file: &'a str,
    pub tests: Vec<TestRecord<'a>>,
    pub diagnostics: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TestRecord<'a> {
    pub callable: &'a Callable,
    pub kind: &'static str,
    pub line: usize,
    pub ignored: bool,
    pub fixture: Option<&'a FixtureCalls>,
}

impl<'a> Manifest<'a> {
    pub fn from_files(files: &'a [ScannedFile]) -> Self {
        let files = files
            .iter()
            .map(|file| FileManifest {
                file: &file.name,
                tests: file
                    .registry
                    .entries()
                    .iter()
                    .map(|entry| TestRecord {
                        callable: &entry.callable,
                        kind: if entry.callable.is_parameterized() {
                            "parameterized"
                        } else {
                            "simple"
                        },
                        line: entry.line,
                        ignored: file.registry.is_ignored(entry),
                        fixture: entry.fixture.as_ref(),
                    })
                    .collect(),
                diagnostics: file
                    .registry
                    .diagnostics()
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            })
            .collect();
        Self { files }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
