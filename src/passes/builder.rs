use log::{debug, info};

use crate::error::{Diagnostic, FileError, FileFailure, ParseError};
use crate::passes::{
    FixtureTrackerPass, FunctionDefinition, LineKind, Marker, MarkerParserPass, ScannerPass,
    SourceLine, TestFunctionCollectorPass,
};
use crate::registry::{Registry, TestEntry, TestRegistry};

/// Everything the renderer needs from one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    pub name: String,
    /// Lines copied from include regions.
    pub header: Vec<String>,
    /// The source with marker lines and include regions removed.
    pub body: Vec<String>,
    /// Every test function definition, in source order.
    pub functions: Vec<FunctionDefinition>,
    /// Names of all `void` functions defined in the body or header, tests
    /// included.
    pub defined: Vec<String>,
    pub registry: Registry,
}

/// Runs scanner, marker parser and fixture tracker over one file and fills
/// the test registry.
pub struct RegistryBuilderPass {
    name: String,
    header: Vec<String>,
    body: Vec<String>,
    functions: Vec<FunctionDefinition>,
    defined: Vec<String>,
    registry: TestRegistry,
    fixture: FixtureTrackerPass,
    include_opened: Option<usize>,
}

impl RegistryBuilderPass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            header: Vec::new(),
            body: Vec::new(),
            functions: Vec::new(),
            defined: Vec::new(),
            registry: TestRegistry::new(),
            fixture: FixtureTrackerPass::new(),
            include_opened: None,
        }
    }

    pub fn build(name: impl Into<String>, source: &str) -> Result<ScannedFile, FileFailure> {
        let mut builder = Self::new(name);
        for line in ScannerPass::scan(source) {
            if let Err(error) = builder.process_line(&line) {
                return Err(FileFailure::new(builder.name, error));
            }
        }
        Ok(builder.finish())
    }

    fn process_line(&mut self, line: &SourceLine<'_>) -> Result<(), FileError> {
        if let Some(opened) = self.include_opened {
            return self.process_include_line(line, opened);
        }

        match line.kind {
            LineKind::Marker(keyword) => {
                let marker = MarkerParserPass::parse(keyword, line)?;
                debug!("{}:{}: {:?}", self.name, line.number, marker);
                self.apply_marker(marker, line.number)?;
            }
            LineKind::Comment => self.body.push(line.text.to_string()),
            LineKind::Code => {
                if let Some(function) =
                    TestFunctionCollectorPass::recognize_definition(line.text, line.number)
                {
                    self.record_definition(function);
                }
                self.body.push(line.text.to_string());
            }
        }
        Ok(())
    }

    fn record_definition(&mut self, function: FunctionDefinition) {
        self.defined.push(function.name.clone());
        if !function.is_test() {
            return;
        }
        if function.takes_no_arguments() {
            match self.fixture.current() {
                Some(scope) => debug!(
                    "{}:{}: test {} (fixture from line {})",
                    self.name, function.line, function.name, scope.opened
                ),
                None => debug!("{}:{}: test {}", self.name, function.line, function.name),
            }
            self.registry.register(TestEntry::simple(
                function.name.clone(),
                self.fixture.capture(),
                function.line,
            ));
        }
        self.functions.push(function);
    }

    fn process_include_line(&mut self, line: &SourceLine<'_>, opened: usize) -> Result<(), FileError> {
        match line.kind {
            LineKind::Marker(keyword) => match MarkerParserPass::parse(keyword, line)? {
                Marker::IncludeEnd => self.include_opened = None,
                Marker::IncludeBegin => {
                    return Err(ParseError::NestedInclude {
                        line: line.number,
                        opened,
                    }
                    .into());
                }
                _ => {
                    return Err(ParseError::MarkerInInclude {
                        line: line.number,
                        marker: keyword.name(),
                    }
                    .into());
                }
            },
            _ => {
                if let Some(function) =
                    TestFunctionCollectorPass::recognize_definition(line.text, line.number)
                {
                    self.defined.push(function.name);
                }
                self.header.push(line.text.to_string());
            }
        }
        Ok(())
    }

    fn apply_marker(&mut self, marker: Marker, line: usize) -> Result<(), FileError> {
        match marker {
            Marker::IncludeBegin => self.include_opened = Some(line),
            Marker::IncludeEnd => return Err(ParseError::UnmatchedIncludeEnd { line }.into()),
            Marker::FixtureBegin(calls) => self.fixture.begin(calls, line)?,
            Marker::FixtureEnd => {
                self.fixture.end(line)?;
            }
            Marker::TestCase(invocation) => {
                self.registry
                    .register(TestEntry::parameterized(invocation, self.fixture.capture(), line));
            }
            Marker::IgnoreFromHere => self.registry.ignore_from(line),
        }
        Ok(())
    }

    fn finish(self) -> ScannedFile {
        let mut diagnostics = Vec::new();
        if let Some(diag) = self.fixture.finish() {
            diagnostics.push(diag);
        }
        if let Some(opened) = self.include_opened {
            diagnostics.push(Diagnostic::UnclosedInclude { opened });
        }
        if self.registry.is_empty() {
            info!("{}: no tests found", self.name);
        }
        let total = self.registry.len();
        let registry = self.registry.finalize(diagnostics);
        let active = registry.active().count();
        if total > 0 {
            info!(
                "{}: found {} test{} ({} ignored)",
                self.name,
                active,
                if active == 1 { "" } else { "s" },
                total - active
            );
        }

        ScannedFile {
            name: self.name,
            header: self.header,
            body: self.body,
            functions: self.functions,
            defined: self.defined,
            registry,
        }
    }
}
