use std::fmt;
use std::str::FromStr;

/// How the driver invokes each test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DriverStyle {
    /// Per-test stubs run through `UnityDefaultTestRun` from `main`.
    #[default]
    Unity,
    /// Direct calls inside `grm_run_tests`.
    Plain,
}

impl fmt::Display for DriverStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverStyle::Unity => write!(f, "unity"),
            DriverStyle::Plain => write!(f, "plain"),
        }
    }
}

impl FromStr for DriverStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unity" => Ok(DriverStyle::Unity),
            "plain" => Ok(DriverStyle::Plain),
            other => Err(format!("unsupported driver style: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Emit the standard `#include` block at the top of the runner.
    pub standard_includes: bool,
    pub style: DriverStyle,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            standard_includes: true,
            style: DriverStyle::Unity,
        }
    }
}
