use std::sync::LazyLock;

use regex::Regex;

// Kept to a single line on purpose: this is not a C parser.
static VOID_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(static\s+)?void\s+([A-Za-z_]\w*)\s*\(\s*([^)]*?)\s*\)\s*(;)?")
        .expect("function pattern is valid")
});

const TEST_PREFIX: &str = "test";

/// A `void name(...)` definition found in passthrough code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDefinition {
    pub name: String,
    pub parameters: String,
    pub is_static: bool,
    pub line: usize,
}

impl FunctionDefinition {
    /// `test` followed by at least one more character.
    pub fn is_test(&self) -> bool {
        self.name.len() > TEST_PREFIX.len() && self.name.starts_with(TEST_PREFIX)
    }

    /// Only these are called directly; the rest need a test case marker.
    pub fn takes_no_arguments(&self) -> bool {
        self.parameters.is_empty() || self.parameters == "void"
    }

    /// Prototype for the generated runner, e.g. `static void test_1f(int x);`.
    /// Linkage follows the definition.
    pub fn prototype(&self) -> String {
        let params = if self.parameters.is_empty() {
            "void"
        } else {
            &self.parameters
        };
        let storage = if self.is_static { "static " } else { "" };
        format!("{}void {}({});", storage, self.name, params)
    }
}

pub struct TestFunctionCollectorPass;

impl TestFunctionCollectorPass {
    /// Any `void` function definition on this line, test or not.
    pub fn recognize_definition(text: &str, line: usize) -> Option<FunctionDefinition> {
        let caps = VOID_FUNCTION.captures(text)?;
        if caps.get(4).is_some() {
            // Prototype, not a definition.
            return None;
        }
        Some(FunctionDefinition {
            name: caps[2].to_string(),
            parameters: caps[3].to_string(),
            is_static: caps.get(1).is_some(),
            line,
        })
    }

    pub fn recognize(text: &str, line: usize) -> Option<FunctionDefinition> {
        Self::recognize_definition(text, line).filter(FunctionDefinition::is_test)
    }
}
