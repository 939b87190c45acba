use std::fmt;

use serde::Serialize;

/// Setup, dump and teardown functions of a fixture, captured by value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FixtureCalls {
    pub setup: Option<String>,
    pub dump: Option<String>,
    pub teardown: Option<String>,
}

impl FixtureCalls {
    /// Present function names in call order relative to the test:
    /// setup first, then dump, then teardown.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        [&self.setup, &self.dump, &self.teardown]
            .into_iter()
            .filter_map(|f| f.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.names().next().is_none()
    }
}

/// A literal, fully applied call such as `test_1f(0)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub function: String,
    pub arguments: String,
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.function, self.arguments)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callable {
    /// A test function taking no arguments, called by name.
    Simple(String),
    /// A literal invocation from a test case marker.
    Parameterized(Invocation),
}

impl Callable {
    pub fn function(&self) -> &str {
        match self {
            Callable::Simple(name) => name,
            Callable::Parameterized(inv) => &inv.function,
        }
    }

    pub fn is_parameterized(&self) -> bool {
        matches!(self, Callable::Parameterized(_))
    }

    /// The C expression that runs the test, without the trailing `;`.
    pub fn call_expr(&self) -> String {
        match self {
            Callable::Simple(name) => format!("{}()", name),
            Callable::Parameterized(inv) => inv.to_string(),
        }
    }

    /// Human readable name used in test reports.
    pub fn description(&self) -> String {
        match self {
            Callable::Simple(name) => name.clone(),
            Callable::Parameterized(inv) => inv.to_string(),
        }
    }
}

impl Serialize for Callable {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.description())
    }
}

/// One registered test. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestEntry {
    pub callable: Callable,
    pub fixture: Option<FixtureCalls>,
    pub line: usize,
}

impl TestEntry {
    pub fn simple(name: impl Into<String>, fixture: Option<FixtureCalls>, line: usize) -> Self {
        Self {
            callable: Callable::Simple(name.into()),
            fixture,
            line,
        }
    }

    pub fn parameterized(invocation: Invocation, fixture: Option<FixtureCalls>, line: usize) -> Self {
        Self {
            callable: Callable::Parameterized(invocation),
            fixture,
            line,
        }
    }

    /// Setup (if any) followed by the test call, e.g. `setupOne(); test_b();`.
    pub fn setup_and_call(&self) -> String {
        let mut out = String::new();
        if let Some(setup) = self.fixture.as_ref().and_then(|f| f.setup.as_deref()) {
            out.push_str(&format!("{}(); ", setup));
        }
        out.push_str(&self.callable.call_expr());
        out.push(';');
        out
    }

    pub fn dump(&self) -> Option<&str> {
        self.fixture.as_ref().and_then(|f| f.dump.as_deref())
    }

    pub fn teardown(&self) -> Option<&str> {
        self.fixture.as_ref().and_then(|f| f.teardown.as_deref())
    }

    /// The statements run for this entry: fixture calls wrapped around the
    /// test call, e.g. `setupOne(); test_b(); teardownOne();`.
    pub fn statements(&self) -> String {
        let mut out = self.setup_and_call();
        for after in [self.dump(), self.teardown()].into_iter().flatten() {
            out.push_str(&format!(" {}();", after));
        }
        out
    }
}
