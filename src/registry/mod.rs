mod entry;
mod test_registry;

pub use entry::{Callable, FixtureCalls, Invocation, TestEntry};
pub use test_registry::{Registry, TestRegistry};
