mod scanner;
mod parser;
mod collector;
mod fixture;
mod builder;
mod renderer;

pub use scanner::{LineKind, MarkerKeyword, ScannerPass, SourceLine, MARKER_PREFIX};
pub use parser::{is_identifier, Marker, MarkerParserPass, NULL_ARGUMENT};
pub use collector::{FunctionDefinition, TestFunctionCollectorPass};
pub use fixture::{FixtureScope, FixtureTrackerPass};
pub use builder::{RegistryBuilderPass, ScannedFile};
pub use renderer::RunnerRendererPass;
