mod config;
mod runner;

pub use config::{DriverStyle, RunnerConfig};
pub use runner::{
    c_string, file_banner, section, DEFAULT_OUTPUT_FILE, NONE, NO_FIXTURE_FN, PLAIN_DRIVER_NAME,
    REGISTER_FIXTURE, RUNNER_LEADER, STANDARD_INCLUDES, STUB_PREFIX, UNITY_HOOKS,
};
