use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use grm::output::{generate, GenerateRequest};
use grm::template::DEFAULT_OUTPUT_FILE;
use grm::{DriverStyle, RunnerConfig};

#[derive(Parser)]
#[command(name = "grm")]
#[command(author, version, about = "Generate a test runner from marker-annotated C test files", long_about = None)]
struct Cli {
    /// Test files or directories to search for test*.c
    #[arg(default_value = ".")]
    files: Vec<PathBuf>,

    /// Runner source file to write
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    /// Do not add the standard #include block at the top of the runner
    #[arg(short = 'n', long)]
    no_default_includes: bool,

    /// Driver style (unity, plain)
    #[arg(short, long, default_value = "unity")]
    style: DriverStyle,

    /// Also write a JSON manifest of the discovered tests
    #[arg(short, long)]
    manifest: Option<PathBuf>,

    /// Overwrite an output file that grm did not generate
    #[arg(short, long)]
    force: bool,

    /// Print lots of details
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_request(self) -> GenerateRequest {
        GenerateRequest {
            config: RunnerConfig {
                standard_includes: !self.no_default_includes,
                style: self.style,
            },
            inputs: self.files,
            output: self.output,
            manifest: self.manifest,
            force: self.force,
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let outcome = generate(&cli.into_request())?;
    if !outcome.is_success() {
        let total = outcome.failures.len() + outcome.scanned.len();
        eprintln!(
            "{} of {} file{} failed; nothing written",
            outcome.failures.len(),
            total,
            if total == 1 { "" } else { "s" }
        );
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
