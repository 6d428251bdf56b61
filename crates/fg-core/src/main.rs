//! fg-core binary entry point.

use std::io::IsTerminal;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use fg_config::resolve_artifact_path;
use fg_core::cli::{Cli, Commands};
use fg_core::orchestrate::{self, ScoreConfig};
use fg_core::ExitCode;

fn main() {
    let cli = Cli::parse();
    init_tracing();
    std::process::exit(run(cli).as_i32());
}

/// Logs go to stderr: stdout carries exactly one line of JSON per
/// invocation and nothing else.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}

fn run(cli: Cli) -> ExitCode {
    let artifact_path = resolve_artifact_path(cli.preprocessor.as_deref());

    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    let mut success_out = stdout.lock();
    let mut failure_out = stderr.lock();

    match cli.command {
        Commands::Score {
            endpoint,
            timeout_secs,
        } => {
            let config = ScoreConfig {
                artifact_path,
                endpoint,
                timeout: Duration::from_secs(timeout_secs),
            };
            orchestrate::run_score(
                &config,
                &mut std::io::stdin().lock(),
                &mut success_out,
                &mut failure_out,
            )
        }
        Commands::Fit { input, output } => {
            let output_path = output.unwrap_or(artifact_path);
            orchestrate::run_fit(&input, &output_path, &mut success_out, &mut failure_out)
        }
        Commands::Check => {
            orchestrate::run_check(&artifact_path, &mut success_out, &mut failure_out)
        }
    }
}
