//! CLI binary entry point for openapi-lint

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use openapi_lint_sdk::cli::commands::platform::handle_platform;
#[cfg(feature = "cli")]
use openapi_lint_sdk::cli::commands::validate::{ValidateArgs, handle_validate};
#[cfg(feature = "cli")]
use openapi_lint_sdk::config::sample_config;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "openapi-lint")]
#[command(about = "Validate OpenAPI documents with the bundled linter")]
#[command(version)]
struct Cli {
    /// Log level filter (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Lint OpenAPI documents and fail on violations
    Validate {
        /// Project directory (default: current directory)
        #[arg(short, long, default_value = ".")]
        project: PathBuf,
        /// Config file (default: <project>/.openapi-lint.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Directory scanned for .yaml, .yml and .json files
        #[arg(short, long)]
        input_dir: Option<String>,
        /// Explicit file to lint instead of scanning (repeatable)
        #[arg(long = "file")]
        files: Vec<String>,
        /// Ruleset file or http(s):// URL
        #[arg(short, long)]
        ruleset: Option<String>,
        /// Linter output format (text, json, yaml, junit, html, teamcity, ...)
        #[arg(short, long)]
        format: Option<String>,
        /// Write the linter output to this file
        #[arg(short, long)]
        output_file: Option<String>,
        /// Pass --verbose to the linter
        #[arg(short, long)]
        verbose: bool,
        /// Skip validation
        #[arg(long)]
        skip: bool,
        /// Report violations without failing
        #[arg(long)]
        no_fail_on_violations: bool,
        /// Directory the linter is extracted into
        #[arg(long)]
        target_dir: Option<String>,
        /// Seconds one file may take before the linter is killed
        #[arg(long)]
        timeout_secs: Option<u64>,
        /// Force a platform variant (e.g. linux-x64, macos-arm64)
        #[arg(long)]
        platform: Option<String>,
        /// Load linter binaries from this directory instead of the bundled ones
        #[arg(long)]
        resources_dir: Option<String>,
    },
    /// Show the linter build selected for this host
    Platform {
        /// Platform variant to describe instead of the detected one
        #[arg(long)]
        platform: Option<String>,
    },
    /// Print a sample .openapi-lint.toml
    SampleConfig,
}

#[cfg(feature = "cli")]
fn init_tracing(default_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();

    let verbose = matches!(cli.command, Commands::Validate { verbose: true, .. });
    init_tracing(if verbose { "debug" } else { &cli.log_level });

    let result = match cli.command {
        Commands::Validate {
            project,
            config,
            input_dir,
            files,
            ruleset,
            format,
            output_file,
            verbose,
            skip,
            no_fail_on_violations,
            target_dir,
            timeout_secs,
            platform,
            resources_dir,
        } => {
            let args = ValidateArgs {
                project_dir: project,
                config,
                input_dir,
                files,
                ruleset,
                format,
                output_file,
                verbose,
                skip,
                no_fail_on_violations,
                target_dir,
                timeout_secs,
                platform,
                resources_dir,
            };
            handle_validate(&args).map(|_| ())
        }
        Commands::Platform { platform } => handle_platform(platform.as_deref()),
        Commands::SampleConfig => {
            print!("{}", sample_config());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature is not enabled. Build with --features cli");
    std::process::exit(1);
}
