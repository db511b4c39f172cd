//! email2hash - replace the email column of a CSV file with digests
//!
//! This is the main entry point for the email2hash CLI.

use clap::error::ErrorKind;
use clap::Parser;
use e2h_core::config::{ConfigOptions, MalformedRowPolicy, RunConfig};
use e2h_core::driver;
use e2h_core::error::AppError;
use e2h_core::exit_codes::ExitCode;
use e2h_core::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use e2h_core::report::ReportFormat;
use e2h_core::secret::{acquire_secret, secret_from_env, SecretError, TerminalPrompt};
use e2h_digest::{Registry, Secret, RECOMMENDED_SECRET_BYTES};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Hash the email column of a CSV file.
#[derive(Parser, Debug)]
#[command(name = "email2hash")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input CSV file (comma separated, header on the first line)
    #[arg(value_name = "IN_FILE")]
    input: PathBuf,

    /// Output file (default derived from the input name, in the current directory)
    #[arg(short, long, value_name = "OUT_FILE")]
    output: Option<PathBuf>,

    /// Digest algorithm: sha1, sha256, blake2s, blake2b, sha3-256, hmac-sha3-256
    #[arg(long = "hash", value_name = "ALG", default_value = "sha256")]
    algorithm: String,

    /// Also package the output into a ZIP archive (hmac-sha3-256 only)
    #[arg(long)]
    compress: bool,

    /// Suppress the run report and overwrite without asking
    #[arg(short = 'q', long)]
    silent: bool,

    /// Overwrite existing output files without asking
    #[arg(short = 'y', long)]
    yes: bool,

    /// Name of the column to hash
    #[arg(long, value_name = "NAME", default_value = "email")]
    column: String,

    /// What to do with rows that are too short to contain the column
    #[arg(long = "on-malformed", value_enum, default_value_t = MalformedRowPolicy::Abort)]
    on_malformed: MalformedRowPolicy,

    /// Read the HMAC secret from this environment variable instead of prompting
    #[arg(long, value_name = "VAR")]
    secret_env: Option<String>,

    /// Run report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Human)]
    format: ReportFormat,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log level (overrides -v, --silent and E2H_LOG)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    /// Log format: human or jsonl
    #[arg(long, value_name = "FORMAT")]
    log_format: Option<LogFormat>,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::Success,
                _ => ExitCode::ArgsError,
            };
            let _ = err.print();
            std::process::exit(code.as_i32());
        }
    };

    init_logging(&LogConfig::for_cli(
        cli.verbose,
        cli.silent,
        cli.log_level,
        cli.log_format,
    ));

    let exit_code = match run(&cli) {
        Ok(()) => ExitCode::Success,
        Err(err) => {
            eprintln!("email2hash: {err}");
            err.exit_code()
        }
    };
    debug!(code = exit_code.as_i32(), name = exit_code.code_name(), "Exiting");
    std::process::exit(exit_code.as_i32());
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let registry = Registry::standard();
    let config = RunConfig::resolve(
        ConfigOptions {
            input_path: cli.input.clone(),
            output_path: cli.output.clone(),
            algorithm: Some(cli.algorithm.clone()),
            compress: cli.compress,
            silent: cli.silent,
            column: Some(cli.column.clone()),
            malformed_rows: cli.on_malformed,
        },
        &registry,
    )?;

    confirm_overwrite(&config, cli.yes || cli.silent)?;

    let secret = obtain_secret(&config, cli.secret_env.as_deref())?;
    let digester = registry.build(config.algorithm, secret.as_ref())?;
    drop(secret);

    let report = driver::run(&config, digester)?;
    if !config.silent {
        println!("{}", report.render(cli.format));
    }
    Ok(())
}

/// Ask before truncating any existing destination.
fn confirm_overwrite(config: &RunConfig, assume_yes: bool) -> Result<(), AppError> {
    if assume_yes {
        return Ok(());
    }
    for path in config.destinations() {
        if !path.exists() {
            continue;
        }
        if !std::io::stdin().is_terminal() {
            return Err(AppError::OverwriteNeedsConfirmation(path));
        }
        let proceed = dialoguer::Confirm::new()
            .with_prompt(format!("{} already exists. Overwrite?", path.display()))
            .default(false)
            .interact()
            .map_err(|e| AppError::Prompt(std::io::Error::other(e)))?;
        if !proceed {
            return Err(AppError::Declined(path));
        }
    }
    Ok(())
}

fn obtain_secret(config: &RunConfig, secret_env: Option<&str>) -> Result<Option<Secret>, AppError> {
    if !config.is_keyed() {
        if secret_env.is_some() {
            warn!(algorithm = %config.algorithm, "Ignoring --secret-env for an unkeyed algorithm");
        }
        return Ok(None);
    }

    let secret = match secret_env {
        Some(var) => secret_from_env(var)?,
        None if std::io::stdin().is_terminal() => acquire_secret(TerminalPrompt)?,
        None => return Err(SecretError::NotInteractive.into()),
    };
    if secret.below_recommended() {
        warn!(
            bytes = secret.byte_len(),
            recommended = RECOMMENDED_SECRET_BYTES,
            "Secret is shorter than recommended for HMAC-SHA3-256"
        );
    }
    Ok(Some(secret))
}
