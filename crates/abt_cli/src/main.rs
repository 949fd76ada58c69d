//! aab2apk - convert Android App Bundles to installable APKs.
//!
//! Thin CLI over `abt_core`: the same session/pipeline a GUI would drive,
//! with flags instead of file pickers. Unset flags fall back to the
//! persisted configuration, so `aab2apk convert` alone repeats the last
//! conversion.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use abt_core::command::CommandOutcome;
use abt_core::config::default_config_path;
use abt_core::logging::{init_tracing, LogLevel};
use abt_core::models::{OutputMode, SigningMode};
use abt_core::session::ConversionSession;
use abt_core::state::AppEvent;

#[derive(Parser)]
#[command(
    name = "aab2apk",
    version = abt_core::version(),
    about = "Convert .aab bundles to APKs via bundletool"
)]
struct Cli {
    /// Use a specific config file instead of the platform default.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose diagnostics (RUST_LOG still takes precedence).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run bundletool build-apks and unpack the result.
    Convert {
        /// Path to the input .aab file.
        #[arg(long, value_name = "FILE")]
        aab: Option<String>,

        /// Path to the bundletool executable.
        #[arg(long, value_name = "FILE")]
        bundletool: Option<String>,

        /// Explicit --output path (defaults to the bundle with .apks).
        #[arg(long, value_name = "PATH")]
        output: Option<String>,

        /// Output mode: universal, apk-set, or device-specific.
        #[arg(long, value_name = "MODE")]
        mode: Option<String>,

        /// Sign with the configured release keystore.
        #[arg(long)]
        release: bool,

        /// Keystore path (implies release signing).
        #[arg(long, value_name = "FILE")]
        keystore: Option<String>,

        /// Keystore password.
        #[arg(long, value_name = "PASS")]
        keystore_password: Option<String>,

        /// Key alias within the keystore.
        #[arg(long, value_name = "ALIAS")]
        key_alias: Option<String>,

        /// Password for the key itself.
        #[arg(long, value_name = "PASS")]
        key_password: Option<String>,
    },
    /// Run an arbitrary command through the executor (escape hatch).
    Run {
        /// Command and arguments, executed without a shell.
        #[arg(required = true, trailing_var_arg = true)]
        command: Vec<String>,
    },
    /// Print the config file path and its current contents.
    Config,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    init_tracing(if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Warn
    });

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);

    match cli.command {
        Command::Convert {
            aab,
            bundletool,
            output,
            mode,
            release,
            keystore,
            keystore_password,
            key_alias,
            key_password,
        } => {
            let session = ConversionSession::open(&config_path)
                .with_context(|| format!("opening config {}", config_path.display()))?;

            if let Some(path) = aab {
                session.handle_event(AppEvent::SelectAabFile(path));
            }
            if let Some(path) = bundletool {
                session.handle_event(AppEvent::SelectBundleToolPath(path));
            }
            if let Some(path) = output {
                session.handle_event(AppEvent::SelectOutputDir(path));
            }
            if let Some(mode) = mode {
                session.handle_event(AppEvent::SelectMode(parse_mode(&mode)?));
            }
            if release || keystore.is_some() {
                session.handle_event(AppEvent::SelectSigningMode(SigningMode::Release));
            }
            if let Some(path) = keystore {
                session.handle_event(AppEvent::SelectKeystorePath(path));
            }
            if let Some(password) = keystore_password {
                session.handle_event(AppEvent::SelectKeystorePassword(password));
            }
            if let Some(alias) = key_alias {
                session.handle_event(AppEvent::SelectKeyAlias(alias));
            }
            if let Some(password) = key_password {
                session.handle_event(AppEvent::SelectKeyPassword(password));
            }

            let run = session.convert();
            println!("{}", run.state.log);
            Ok(exit_code(&run.outcome))
        }
        Command::Run { command } => {
            let session = ConversionSession::open(&config_path)
                .with_context(|| format!("opening config {}", config_path.display()))?;

            let run = session.run_custom_command(&command.join(" "));
            println!("{}", run.state.log);
            Ok(exit_code(&run.outcome))
        }
        Command::Config => {
            println!("{}", config_path.display());
            match fs::read_to_string(&config_path) {
                Ok(content) => println!("{}", content),
                Err(_) => println!("(no config file yet)"),
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn parse_mode(value: &str) -> Result<OutputMode> {
    match value.to_ascii_lowercase().as_str() {
        "universal" => Ok(OutputMode::Universal),
        "apk-set" | "apkset" => Ok(OutputMode::ApkSet),
        "device-specific" | "device" => Ok(OutputMode::DeviceSpecific),
        other => anyhow::bail!(
            "unknown mode '{}' (expected universal, apk-set, or device-specific)",
            other
        ),
    }
}

/// Map the structured run outcome to an exit code for scripting. The log
/// is display text only; tool output may legitimately contain "Error: ".
fn run_failed(outcome: &CommandOutcome) -> bool {
    !outcome.is_success()
}

fn exit_code(outcome: &CommandOutcome) -> ExitCode {
    if run_failed(outcome) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
