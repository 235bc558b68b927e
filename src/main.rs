//! tabroute host binary.
//!
//! Hosts an application declared in TOML so its routes can be completed
//! from a real shell.
//!
//! ```text
//! shell Tab press
//!     → generated script
//!     → `tabroute __complete <cursor> <words...>`
//!     → App::complete (routes, sources)
//!     → protocol lines on stdout
//! ```

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;

use tabroute::completion::{CompletionResponse, COMPLETE_COMMAND};
use tabroute::config::{load_config, AppConfig};
use tabroute::scripts::{ScriptMode, Shell};
use tabroute::{observability, App};

const CONFIG_ENV: &str = "TABROUTE_CONFIG";
const DEFAULT_CONFIG: &str = "tabroute.toml";

#[derive(Parser)]
#[command(name = "tabroute")]
#[command(about = "Route-pattern driven shell completion", long_about = None)]
struct Cli {
    /// Application config file
    #[arg(short, long, env = CONFIG_ENV, default_value = DEFAULT_CONFIG)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a completion script for a shell
    ///
    /// Dynamic scripts run `<program> __complete ...` on every Tab press.
    /// The program defaults to `app_name`, so unless `app_name` is itself a
    /// link to this binary pass `--program`, and export TABROUTE_CONFIG so
    /// the callback finds the config from any directory.
    Completions {
        /// bash, zsh, fish or powershell
        shell: Shell,

        /// Call back into the application instead of embedding the routes
        #[arg(long)]
        dynamic: bool,

        /// Executable the dynamic script invokes (e.g. the path of tabroute)
        #[arg(long, requires = "dynamic")]
        program: Option<String>,
    },
    /// List compiled routes, most specific first
    Routes {
        #[arg(long)]
        json: bool,
    },
    /// Show completion candidates for a command line
    Suggest {
        /// The line as typed so far; a trailing space starts a new word
        line: String,
    },
    /// Show which route a command line dispatches to
    Resolve {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
    },
}

#[derive(Serialize)]
struct RouteSummary<'a> {
    pattern: &'a str,
    handler: &'a str,
    specificity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(String::as_str) == Some(COMPLETE_COMMAND) {
        complete(&args[2..]);
        return ExitCode::SUCCESS;
    }

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("tabroute: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&cli.config)?;
    observability::init(&config.logging.level);
    let app = App::from_config(&config);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Completions {
            shell,
            dynamic,
            program,
        } => {
            let mode = if dynamic {
                ScriptMode::Dynamic
            } else {
                ScriptMode::Static
            };
            out.write_all(app.script(shell, mode, program.as_deref())?.as_bytes())?;
        }
        Commands::Routes { json } => {
            let summaries: Vec<RouteSummary<'_>> = app
                .routes
                .ranked()
                .into_iter()
                .map(|r| RouteSummary {
                    pattern: &r.pattern,
                    handler: &r.handler,
                    specificity: r.specificity,
                    description: r.description.as_deref(),
                })
                .collect();
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&summaries)?)?;
            } else {
                for s in &summaries {
                    let pattern = if s.pattern.is_empty() { "(default)" } else { s.pattern };
                    match s.description {
                        Some(d) => writeln!(out, "{:>6}  {}  # {}", s.specificity, pattern, d)?,
                        None => writeln!(out, "{:>6}  {}", s.specificity, pattern)?,
                    }
                }
            }
        }
        Commands::Suggest { line } => {
            for candidate in app.suggest(&line) {
                match candidate.description() {
                    Some(d) => writeln!(out, "{}\t{}", candidate.value(), d)?,
                    None => writeln!(out, "{}", candidate.value())?,
                }
            }
        }
        Commands::Resolve { words } => {
            let matched = app
                .resolve(&words)
                .ok_or_else(|| format!("no route matches `{}`", words.join(" ")))?;
            writeln!(out, "handler: {}", matched.route.handler)?;
            for (name, value) in &matched.values {
                writeln!(out, "  {} = {}", name, value)?;
            }
            if !matched.rest.is_empty() {
                writeln!(out, "  rest = {}", matched.rest.join(" "))?;
            }
            for flag in &matched.flags {
                writeln!(out, "  {} = true", flag)?;
            }
            for (option, values) in &matched.option_values {
                writeln!(out, "  {} = {}", option, values.join(", "))?;
            }
        }
    }

    Ok(())
}

/// Serve the reserved callback. Always exits 0.
fn complete(args: &[String]) {
    let path = std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let result = match load_callback_config(&path) {
        Some(config) => App::from_config(&config).complete(args, &mut out),
        None => CompletionResponse::error().write_to(&mut out),
    };
    if let Err(e) = result.and_then(|_| out.flush()) {
        tracing::warn!(error = %e, "Failed to write completion response");
    }
}

fn load_callback_config(path: &Path) -> Option<AppConfig> {
    match load_config(path) {
        Ok(config) => {
            observability::init(&config.logging.level);
            Some(config)
        }
        Err(e) => {
            observability::init("warn");
            tracing::warn!(path = %path.display(), error = %e, "Cannot load config for completion");
            None
        }
    }
}
