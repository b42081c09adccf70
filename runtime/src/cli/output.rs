//! Output helpers shared by the CLI commands.
//!
//! Global flags are published through `UAFCALC_*` environment variables by
//! `main` so any module can check them.

use serde::Serialize;
use std::io::IsTerminal;

pub fn is_json() -> bool {
    flag("UAFCALC_JSON")
}

pub fn is_quiet() -> bool {
    flag("UAFCALC_QUIET")
}

fn flag(name: &str) -> bool {
    std::env::var(name).map(|v| v == "1").unwrap_or(false)
}

/// Pretty-print a value as JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("  failed to serialize output: {e}"),
    }
}

/// Install the tracing subscriber for a CLI run.
///
/// Logs go to stderr so stdout stays clean for `--json` output.
pub fn init_logging(verbose: bool, quiet: bool, json: bool) {
    let default = if verbose {
        "uafcalc=debug,uafcalc_runtime=debug,uafcalc_grades=debug"
    } else if quiet {
        "warn"
    } else {
        "uafcalc=info,uafcalc_runtime=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

/// Terminal symbols, plain when color is off or stderr is not a terminal.
pub struct Styles {
    color: bool,
}

impl Styles {
    pub fn detect() -> Self {
        Self {
            color: !flag("UAFCALC_NO_COLOR") && std::io::stderr().is_terminal(),
        }
    }

    pub fn ok_sym(&self) -> &'static str {
        if self.color {
            "\x1b[32m✓\x1b[0m"
        } else {
            "ok"
        }
    }

    pub fn warn_sym(&self) -> &'static str {
        if self.color {
            "\x1b[33m!\x1b[0m"
        } else {
            "!"
        }
    }

    pub fn bold(&self, text: &str) -> String {
        if self.color {
            format!("\x1b[1m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }
}
