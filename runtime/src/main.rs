// Copyright 2026 UAF Calculator Contributors
// SPDX-License-Identifier: MIT

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::net::IpAddr;
use uafcalc_runtime::cli::{self, output, PortalOverrides};
use uafcalc_runtime::service::ApiResponse;
use uafcalc_runtime::StrategyKind;

#[derive(Parser)]
#[command(
    name = "uafcalc",
    about = "uafcalc: UAF result fetcher and CGPA calculator",
    version,
    after_help = "Run 'uafcalc <command> --help' for details on each command."
)]
struct Cli {
    /// Output results as JSON (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Results portal strategy (http or browser)
    #[arg(long, global = true)]
    strategy: Option<StrategyKind>,

    /// Attempts per fetch, including the first
    #[arg(long, global = true)]
    retries: Option<u32>,

    /// Pause between attempts in milliseconds
    #[arg(long, global = true)]
    retry_delay_ms: Option<u64>,

    /// Per-request timeout in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a transcript and print semester GPAs and the CGPA
    Result {
        /// Registration number (e.g. "2022-ag-7693")
        registration: String,
        /// Fold current attendance courses into the summary
        #[arg(long)]
        with_attendance: bool,
        /// Credit hours assumed for each attendance course
        #[arg(long, requires = "with_attendance")]
        credit_hours: Option<String>,
    },
    /// List current-semester courses from the attendance portal
    Attendance {
        /// Registration number (e.g. "2022-ag-7693")
        registration: String,
    },
    /// Run the REST API
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: IpAddr,
        /// Port to listen on
        #[arg(long, short, default_value = "8080")]
        port: u16,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global flags via environment variables so all modules can check them
    if cli.json {
        std::env::set_var("UAFCALC_JSON", "1");
    }
    if cli.quiet {
        std::env::set_var("UAFCALC_QUIET", "1");
    }
    if cli.no_color {
        std::env::set_var("UAFCALC_NO_COLOR", "1");
    }
    output::init_logging(cli.verbose, cli.quiet, cli.json);

    let cfg = PortalOverrides {
        strategy: cli.strategy,
        retries: cli.retries,
        retry_delay_ms: cli.retry_delay_ms,
        timeout_ms: cli.timeout_ms,
    }
    .resolve();

    let result = match cli.command {
        Commands::Result {
            registration,
            with_attendance,
            credit_hours,
        } => {
            cli::result_cmd::run(&registration, &cfg, with_attendance, credit_hours.as_deref())
                .await
        }
        Commands::Attendance { registration } => {
            cli::attendance_cmd::run(&registration, &cfg).await
        }
        Commands::Serve { host, port } => cli::serve::run(host, port, &cfg).await,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "uafcalc", &mut std::io::stdout());
            Ok(())
        }
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        if output::is_json() {
            output::print_json(&ApiResponse::<()>::error(format!("{e:#}")));
        } else if !output::is_quiet() {
            eprintln!("  Error: {e:#}");
        }
        std::process::exit(1);
    }

    result
}
