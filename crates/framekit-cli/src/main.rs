// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Framekit — image dataset curation for frame manifests
//
// Entry point. Initialises logging, parses the command line, and dispatches
// to the command implementations.

mod cli;
mod commands;

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use framekit_core::human_errors::humanize_error;
use framekit_core::{FramekitError, SplitRole, ToolConfig};

use cli::{Cli, Command};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ToolConfig::default();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let result = match &cli.command {
        Command::Cleanup(args) => commands::cleanup(args, &config, &mut out),
        Command::SplitTest(args) => {
            commands::split(SplitRole::Test, args, &config, &mut out).map(|_| ())
        }
        Command::SplitVal(args) => {
            commands::split(SplitRole::Val, args, &config, &mut out).map(|_| ())
        }
        Command::Split(args) => {
            commands::split(args.role, &args.split, &config, &mut out).map(|_| ())
        }
        Command::Rescale(args) => commands::rescale(args, &config, &mut out).map(|_| ()),
        Command::StripExt(args) => commands::strip_ext(args, &mut out),
    };
    let _ = out.flush();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "command failed");
            match err.downcast_ref::<FramekitError>() {
                Some(framekit_err) => {
                    let human = humanize_error(framekit_err);
                    eprintln!("Error: {}", human.message);
                    eprintln!("{}", human.suggestion);
                }
                None => eprintln!("Error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
