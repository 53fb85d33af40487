// Sat Oct 17 2026 - Alex

use anyhow::Context;
use colored::Colorize;
use deffilter::{
    engine::DefPipeline,
    error::USAGE_EXIT_CODE,
    ui::cli::{CliInterface, Commands},
    utils::{config::RulesFile, logging},
};
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

fn main() -> ExitCode {
    let args = CliInterface::parse_args();

    if args.no_color {
        colored::control::set_override(false);
    }

    if let Err(e) = logging::init(args.verbose, args.quiet, !args.no_color, args.log_file.as_deref()) {
        eprintln!("{} Failed to open log file: {}", "[!]".red(), e);
        return ExitCode::FAILURE;
    }

    if let Some(Commands::DumpRules { output }) = &args.command {
        return match dump_rules(output) {
            Ok(()) => {
                println!("{} Built-in rules written to: {}", "[+]".green(), output.display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("{} {:#}", "[!]".red(), e);
                ExitCode::FAILURE
            }
        };
    }

    let config = match args.to_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{} {}", "[!]".red(), e);
            return ExitCode::from(USAGE_EXIT_CODE);
        }
    };

    let start_time = Instant::now();

    if !args.quiet {
        println!("{} Reading {} symbol lists", "[*]".blue(), config.inputs.len());
    }

    let pipeline = match DefPipeline::from_config(config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{} {}", "[!]".red(), e);
            return ExitCode::FAILURE;
        }
    };

    let outcome = match pipeline.run() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("{} {}", "[!]".red(), e);
            return ExitCode::from(e.exit_code());
        }
    };

    if !args.quiet {
        println!();
        outcome.stats.print_summary();
        println!();
        println!(
            "{} {} written in {:.2}s",
            "[+]".green(),
            pipeline.config().output.display(),
            start_time.elapsed().as_secs_f64()
        );
    }

    ExitCode::SUCCESS
}

fn dump_rules(output: &Path) -> anyhow::Result<()> {
    let rules = RulesFile::builtin();
    rules.validate().context("built-in rules do not validate")?;
    rules
        .save(output)
        .with_context(|| format!("Failed to write rules to {}", output.display()))
}
