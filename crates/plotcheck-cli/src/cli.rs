//! Command-line definition

use clap::{value_parser, Arg, ArgAction, Command};
use plotcheck_figure::ChartKind;
use std::path::PathBuf;

pub(crate) fn command() -> Command {
    Command::new("plotcheck")
        .version(plotcheck_core::VERSION)
        .about("Verify that rendered charts reproduce their golden datasets")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log at debug level (RUST_LOG takes precedence)"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Run configuration (TOML)"),
        )
        .subcommand(
            Command::new("run")
                .about("Verify the kind × variant matrix")
                .arg(
                    Arg::new("artifact-dir")
                        .long("artifact-dir")
                        .value_parser(value_parser!(PathBuf))
                        .help("Directory of rendered HTML artifacts"),
                )
                .arg(
                    Arg::new("golden-dir")
                        .long("golden-dir")
                        .value_parser(value_parser!(PathBuf))
                        .help("Directory of golden JSON records"),
                )
                .arg(
                    Arg::new("kind")
                        .short('k')
                        .long("kind")
                        .action(ArgAction::Append)
                        .value_parser(value_parser!(ChartKind))
                        .help("Chart kind to verify (repeatable)"),
                )
                .arg(
                    Arg::new("variants")
                        .long("variants")
                        .value_parser(value_parser!(u32).range(1..))
                        .help("Verify variants 1..=N"),
                )
                .arg(
                    Arg::new("epsilon")
                        .long("epsilon")
                        .value_parser(value_parser!(f64))
                        .help("Absolute-error bound"),
                )
                .arg(
                    Arg::new("workers")
                        .long("workers")
                        .value_parser(value_parser!(usize))
                        .help("Scenarios verified concurrently"),
                )
                .arg(
                    Arg::new("timeout-ms")
                        .long("timeout-ms")
                        .value_parser(value_parser!(u64))
                        .help("Snapshot deadline in milliseconds"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the report as JSON"),
                ),
        )
        .subcommand(Command::new("kinds").about("List registered chart kinds and their strategies"))
        .subcommand(
            Command::new("inspect")
                .about("Print the series extracted from one HTML artifact")
                .arg(
                    Arg::new("kind")
                        .short('k')
                        .long("kind")
                        .required(true)
                        .value_parser(value_parser!(ChartKind))
                        .help("Chart kind of the artifact"),
                )
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("HTML artifact"),
                ),
        )
}
