//! plotcheck command-line runner

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod cli;
mod commands;

use anyhow::Result;
use plotcheck_figure::ChartKind;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber on stderr; `RUST_LOG` overrides the level
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

async fn dispatch() -> Result<i32> {
    let matches = cli::command().get_matches();
    init_tracing(matches.get_flag("verbose"));

    let config_path = matches.get_one::<PathBuf>("config").cloned();
    let config = commands::load_config(config_path.as_deref()).await?;
    let mut stdout = std::io::stdout().lock();

    match matches.subcommand() {
        Some(("run", args)) => {
            let config = commands::apply_overrides(config, args);
            tracing::info!("plotcheck {}", plotcheck_core::VERSION);
            commands::run(&config, args.get_flag("json"), &mut stdout).await
        }
        Some(("kinds", _)) => commands::kinds(&config, &mut stdout),
        Some(("inspect", args)) => {
            let kind = args
                .get_one::<ChartKind>("kind")
                .ok_or_else(|| anyhow::anyhow!("--kind is required"))?;
            let file = args
                .get_one::<PathBuf>("file")
                .ok_or_else(|| anyhow::anyhow!("FILE is required"))?;
            commands::inspect(&config, kind, file, &mut stdout).await
        }
        _ => unreachable!("subcommand_required is set"),
    }
}

#[tokio::main]
async fn main() {
    let code = match dispatch().await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("error: {e:#}");
            commands::EXIT_FATAL
        }
    };
    std::process::exit(code);
}
