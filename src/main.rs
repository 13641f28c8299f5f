//! evalloop - CLI

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use owo_colors::OwoColorize;
use tracing::debug;

use evalloop::repl::default_console;
use evalloop::util::{config, logger};
use evalloop::{EngineManager, EvalLoop, NAME, VERSION};

/// Interactive read-eval-print loop
#[derive(Parser, Debug)]
#[command(name = "evalloop")]
#[command(version = VERSION)]
#[command(about = NAME, long_about = None)]
struct Args {
    /// Engine to start with (extension or engine name)
    #[arg(value_name = "ENGINE")]
    engine: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Read settings from this file instead of the user config
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    logger::init_from_env(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let mut settings = match &args.config {
        Some(path) => config::load_config_from(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => config::load_user_config().context("Failed to load user config")?,
    }
    .repl;

    if let Some(engine) = args.engine {
        settings.default_engine = engine;
    }
    debug!("settings: {:?}", settings);

    let engines = EngineManager::with_builtin_engines();
    let console = default_console().context("Failed to open console")?;
    let interactive = std::io::stdin().is_terminal();

    let mut repl = EvalLoop::from_settings(engines, &settings, console)
        .with_context(|| format!("Cannot start engine '{}'", settings.default_engine))?;

    if interactive {
        let info = repl.engine().info();
        println!(
            "{} {} - {} ({})",
            NAME.bold(),
            VERSION,
            info.engine_name.cyan(),
            info.language_name
        );
        println!("Type {} for help, Ctrl-D to exit\n", "::listCommands".green());
    }

    repl.run().context("Console failure")?;
    Ok(())
}
