//! Vulcan CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vulcan::cli::{Cli, CommandDispatcher, Commands};
use vulcan::config::find_project_root;
use vulcan::project::Project;
use vulcan::ui::{create_ui, OutputMode};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("vulcan=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vulcan=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    // Arguments may hold passwords; only the subcommand is logged.
    tracing::debug!(
        "Vulcan {} starting: {}",
        env!("CARGO_PKG_VERSION"),
        cli.command.as_ref().map_or("help", Commands::name)
    );

    let output_mode = OutputMode::from_flags(cli.verbose, cli.quiet);

    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    let mut ui = create_ui(true, output_mode);

    let project_root = match &cli.project {
        Some(path) => path.clone(),
        None => match std::env::current_dir() {
            Ok(cwd) => find_project_root(&cwd),
            Err(e) => {
                ui.error(&format!("Error: cannot read current directory: {}", e));
                return ExitCode::from(1);
            }
        },
    };
    tracing::debug!("Project root: {}", project_root.display());

    let project = Project::new(&project_root).with_config_file(cli.config.clone());
    let dispatcher = CommandDispatcher::new(project);

    match dispatcher.dispatch(&cli, ui.as_mut()) {
        Ok(result) => ExitCode::from(result.exit_code.clamp(0, 255) as u8),
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}
