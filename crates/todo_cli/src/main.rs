use clap::Parser;
use clap::error::ErrorKind;
use std::io::{self, Write};
use todo_cli::cli::{self, Cli};
use todo_cli::commands::{self, OutputFormat};
use todo_cli::menu;
use todo_cli::render::ListView;
use todo_core::config::{self, Config};
use todo_core::error::AppError;
use todo_core::task_service::TaskService;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_ENV_VAR: &str = "TODO_LOG";

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .init();
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn load_config(args: &[String]) -> Result<Config, AppError> {
    let overrides = cli::collect_overrides(&cli::extract_config_overrides(args))?;
    let base = config::load_config_with_fallback().config;
    Ok(config::merge_overrides(&base, &overrides))
}

fn run(args: Vec<String>) -> Result<(), AppError> {
    let config = load_config(&args)?;
    let view = ListView::from_config(&config);

    let argv = cli::expand_alias(args, &config)?;
    let cli = match Cli::try_parse_from(std::iter::once("todo".to_string()).chain(argv)) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => return Err(normalize_parse_error(err)),
    };

    let mut service = TaskService::new();
    match cli.command {
        Some(command) => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            let format = OutputFormat::from_json_flag(cli.json);
            commands::run_command(&mut service, command, format, &view, &mut out)?;
            out.flush()?;
        }
        None if cli.json => {
            return Err(AppError::invalid_input(
                "--json requires a command; the interactive menu has no JSON output",
            ));
        }
        None => {
            let stdin = io::stdin();
            menu::run_menu(&mut service, &view, stdin.lock(), io::stdout().lock())?;
        }
    }

    Ok(())
}

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args_os()
        .skip(1)
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();

    if let Err(err) = run(args) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
