//! Kotai agent binary: renders the session prompt and hands the session
//! plan to the real-time agent runtime on stdout.

use kotai_agent::config::{self, Environment};
use kotai_agent::{run, AppError};
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn resolve_config_path(env: &Environment) -> (Option<String>, &'static str) {
    if let Some(path) = std::env::args()
        .nth(1)
        .filter(|value| !value.trim().is_empty())
    {
        return (Some(path), "cli-arg");
    }

    if let Some(path) = env.var("KOTAI_CONFIG_PATH") {
        if !path.trim().is_empty() {
            return (Some(path), "env-var");
        }
    }

    (None, "default")
}

fn init_tracing(logging: &config::LoggingConfig) {
    let filter = EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    // stdout carries the session plan
    if logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> ExitCode {
    let env = match Environment::with_env_file(Path::new(config::ENV_FILE)) {
        Ok(env) => env,
        Err(e) => {
            eprintln!("{}", AppError::from(e));
            return ExitCode::FAILURE;
        }
    };

    let (resolved_config_path, config_source) = resolve_config_path(&env);
    let selected_config_path = resolved_config_path.as_deref().unwrap_or("kotai.toml");

    let loaded = match config::load_config(Some(selected_config_path), &env) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("{}", AppError::from(e));
            return ExitCode::FAILURE;
        }
    };
    let config = loaded.config;

    init_tracing(&config.logging);

    if env.file_vars() > 0 {
        tracing::info!(
            path = config::ENV_FILE,
            vars = env.file_vars(),
            "loaded environment file"
        );
    }
    if loaded.file_missing {
        tracing::info!(path = selected_config_path, "config file not found, using defaults");
    }
    tracing::info!(
        source = config_source,
        path = selected_config_path,
        "resolved startup configuration path"
    );

    match run(&config, std::io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "agent session did not start");
            ExitCode::FAILURE
        }
    }
}
