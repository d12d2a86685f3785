//! EVSE Agent - Entry Point
//!
//! Reports OpenEVSE status to StatsD and exposes one-shot control commands.

use std::collections::HashMap;
use std::env;

use evse_agent::app::options::AppOptions;
use evse_agent::app::run::run;
use evse_agent::errors::AgentError;
use evse_agent::evse::client::EvseClient;
use evse_agent::filesys::file::File;
use evse_agent::logs::{init_logging, LogOptions};
use evse_agent::models::status::PowerState;
use evse_agent::storage::settings::{Settings, DEFAULT_SETTINGS_PATH};
use evse_agent::utils::version_info;

use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut cli_args: HashMap<String, String> = HashMap::new();

    for arg in args.iter().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            // Handle --key=value format
            let clean_key = key.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            // Handle standalone flags like --version
            let clean_key = arg.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), "true".to_string());
        }
    }

    // Print version and exit
    let version = version_info();
    if cli_args.contains_key("version") {
        match serde_json::to_string_pretty(&version) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Unable to print version: {e}"),
        }
        return;
    }

    // Retrieve the settings file
    let settings_path = cli_args
        .get("configFile")
        .or_else(|| cli_args.get("config"))
        .map(String::as_str)
        .unwrap_or(DEFAULT_SETTINGS_PATH);
    let settings = match Settings::load(&File::new(settings_path)).await {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Invalid config file provided: {e}");
            std::process::exit(1);
        }
    };

    // Initialize logging
    let log_options = LogOptions {
        log_level: settings.log_level,
        log_dir: settings.log_dir.clone(),
        ..Default::default()
    };
    if let Err(e) = init_logging(log_options) {
        println!("Failed to initialize logging: {e}");
    }
    info!("Loaded settings from {}", settings_path);

    // One-shot control commands
    if let Some(result) = run_command(&cli_args, &settings).await {
        match result {
            Ok(output) => println!("{}", output),
            Err(e) => {
                error!("Command failed: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    // Run the agent
    let options = AppOptions::from_settings(&settings);
    info!("Running EVSE agent {} with options: {:?}", version.version, options);
    if let Err(e) = run(options, await_shutdown_signal()).await {
        error!("Failed to run the agent: {e}");
        std::process::exit(1);
    }
}

/// Runs a control command if one was requested
async fn run_command(
    cli_args: &HashMap<String, String>,
    settings: &Settings,
) -> Option<Result<String, AgentError>> {
    let requested = ["get-state", "set-state", "get-limit", "set-limit"]
        .iter()
        .any(|key| cli_args.contains_key(*key));
    if !requested {
        return None;
    }

    let client = match EvseClient::connect(&settings.evse) {
        Ok(client) => client,
        Err(e) => return Some(Err(e)),
    };

    let result = if let Some(state) = cli_args.get("set-state") {
        match state.parse::<PowerState>() {
            Ok(desired) => client.set_state(desired).await.map(|action| action.to_string()),
            Err(e) => Err(e),
        }
    } else if let Some(limit) = cli_args.get("set-limit") {
        match limit.parse::<i64>() {
            Ok(requested) => client.set_limit(requested).await.map(|amps| format!("{}A", amps)),
            Err(e) => Err(AgentError::Config(format!("invalid limit {:?}: {}", limit, e))),
        }
    } else if cli_args.contains_key("get-limit") {
        client.get_limit().await.map(|amps| format!("{}A", amps))
    } else {
        client.get_state().await.map(|state| state.to_string())
    };

    Some(result)
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let (mut sigterm, mut sigint) =
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
                _ => {
                    error!("Unable to install signal handlers, falling back to Ctrl+C");
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };

        tokio::select! {
            _ = sigterm.recv() => {
                info!("SIGTERM received, shutting down...");
            }
            _ = sigint.recv() => {
                info!("SIGINT received, shutting down...");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl+C received, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {e}");
        }
        info!("Ctrl+C received, shutting down...");
    }
}
