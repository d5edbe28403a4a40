//! bankers - deadlock-avoidance safety checker
//!
//! CLI front end over the safety engine: loads snapshots from the built-in
//! example, a JSON file, the named-dataset store or interactive entry,
//! evaluates them and renders the verdict.

mod cli;
mod display;
mod error;
mod events;
mod input;
mod logging;
mod outcome;
mod player;

use crate::cli::{Cli, Commands, DatasetCommands, SourceArgs};
use crate::display::OutputRenderer;
use crate::error::CliError;
use crate::events::EventHandler;
use crate::input::Prompter;
use crate::outcome::{
    CommandOutcome, DatasetListing, DatasetSummary, DatasetView, EvaluationReport, SnapshotView,
    VerificationReport,
};
use crate::player::SequencePlayer;
use bankers_config::Config;
use bankers_errors::{StorageError, UserFacingError};
use bankers_events::{
    AppEvent, DatasetEvent, EventContext, EventEmitter, EventReceiver, FailureContext,
    GeneralEvent, SafetyEvent,
};
use bankers_safety::{verify_sequence, ProcessId, ResourceState, SafetyEngine, Verdict};
use bankers_store::DatasetStore;
use bankers_types::{ColorChoice, Dataset, OutputFormat};
use clap::Parser;
use std::path::Path;
use std::process;
use std::time::Duration;
use tokio::select;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    match run(cli).await {
        Ok(code) => process::exit(code),
        Err(e) => {
            error!("Application error: {}", e);
            if json_mode {
                println!("{}", e.to_json());
            } else {
                eprintln!("Error: {e}");
            }
            process::exit(1);
        }
    }
}

/// Main application logic; returns the process exit code
async fn run(cli: Cli) -> Result<i32, CliError> {
    // Configuration precedence: file (or defaults), then environment, then flags
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;
    config.merge_env()?;
    apply_cli_config(&mut config, &cli.global, &cli.command);

    let json_mode = cli.global.json || config.general.default_output == OutputFormat::Json;
    init_tracing(json_mode, cli.global.debug, &config.logs_dir());
    info!("Starting bankers v{}", env!("CARGO_PKG_VERSION"));

    let (event_sender, event_receiver) = bankers_events::channel();
    let ctx = EventContext::new(event_sender);
    ctx.emit(AppEvent::General(GeneralEvent::ConfigurationValidated {
        source: cli.global.config.as_deref().map_or_else(
            || "defaults and environment".to_string(),
            |path| path.display().to_string(),
        ),
        warnings: Vec::new(),
    }));

    let renderer = OutputRenderer::new(json_mode, config.general.color);
    let colors_enabled = match config.general.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => console::Term::stderr().features().colors_supported(),
    };
    let mut event_handler = EventHandler::new(colors_enabled, cli.global.debug, json_mode);

    let result =
        execute_command_with_events(cli.command, config, ctx, event_receiver, &mut event_handler)
            .await?;

    renderer.render_result(&result)?;

    info!("Command completed");
    Ok(result.exit_code())
}

/// Execute command with concurrent event handling
async fn execute_command_with_events(
    command: Commands,
    config: Config,
    ctx: EventContext,
    mut event_receiver: EventReceiver,
    event_handler: &mut EventHandler,
) -> Result<CommandOutcome, CliError> {
    let mut command_future = Box::pin(execute_command(command, config, ctx));

    loop {
        select! {
            result = &mut command_future => {
                while let Ok(event) = event_receiver.try_recv() {
                    event_handler.handle_event(event);
                }
                return result;
            }

            event = event_receiver.recv() => {
                if let Some(event) = event {
                    event_handler.handle_event(event);
                }
            }
        }
    }
}

/// Execute the specified command, bracketed by operation lifecycle events
async fn execute_command(
    command: Commands,
    config: Config,
    ctx: EventContext,
) -> Result<CommandOutcome, CliError> {
    let operation = command.operation();
    ctx.emit_operation_started(operation);

    match run_command(command, config, &ctx).await {
        Ok(outcome) => {
            ctx.emit_operation_completed(operation, outcome.exit_code() == 0);
            Ok(outcome)
        }
        Err(e) => {
            ctx.emit_operation_failed(operation, FailureContext::from_error(&e));
            Err(e)
        }
    }
}

async fn run_command(
    command: Commands,
    config: Config,
    ctx: &EventContext,
) -> Result<CommandOutcome, CliError> {
    let engine = SafetyEngine::new(config.safety.round_policy);

    match command {
        Commands::Check { source, verify, .. } => {
            let (label, state) = load_source(&config, &source, ctx).await?;
            match verify {
                Some(order) => verify_order(label, &state, &order),
                None => check_state(label, state, engine, ctx).await,
            }
        }

        Commands::Play { source, .. } => {
            let (label, state) = load_source(&config, &source, ctx).await?;
            let player = SequencePlayer::new(
                engine,
                Duration::from_millis(config.player.step_delay_ms),
                config.player.animate,
                ctx,
            );
            Ok(CommandOutcome::Evaluation(player.play(&label, &state).await))
        }

        Commands::Enter { save, .. } => {
            let state = tokio::task::spawn_blocking(|| {
                Prompter::new(std::io::stdin().lock(), std::io::stderr()).read_state()
            })
            .await??;

            let label = match save {
                Some(name) => {
                    let mut store = open_store(&config, ctx).await?;
                    let replaced = store
                        .save(&name, state.to_dataset())
                        .await
                        .inspect_err(|e| emit_dataset_failure(ctx, Some(&name), e))?;
                    if replaced {
                        warn_replaced(ctx, &name, &store);
                    }
                    ctx.emit(AppEvent::Dataset(DatasetEvent::Saved {
                        name: name.clone(),
                        path: store.path().to_path_buf(),
                    }));
                    name
                }
                None => "entered snapshot".to_string(),
            };
            check_state(label, state, engine, ctx).await
        }

        Commands::Dataset(command) => dataset_command(command, &config, ctx).await,
    }
}

async fn dataset_command(
    command: DatasetCommands,
    config: &Config,
    ctx: &EventContext,
) -> Result<CommandOutcome, CliError> {
    let mut store = open_store(config, ctx).await?;

    match command {
        DatasetCommands::List => {
            let datasets = store
                .list()
                .into_iter()
                .map(|name| {
                    let dataset = store.get(name)?;
                    Ok(DatasetSummary {
                        name: name.to_string(),
                        processes: dataset.num_processes,
                        resources: dataset.num_resources,
                    })
                })
                .collect::<Result<Vec<_>, bankers_errors::Error>>()?;
            Ok(CommandOutcome::DatasetList(DatasetListing {
                path: store.path().display().to_string(),
                datasets,
            }))
        }

        DatasetCommands::Show { name } => {
            let dataset = store
                .get(&name)
                .inspect_err(|e| emit_dataset_failure(ctx, Some(&name), e))?
                .clone();
            let state = ResourceState::try_from(&dataset)?;
            Ok(CommandOutcome::DatasetShow(DatasetView {
                name,
                snapshot: SnapshotView::from(&state),
                dataset,
            }))
        }

        DatasetCommands::Remove { name } => {
            store
                .remove(&name)
                .await
                .inspect_err(|e| emit_dataset_failure(ctx, Some(&name), e))?;
            ctx.emit(AppEvent::Dataset(DatasetEvent::Removed { name: name.clone() }));
            Ok(CommandOutcome::Success(format!(
                "Removed dataset '{name}' from {}",
                store.path().display()
            )))
        }

        DatasetCommands::Import { name, path } => {
            let (dataset, replaced) = store
                .import(&name, &path)
                .await
                .inspect_err(|e| emit_dataset_failure(ctx, Some(&name), e))?;
            if replaced {
                warn_replaced(ctx, &name, &store);
            }
            ctx.emit(AppEvent::Dataset(DatasetEvent::Imported {
                name: name.clone(),
                source: path,
            }));
            Ok(CommandOutcome::Success(format!(
                "Imported dataset '{}' ({} processes, {} resources) into {}",
                name.trim(),
                dataset.num_processes,
                dataset.num_resources,
                store.path().display()
            )))
        }
    }
}

/// Evaluate off the async runtime and report the outcome
async fn check_state(
    label: String,
    state: ResourceState,
    engine: SafetyEngine,
    ctx: &EventContext,
) -> Result<CommandOutcome, CliError> {
    ctx.emit_evaluation_started(state.num_processes(), state.num_resources(), engine.policy());

    let (state, evaluation) = tokio::task::spawn_blocking(move || {
        let evaluation = engine.trace(&state);
        (state, evaluation)
    })
    .await?;

    match &evaluation.verdict {
        Verdict::Safe(sequence) => {
            ctx.emit_evaluation_completed(sequence.as_slice().to_vec(), evaluation.rounds());
        }
        Verdict::Unsafe(err) => ctx.emit_unsafe_state(err),
    }

    Ok(CommandOutcome::Evaluation(EvaluationReport::new(
        label,
        engine.policy(),
        &state,
        &evaluation,
    )))
}

fn verify_order(
    label: String,
    state: &ResourceState,
    text: &str,
) -> Result<CommandOutcome, CliError> {
    let order = parse_order(text)?;
    let report = match verify_sequence(state, &order) {
        Ok(()) => VerificationReport {
            source: label,
            order,
            valid: true,
            violation: None,
            code: None,
        },
        Err(violation) => VerificationReport {
            source: label,
            order,
            valid: false,
            violation: Some(violation.to_string()),
            code: violation.user_code().map(str::to_string),
        },
    };
    Ok(CommandOutcome::Verification(report))
}

/// Parse "1,3,4,0,2" or "P1 P3 P4 P0 P2"
fn parse_order(text: &str) -> Result<Vec<ProcessId>, CliError> {
    let order = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            let digits = token
                .strip_prefix('P')
                .or_else(|| token.strip_prefix('p'))
                .unwrap_or(token);
            digits.parse().map(ProcessId).map_err(|_| {
                CliError::InvalidArguments(format!("'{token}' is not a process index"))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if order.is_empty() {
        return Err(CliError::InvalidArguments(
            "the order to verify is empty".to_string(),
        ));
    }
    Ok(order)
}

/// Resolve the snapshot named by the source flags
async fn load_source(
    config: &Config,
    source: &SourceArgs,
    ctx: &EventContext,
) -> Result<(String, ResourceState), CliError> {
    if let Some(name) = &source.dataset {
        let store = open_store(config, ctx).await?;
        let state = store.load_state(name).inspect_err(|e| {
            emit_dataset_failure(ctx, Some(name), e);
        })?;
        ctx.emit(AppEvent::Dataset(DatasetEvent::Loaded {
            name: name.clone(),
            processes: state.num_processes(),
            resources: state.num_resources(),
        }));
        return Ok((name.clone(), state));
    }

    let (label, dataset) = match &source.file {
        Some(path) => (path.display().to_string(), read_dataset_file(path).await?),
        None => ("textbook example".to_string(), Dataset::textbook()),
    };
    let state = ResourceState::try_from(dataset).inspect_err(|e| {
        ctx.emit(AppEvent::Safety(SafetyEvent::ValidationFailed {
            failure: FailureContext::from_error(e),
        }));
    })?;
    Ok((label, state))
}

async fn read_dataset_file(path: &Path) -> Result<Dataset, CliError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| bankers_errors::Error::from(StorageError::from_io_with_path(&e, path)))?;
    serde_json::from_str(&content).map_err(|e| {
        CliError::Ops(
            StorageError::CorruptedData {
                message: format!("{}: {e}", path.display()),
            }
            .into(),
        )
    })
}

async fn open_store(config: &Config, ctx: &EventContext) -> Result<DatasetStore, CliError> {
    let store = DatasetStore::open(config.datasets_path())
        .await
        .inspect_err(|e| emit_dataset_failure(ctx, None, e))?;
    Ok(store)
}

fn warn_replaced(ctx: &EventContext, name: &str, store: &DatasetStore) {
    ctx.emit_warning(
        format!("Replaced existing dataset '{}'", name.trim()),
        store.path().display().to_string(),
    );
}

fn emit_dataset_failure(ctx: &EventContext, name: Option<&str>, error: &bankers_errors::Error) {
    ctx.emit(AppEvent::Dataset(DatasetEvent::Failed {
        name: name.map(str::to_string),
        failure: FailureContext::from_error(error),
    }));
}

/// Initialize tracing/logging
fn init_tracing(json_mode: bool, debug_enabled_flag: bool, log_dir: &Path) {
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_enabled_flag;

    if debug_enabled {
        if let Some(file) = open_log_file(log_dir) {
            tracing_subscriber::fmt()
                .json()
                .with_writer(file)
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                        tracing_subscriber::EnvFilter::new("info,bankers=debug,bankers_safety=debug")
                    }),
                )
                .init();
            return;
        }
    }

    if json_mode {
        // Console output must stay parseable
        tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_env_filter("off")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new("warn,bankers=warn")
                }),
            )
            .init();
    }
}

fn open_log_file(log_dir: &Path) -> Option<std::fs::File> {
    if let Err(e) = std::fs::create_dir_all(log_dir) {
        eprintln!("Warning: Failed to create log directory: {e}");
        return None;
    }

    let log_file = log_dir.join(format!(
        "bankers-{}.log",
        chrono::Utc::now().format("%Y%m%d-%H%M%S")
    ));
    match std::fs::File::create(&log_file) {
        Ok(file) => {
            eprintln!("Debug logging enabled: {}", log_file.display());
            Some(file)
        }
        Err(e) => {
            eprintln!("Warning: Failed to create log file: {e}");
            None
        }
    }
}

/// Apply CLI configuration overrides (highest precedence)
fn apply_cli_config(config: &mut Config, global: &cli::GlobalArgs, command: &Commands) {
    if let Some(color) = global.color {
        config.general.color = color;
    } else if config.general.default_output == OutputFormat::Plain {
        config.general.color = ColorChoice::Never;
    }

    match command {
        Commands::Check { policy, .. } | Commands::Enter { policy, .. } => {
            if let Some(policy) = policy {
                config.safety.round_policy = *policy;
            }
        }
        Commands::Play {
            policy,
            delay_ms,
            no_animate,
            ..
        } => {
            if let Some(policy) = policy {
                config.safety.round_policy = *policy;
            }
            if let Some(delay) = delay_ms {
                config.player.step_delay_ms = *delay;
            }
            if *no_animate {
                config.player.animate = false;
            }
        }
        Commands::Dataset(_) => {}
    }
}
