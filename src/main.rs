use transcript_qa::cli::commands::{CliArgs, Commands, ConfigArgs, RunArgs};
use transcript_qa::cli::output::OutputFormatter;
use transcript_qa::fs::RealFileSystem;
use transcript_qa::input::{InputDescriptor, InputKind, InputRegistry};
use transcript_qa::pipeline::PipelineOrchestrator;
use transcript_qa::progress::{BarHandler, LoggingHandler, ProgressHandler};
use transcript_qa::util::{init_logging, parse_level, LoggingConfig};
use transcript_qa::{QaConfig, NAME, VERSION};

use clap::Parser;
use std::env;
use std::process;
use std::sync::Arc;
use tracing::{debug, error, info, Level};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("{} v{} starting", NAME, VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Run(run_args) => handle_run(run_args, args.quiet).await,
        Commands::Config(config_args) => handle_config(config_args),
    };

    process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    let level = if let Some(level_str) = &args.log_level {
        parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        parse_level(&env::var("TQA_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()))
    };

    let use_json = args.log_json
        || env::var("TQA_LOG_JSON")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

    init_logging(LoggingConfig::with_level(level).with_json(use_json));
}

fn config_from_args(args: &RunArgs) -> QaConfig {
    let defaults = QaConfig::default();
    let provider = args.backend.unwrap_or(defaults.provider);
    let model = match (&args.model, args.backend) {
        (Some(model), _) => model.clone(),
        (None, Some(backend)) if env::var("TQA_MODEL").is_err() => {
            transcript_qa::config::default_model(backend).to_string()
        }
        _ => defaults.model.clone(),
    };

    QaConfig {
        provider,
        model,
        request_timeout_secs: args.timeout.unwrap_or(defaults.request_timeout_secs),
        retry_limit: args.retry_limit.unwrap_or(defaults.retry_limit),
        question_column: args
            .question_column
            .clone()
            .unwrap_or_else(|| defaults.question_column.clone()),
        sheet: args.sheet.clone().or_else(|| defaults.sheet.clone()),
        output_path: args
            .output
            .clone()
            .unwrap_or_else(|| defaults.output_path.clone()),
        ..defaults
    }
}

async fn handle_run(args: &RunArgs, quiet: bool) -> i32 {
    let config = config_from_args(args);
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        eprintln!("\nPlease check your environment variables and command-line arguments.");
        return 1;
    }
    debug!("{}", config);

    let completion = Arc::new(config.completion_service(config.create_client()));
    let progress: Arc<dyn ProgressHandler> = if quiet || args.no_progress {
        Arc::new(LoggingHandler)
    } else {
        Arc::new(BarHandler::new())
    };

    let orchestrator = PipelineOrchestrator::with_file_system(
        config.pipeline_config(),
        completion,
        Arc::new(RealFileSystem),
    )
    .with_progress(progress);

    info!(
        transcript = %args.transcript.display(),
        questions = %args.questions.display(),
        provider = config.provider.as_str(),
        model = %config.model,
        "Starting questionnaire run"
    );

    let run = orchestrator
        .run(InputRegistry::for_run(
            InputDescriptor::file(InputKind::Text, &args.transcript),
            InputDescriptor::file(InputKind::QuestionSheet, &args.questions),
        ))
        .await;
    let result = run.result();

    let formatter = OutputFormatter::new(args.format.into());
    match formatter.format_run(&result) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            error!("Failed to format result: {:#}", e);
            return 1;
        }
    }

    if result.success {
        0
    } else {
        1
    }
}

fn handle_config(args: &ConfigArgs) -> i32 {
    let config = QaConfig::default();
    let formatter = OutputFormatter::new(args.format.into());

    match formatter.format_config(&config) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            error!("Failed to format configuration: {:#}", e);
            return 1;
        }
    }

    match config.validate() {
        Ok(()) => 0,
        Err(e) => {
            error!("Configuration error: {}", e);
            1
        }
    }
}
