use clap::{Parser, Subcommand, ValueEnum};
use genai::adapter::AdapterKind;
use std::path::PathBuf;

/// Answers questionnaire questions from meeting transcripts with an LLM
#[derive(Parser, Debug)]
#[command(
    name = "transcript-qa",
    about = "Answers questionnaire questions from meeting transcripts with an LLM",
    version,
    long_about = "transcript-qa reads a free-text transcript and a question source, asks a \
                  language model to answer each question from transcript evidence, and writes \
                  a reviewable report with answers, confidence levels and a summary."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Answer a questionnaire from a transcript",
        long_about = "Loads the transcript and the question source, resolves every question \
                      and writes the report.\n\n\
                      Examples:\n  \
                      transcript-qa run --transcript meeting.txt --questions aif.json\n  \
                      transcript-qa run -t meeting.txt -Q aif.yaml --sheet Infrastructure -o out/report.yaml\n  \
                      transcript-qa run -t meeting.txt -Q questions.txt --backend ollama --model qwen2.5:7b"
    )]
    Run(RunArgs),

    #[command(about = "Show the effective configuration")]
    Config(ConfigArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    #[arg(short = 't', long, value_name = "PATH", help = "Transcript text file")]
    pub transcript: PathBuf,

    #[arg(
        short = 'Q',
        long,
        value_name = "PATH",
        help = "Question source (JSON, YAML or one question per line)"
    )]
    pub questions: PathBuf,

    #[arg(long, value_name = "COLUMN", help = "Column holding the questions")]
    pub question_column: Option<String>,

    #[arg(long, value_name = "SHEET", help = "Sheet holding the questions")]
    pub sheet: Option<String>,

    #[arg(short = 'o', long, value_name = "FILE", help = "Report destination")]
    pub output: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Result format on stdout"
    )]
    pub format: OutputFormatArg,

    #[arg(
        short = 'b',
        long,
        value_parser = parse_adapter_kind,
        help = "AI backend provider"
    )]
    pub backend: Option<AdapterKind>,

    #[arg(short = 'm', long, value_name = "MODEL", help = "Model name to use")]
    pub model: Option<String>,

    #[arg(long, value_name = "SECONDS", help = "Per-call timeout in seconds")]
    pub timeout: Option<u64>,

    #[arg(long, value_name = "N", help = "Completion attempts per question")]
    pub retry_limit: Option<u32>,

    #[arg(long, help = "Disable the progress bar")]
    pub no_progress: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

fn parse_adapter_kind(s: &str) -> Result<AdapterKind, String> {
    crate::config::parse_provider(s).map_err(|e| e.to_string())
}
