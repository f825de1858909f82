pub mod commands;
pub mod output;

pub use commands::{CliArgs, Commands, ConfigArgs, OutputFormatArg, RunArgs};
pub use output::{OutputFormat, OutputFormatter};
