pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{CliArgs, Commands, GenerateArgs, HealthArgs, PagesCommand, SearchArgs};
pub use output::{OutputFormat, OutputFormatter};
