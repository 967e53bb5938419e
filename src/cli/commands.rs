use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::pipeline::GenerationStrategy;

/// AI-powered landing page generator for local businesses
#[derive(Parser, Debug)]
#[command(
    name = "pageforge",
    about = "AI-powered landing page generator for local businesses",
    version,
    author,
    long_about = "pageforge turns structured business data into a complete landing page \
                  (HTML, theme, layout and marketing copy) through a staged LLM pipeline. \
                  Business data can be supplied directly, loaded from a JSON file, or \
                  pulled from a place search."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Verbose output (debug logging)")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Generate a landing page for a business",
        long_about = "Runs the generation pipeline for a business described either by flags \
                      or by a JSON file.\n\n\
                      Examples:\n  \
                      pageforge generate --name \"Delicious Pizza Place\" --category Restaurant \\\n    \
                      --address \"123 Main St\" --phone \"+1 (555) 123-4567\"\n  \
                      pageforge generate --input business.json --strategy fast\n  \
                      pageforge generate --input business.json --output page.html --save"
    )]
    Generate(GenerateArgs),

    #[command(
        about = "Search for a business via the place API",
        long_about = "Searches the configured place endpoint and lists matching businesses.\n\n\
                      Examples:\n  \
                      pageforge search \"pizza downtown\"\n  \
                      pageforge search \"pizza downtown\" --format json"
    )]
    Search(SearchArgs),

    #[command(subcommand, about = "Manage stored pages")]
    Pages(PagesCommand),

    #[command(about = "Check completion endpoint availability")]
    Health(HealthArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(
        short = 'i',
        long,
        value_name = "FILE",
        help = "JSON file with the business data",
        conflicts_with = "name"
    )]
    pub input: Option<PathBuf>,

    #[arg(long, value_name = "NAME", help = "Business name")]
    pub name: Option<String>,

    #[arg(long, value_name = "CATEGORY", help = "Business category, e.g. Restaurant")]
    pub category: Option<String>,

    #[arg(long, value_name = "ADDRESS", help = "Street address")]
    pub address: Option<String>,

    #[arg(long, value_name = "PHONE", help = "Contact phone number")]
    pub phone: Option<String>,

    #[arg(long, value_name = "TEXT", help = "Short business description")]
    pub description: Option<String>,

    #[arg(
        short = 's',
        long,
        value_enum,
        default_value = "thorough",
        help = "Generation strategy"
    )]
    pub strategy: StrategyArg,

    #[arg(
        short = 'r',
        long,
        value_name = "TEXT",
        help = "Free-form requirements passed to the analysis stage"
    )]
    pub requirements: Option<String>,

    #[arg(long, help = "Skip the critique refinement passes")]
    pub no_critique: bool,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write the HTML document to a file instead of stdout"
    )]
    pub output: Option<PathBuf>,

    #[arg(long, help = "Persist the generated page in the page store")]
    pub save: bool,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    #[arg(value_name = "QUERY", help = "Free-text search query")]
    pub query: String,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Subcommand, Debug)]
pub enum PagesCommand {
    #[command(about = "List stored pages")]
    List {
        #[arg(short = 'f', long, value_enum, default_value = "human")]
        format: OutputFormatArg,
    },

    #[command(about = "Show one stored page")]
    Show {
        #[arg(value_name = "ID")]
        id: String,

        #[arg(long, help = "Print only the HTML document")]
        html_only: bool,

        #[arg(short = 'f', long, value_enum, default_value = "human")]
        format: OutputFormatArg,
    },

    #[command(about = "Delete a stored page")]
    Delete {
        #[arg(value_name = "ID")]
        id: String,
    },
}

#[derive(Parser, Debug, Clone)]
pub struct HealthArgs {
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
pub enum StrategyArg {
    Thorough,
    Fast,
}

impl From<StrategyArg> for GenerationStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Thorough => GenerationStrategy::Thorough,
            StrategyArg::Fast => GenerationStrategy::Fast,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}
