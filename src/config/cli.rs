use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

use crate::domain::documents::ContentKind;

/// Command-line arguments for the edgesite binary.
#[derive(Debug, Parser)]
#[command(
    name = "edgesite",
    version,
    about = "Fetch, render and search corporate site content",
    arg_required_else_help = true
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "EDGESITE_CONFIG_FILE",
        value_name = "PATH",
        value_hint = ValueHint::FilePath
    )]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: SettingsOverrides,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Fetch one document and print it as an HTML article.
    Show(ShowArgs),
    /// List visible documents of one kind.
    List(ListArgs),
    /// Search visible events by title and description.
    Search(SearchArgs),
    /// Render a rich-text JSON file to HTML without contacting the backend.
    Render(RenderArgs),
}

#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    /// Content kind: event, service, profile or location.
    pub kind: ContentKind,

    /// Document identifier or legacy numeric identifier.
    pub id: String,
}

#[derive(Debug, Args, Clone)]
pub struct ListArgs {
    /// Content kind: event, service, profile or location.
    pub kind: ContentKind,

    /// Maximum number of documents to print.
    #[arg(long, value_name = "COUNT")]
    pub limit: Option<u32>,
}

#[derive(Debug, Args, Clone)]
pub struct SearchArgs {
    /// Query tokens; every token must match.
    #[arg(num_args = 0.., trailing_var_arg = true)]
    pub query: Vec<String>,
}

#[derive(Debug, Args, Clone)]
pub struct RenderArgs {
    /// JSON file holding blocks, a single block or a string.
    #[arg(value_hint = ValueHint::FilePath)]
    pub file: PathBuf,
}

/// Overrides accepted by every subcommand; they win over files and environment.
#[derive(Debug, Args, Default, Clone)]
pub struct SettingsOverrides {
    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,

    /// Override the GraphQL endpoint of the content backend.
    #[arg(long = "backend-endpoint", value_name = "URL", global = true)]
    pub backend_endpoint: Option<String>,

    /// Override the per-request backend timeout.
    #[arg(long = "backend-timeout-seconds", value_name = "SECONDS", global = true)]
    pub backend_timeout_seconds: Option<u64>,

    /// Override the timezone used to display dates.
    #[arg(long = "display-timezone", value_name = "TZ", global = true)]
    pub display_timezone: Option<String>,
}
