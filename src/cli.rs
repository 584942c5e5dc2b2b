use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// ulam — weekly dinner planner.
///
/// Interactive planner over a seven-day menu, with Gemini-backed meal
/// suggestions, recipes, and grocery lists rendered as HTML.
#[derive(Debug, Parser)]
#[command(name = "ulam", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start an interactive planning session.
    Plan(PlanArgs),

    /// Render Gemini-style markup from a file (or stdin) to HTML.
    Render(RenderArgs),
}

/// Arguments for the `plan` subcommand.
///
/// Every flag can also be set via config file or env vars (`ULAM_*`;
/// the API key additionally honors `GEMINI_API_KEY`).
/// Precedence: CLI > env > file.
#[derive(Debug, Clone, clap::Args)]
pub struct PlanArgs {
    /// Path to a TOML configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Gemini API key.
    #[arg(long)]
    pub api_key: Option<String>,

    /// Model name (default: "gemini-2.5-pro").
    #[arg(long)]
    pub model: Option<String>,

    /// Base URL of the generative-language API.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds (default: 30).
    #[arg(long)]
    pub timeout_sec: Option<u64>,

    /// Start from an empty menu instead of the built-in weekly one.
    #[arg(long, default_value_t = false)]
    pub no_seed: bool,

    /// Emphasis mode for rendered recipes: "bold" or "strip" (default: bold).
    #[arg(long)]
    pub recipe_emphasis: Option<String>,

    /// Emphasis mode for rendered grocery lists (default: strip).
    #[arg(long)]
    pub grocery_emphasis: Option<String>,

    /// Log level filter (default: "info"). Supports tracing directives
    /// (e.g. "debug", "ulam=trace,warn"). Overridden by ULAM_LOG env var.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to a log file. When set, structured JSON logs are appended here
    /// in addition to the human-readable stderr output.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Document shape for the `render` subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RenderMode {
    /// Categorized grocery list (category blocks, emphasis stripped).
    Grocery,
    /// Recipe (section-aware lists, emphasis bolded).
    Recipe,
}

/// Arguments for the `render` subcommand.
#[derive(Debug, Clone, clap::Args)]
pub struct RenderArgs {
    /// Document shape to render as.
    #[arg(long, value_enum)]
    pub mode: RenderMode,

    /// Override the mode's default emphasis handling: "bold" or "strip".
    #[arg(long)]
    pub emphasis: Option<String>,

    /// Input file; reads stdin when omitted.
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Output file; writes stdout when omitted.
    #[arg(long)]
    pub output: Option<PathBuf>,
}
