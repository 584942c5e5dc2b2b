use std::fs;
use std::io::{Read, Write};
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};

use ulam::cli::{Cli, Commands, RenderArgs, RenderMode};
use ulam::config::UlamConfig;
use ulam::error::UlamError;
use ulam::format::{self, FormatOptions};
use ulam::gemini::GeminiClient;
use ulam::menu::MenuStore;
use ulam::repl::{self, SessionOptions};
use ulam::suggest::Planner;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Plan(args) => {
            let config_path = args.config.clone();
            let config = UlamConfig::load(config_path.as_deref(), &args)?;

            ulam::logging::init(config.log_level.as_deref(), config.log_file.as_deref())?;

            config.validate()?;

            let api_key = config.api_key.as_deref().ok_or(UlamError::MissingApiKey)?;
            let client = GeminiClient::new(
                api_key,
                &config.model,
                &config.base_url,
                Duration::from_secs(config.request_timeout_sec),
            )?;

            info!(
                model = %config.model,
                base_url = %config.base_url,
                timeout_sec = config.request_timeout_sec,
                seed_menu = config.seed_menu,
                "config loaded"
            );

            let menu = if config.seed_menu {
                MenuStore::seeded()
            } else {
                MenuStore::new()
            };
            let mut planner = Planner::new(client, menu);

            let opts = SessionOptions {
                recipe_format: FormatOptions::recipe()
                    .with_emphasis(config.recipe_emphasis_mode()?),
                grocery_format: FormatOptions::grocery()
                    .with_emphasis(config.grocery_emphasis_mode()?),
            };

            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            repl::run(&mut planner, &opts, stdin.lock(), stdout.lock())?;
            Ok(())
        }
        Commands::Render(args) => render(&args),
    }
}

fn render(args: &RenderArgs) -> anyhow::Result<()> {
    let opts = render_options(args)?;

    let input = match &args.input {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let html = format::format_markup(&input, &opts);

    match &args.output {
        Some(path) => fs::write(path, html.as_bytes())
            .map_err(|e| anyhow::anyhow!("failed to write {}: {e}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(html.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

/// Resolve the render mode's preset, applying the `--emphasis` override.
fn render_options(args: &RenderArgs) -> Result<FormatOptions, UlamError> {
    let mut opts = match args.mode {
        RenderMode::Grocery => FormatOptions::grocery(),
        RenderMode::Recipe => FormatOptions::recipe(),
    };
    if let Some(emphasis) = &args.emphasis {
        opts = opts.with_emphasis(emphasis.parse()?);
    }
    Ok(opts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ulam::format::Emphasis;

    #[test]
    fn plan_without_api_key_fails_before_the_session_starts() {
        let cli = Cli::try_parse_from(["ulam", "plan", "--api-key", ""]).unwrap();

        let result = run(cli);
        let err_msg = format!("{}", result.unwrap_err());
        assert!(
            err_msg.contains("API key"),
            "expected missing-key error, got: {err_msg}"
        );
    }

    #[test]
    fn plan_rejects_zero_timeout() {
        let cli =
            Cli::try_parse_from(["ulam", "plan", "--api-key", "k", "--timeout-sec", "0"]).unwrap();

        let result = run(cli);
        let err_msg = format!("{}", result.unwrap_err());
        assert!(
            err_msg.contains("timeout"),
            "expected timeout error, got: {err_msg}"
        );
    }

    #[test]
    fn plan_rejects_unknown_emphasis_mode() {
        let cli = Cli::try_parse_from([
            "ulam",
            "plan",
            "--api-key",
            "k",
            "--recipe-emphasis",
            "shouty",
        ])
        .unwrap();

        let result = run(cli);
        let err_msg = format!("{}", result.unwrap_err());
        assert!(
            err_msg.contains("shouty"),
            "expected emphasis error, got: {err_msg}"
        );
    }

    #[test]
    fn render_options_apply_mode_presets() {
        let args = RenderArgs {
            mode: RenderMode::Grocery,
            emphasis: None,
            input: None,
            output: None,
        };
        let opts = render_options(&args).unwrap();
        assert!(opts.category_blocks);
        assert_eq!(opts.emphasis, Emphasis::Strip);
    }

    #[test]
    fn render_options_honor_emphasis_override() {
        let args = RenderArgs {
            mode: RenderMode::Recipe,
            emphasis: Some("strip".to_owned()),
            input: None,
            output: None,
        };
        let opts = render_options(&args).unwrap();
        assert!(opts.section_aware);
        assert_eq!(opts.emphasis, Emphasis::Strip);
    }

    #[test]
    fn render_reads_and_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("list.md");
        let output = dir.path().join("list.html");
        fs::write(&input, "## Produce\n- Apples\n").unwrap();

        let cli = Cli::try_parse_from([
            "ulam",
            "render",
            "--mode",
            "grocery",
            "--input",
            input.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ])
        .unwrap();

        run(cli).expect("render should succeed");
        let html = fs::read_to_string(&output).unwrap();
        assert_eq!(
            html,
            "<div class=\"grocery-category\"><h3>Produce</h3>\
             <ul class=\"grocery-items\"><li>Apples</li></ul></div>"
        );
    }

    #[test]
    fn render_rejects_missing_input_file() {
        let cli = Cli::try_parse_from([
            "ulam",
            "render",
            "--mode",
            "recipe",
            "--input",
            "/no/such/input.md",
        ])
        .unwrap();

        let result = run(cli);
        let err_msg = format!("{}", result.unwrap_err());
        assert!(
            err_msg.contains("failed to read"),
            "expected read error, got: {err_msg}"
        );
    }
}
