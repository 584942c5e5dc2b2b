use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::cli::PlanArgs;
use crate::error::UlamError;
use crate::format::Emphasis;
use crate::gemini;

// Precedence: CLI > env > file > defaults.

const DEFAULT_REQUEST_TIMEOUT_SEC: u64 = 30;
const DEFAULT_RECIPE_EMPHASIS: &str = "bold";
const DEFAULT_GROCERY_EMPHASIS: &str = "strip";

const ENV_PREFIX: &str = "ULAM_";

/// The key also honored without the `ULAM_` prefix, matching what the
/// Gemini tooling ecosystem already exports.
const FALLBACK_API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Resolved configuration for a planning session.
///
/// Built from three layers with precedence CLI > env > file > defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UlamConfig {
    /// Gemini API key. Optional here; requesting a suggestion without one
    /// fails with [`UlamError::MissingApiKey`].
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub request_timeout_sec: u64,
    /// When true (the default), a new session starts from the built-in
    /// Filipino weekly menu instead of an empty one.
    pub seed_menu: bool,
    /// Emphasis mode for rendered recipes: "bold" or "strip".
    pub recipe_emphasis: String,
    /// Emphasis mode for rendered grocery lists: "bold" or "strip".
    pub grocery_emphasis: String,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

/// TOML-deserializable config file representation. All fields optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
    request_timeout_sec: Option<u64>,
    seed_menu: Option<bool>,
    recipe_emphasis: Option<String>,
    grocery_emphasis: Option<String>,
    log_level: Option<String>,
    log_file: Option<PathBuf>,
}

/// Intermediate layer where every field is optional, used to merge sources.
#[derive(Debug, Default)]
struct ConfigLayer {
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
    request_timeout_sec: Option<u64>,
    seed_menu: Option<bool>,
    recipe_emphasis: Option<String>,
    grocery_emphasis: Option<String>,
    log_level: Option<String>,
    log_file: Option<PathBuf>,
}

impl UlamConfig {
    /// Load configuration with precedence: CLI > env > file > defaults.
    ///
    /// `config_path` — optional path to a TOML config file.
    /// `cli_args`    — values provided on the command line.
    pub fn load(config_path: Option<&Path>, cli_args: &PlanArgs) -> anyhow::Result<Self> {
        Self::load_with_env(config_path, cli_args, real_env_var)
    }

    /// Validate resolved values: timeout must be positive, the model name
    /// non-empty, and both emphasis modes one of "bold" / "strip".
    pub fn validate(&self) -> Result<(), UlamError> {
        if self.request_timeout_sec == 0 {
            return Err(UlamError::InvalidTimeout);
        }
        if self.model.trim().is_empty() {
            return Err(UlamError::EmptyModel);
        }
        Emphasis::from_str(&self.recipe_emphasis)?;
        Emphasis::from_str(&self.grocery_emphasis)?;
        Ok(())
    }

    /// Emphasis mode for recipe rendering. Call after [`validate`].
    pub fn recipe_emphasis_mode(&self) -> Result<Emphasis, UlamError> {
        Emphasis::from_str(&self.recipe_emphasis)
    }

    /// Emphasis mode for grocery rendering. Call after [`validate`].
    pub fn grocery_emphasis_mode(&self) -> Result<Emphasis, UlamError> {
        Emphasis::from_str(&self.grocery_emphasis)
    }

    /// Internal constructor that accepts an env-var lookup function,
    /// enabling deterministic testing without process-global mutation.
    fn load_with_env(
        config_path: Option<&Path>,
        cli_args: &PlanArgs,
        env_fn: fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let file_layer = match config_path {
            Some(path) => load_file_layer(path)?,
            None => ConfigLayer::default(),
        };
        let env_layer = load_env_layer(env_fn)?;
        let cli_layer = cli_layer_from(cli_args);

        let merged = merge_layers(file_layer, env_layer, cli_layer);

        Ok(UlamConfig {
            api_key: merged.api_key.filter(|k| !k.trim().is_empty()),
            model: merged
                .model
                .unwrap_or_else(|| gemini::DEFAULT_MODEL.to_owned()),
            base_url: merged
                .base_url
                .unwrap_or_else(|| gemini::DEFAULT_BASE_URL.to_owned()),
            request_timeout_sec: merged
                .request_timeout_sec
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SEC),
            seed_menu: merged.seed_menu.unwrap_or(true),
            recipe_emphasis: merged
                .recipe_emphasis
                .unwrap_or_else(|| DEFAULT_RECIPE_EMPHASIS.to_owned()),
            grocery_emphasis: merged
                .grocery_emphasis
                .unwrap_or_else(|| DEFAULT_GROCERY_EMPHASIS.to_owned()),
            log_level: merged.log_level,
            log_file: merged.log_file,
        })
    }
}

fn load_file_layer(path: &Path) -> anyhow::Result<ConfigLayer> {
    let contents = fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;
    let fc: FileConfig = toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("failed to parse config file {}: {e}", path.display()))?;
    Ok(ConfigLayer {
        api_key: fc.api_key,
        model: fc.model,
        base_url: fc.base_url,
        request_timeout_sec: fc.request_timeout_sec,
        seed_menu: fc.seed_menu,
        recipe_emphasis: fc.recipe_emphasis,
        grocery_emphasis: fc.grocery_emphasis,
        log_level: fc.log_level,
        log_file: fc.log_file,
    })
}

/// Look up a variable by its full name, dropping empty values.
fn real_env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

fn prefixed(env_fn: fn(&str) -> Option<String>, suffix: &str) -> Option<String> {
    env_fn(&format!("{ENV_PREFIX}{suffix}"))
}

fn load_env_layer(env_fn: fn(&str) -> Option<String>) -> Result<ConfigLayer, UlamError> {
    Ok(ConfigLayer {
        api_key: prefixed(env_fn, "API_KEY").or_else(|| env_fn(FALLBACK_API_KEY_VAR)),
        model: prefixed(env_fn, "MODEL"),
        base_url: prefixed(env_fn, "BASE_URL"),
        request_timeout_sec: parse_env_u64(env_fn, "REQUEST_TIMEOUT_SEC")?,
        seed_menu: parse_env_bool(env_fn, "SEED_MENU")?,
        recipe_emphasis: prefixed(env_fn, "RECIPE_EMPHASIS"),
        grocery_emphasis: prefixed(env_fn, "GROCERY_EMPHASIS"),
        log_level: prefixed(env_fn, "LOG_LEVEL"),
        log_file: prefixed(env_fn, "LOG_FILE").map(PathBuf::from),
    })
}

fn parse_env_u64(
    env_fn: fn(&str) -> Option<String>,
    suffix: &str,
) -> Result<Option<u64>, UlamError> {
    match prefixed(env_fn, suffix) {
        Some(s) => s
            .parse::<u64>()
            .map(Some)
            .map_err(|e| UlamError::ConfigEnvParseError {
                var: format!("{ENV_PREFIX}{suffix}"),
                detail: e.to_string(),
            }),
        None => Ok(None),
    }
}

fn parse_env_bool(
    env_fn: fn(&str) -> Option<String>,
    suffix: &str,
) -> Result<Option<bool>, UlamError> {
    match prefixed(env_fn, suffix) {
        Some(s) => s
            .parse::<bool>()
            .map(Some)
            .map_err(|e| UlamError::ConfigEnvParseError {
                var: format!("{ENV_PREFIX}{suffix}"),
                detail: e.to_string(),
            }),
        None => Ok(None),
    }
}

fn cli_layer_from(args: &PlanArgs) -> ConfigLayer {
    ConfigLayer {
        api_key: args.api_key.clone(),
        model: args.model.clone(),
        base_url: args.base_url.clone(),
        request_timeout_sec: args.timeout_sec,
        seed_menu: if args.no_seed { Some(false) } else { None },
        recipe_emphasis: args.recipe_emphasis.clone(),
        grocery_emphasis: args.grocery_emphasis.clone(),
        log_level: args.log_level.clone(),
        log_file: args.log_file.clone(),
    }
}

/// Merge three layers. For each field, pick CLI first, then env, then file.
fn merge_layers(file: ConfigLayer, env: ConfigLayer, cli: ConfigLayer) -> ConfigLayer {
    ConfigLayer {
        api_key: cli.api_key.or(env.api_key).or(file.api_key),
        model: cli.model.or(env.model).or(file.model),
        base_url: cli.base_url.or(env.base_url).or(file.base_url),
        request_timeout_sec: cli
            .request_timeout_sec
            .or(env.request_timeout_sec)
            .or(file.request_timeout_sec),
        seed_menu: cli.seed_menu.or(env.seed_menu).or(file.seed_menu),
        recipe_emphasis: cli
            .recipe_emphasis
            .or(env.recipe_emphasis)
            .or(file.recipe_emphasis),
        grocery_emphasis: cli
            .grocery_emphasis
            .or(env.grocery_emphasis)
            .or(file.grocery_emphasis),
        log_level: cli.log_level.or(env.log_level).or(file.log_level),
        log_file: cli.log_file.or(env.log_file).or(file.log_file),
    }
}
