//! ulam — AI-assisted weekly dinner planner.
//!
//! A seven-day menu lives in memory for the duration of an interactive
//! session; meal suggestions, recipes, and grocery lists come from the
//! Gemini generative-text API and are rendered as HTML markup by a small
//! markdown-subset formatter.

pub mod cli;
pub mod config;
pub mod edit;
pub mod error;
pub mod format;
pub mod gemini;
pub mod logging;
pub mod menu;
pub mod prompt;
pub mod repl;
pub mod suggest;
