//! Interactive planning session.
//!
//! Line-oriented command loop over the menu, the edit session, and the
//! suggestion operations. Generic over the input/output streams and the
//! generator so the whole session is testable with scripted I/O.

use std::io::{BufRead, Write};

use chrono::{Datelike, Local, Weekday};
use tracing::debug;

use crate::edit::EditSession;
use crate::format::{self, FormatOptions};
use crate::gemini::TextGenerator;
use crate::menu::{self, DAYS};
use crate::suggest::Planner;

/// Rendering modes for the two generated-document shapes, resolved from
/// configuration before the session starts.
#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub recipe_format: FormatOptions,
    pub grocery_format: FormatOptions,
}

/// One parsed REPL command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Show,
    Add { day: String, meal: Option<String> },
    Edit { id: u32 },
    Draft { text: String },
    Save,
    Cancel,
    Remove { id: u32 },
    Suggest { id: Option<u32> },
    New,
    Recipe { id: u32 },
    CloseRecipe,
    Grocery,
    Quit,
}

const HELP_TEXT: &str = "\
Commands:
  show                 weekly menu
  add <day> [meal]     add a meal (omit meal to use the pending suggestion)
  edit <id>            start editing an entry
  draft <text>         replace the edit draft
  save / cancel        end the edit session
  remove <id>          delete an entry
  suggest [id]         AI suggestion for an entry (default: today's first)
  new                  AI suggestion for the add-meal field
  recipe <id>          fetch and render a recipe
  close                dismiss the recipe view
  grocery              generate and render a grocery list
  quit                 end the session";

/// Parse one input line. `Ok(None)` for blank lines; `Err` carries the
/// message to show the user.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "help" => Command::Help,
        "show" | "list" => Command::Show,
        "add" => {
            let day = words
                .next()
                .ok_or_else(|| "usage: add <day> [meal]".to_owned())?;
            let day = menu::parse_day(day).map_err(|e| e.to_string())?;
            let meal = {
                let text = words.collect::<Vec<_>>().join(" ");
                if text.is_empty() { None } else { Some(text) }
            };
            Command::Add {
                day: day.to_owned(),
                meal,
            }
        }
        "edit" => Command::Edit {
            id: parse_id(words.next(), "edit")?,
        },
        "draft" => Command::Draft {
            text: words.collect::<Vec<_>>().join(" "),
        },
        "save" => Command::Save,
        "cancel" => Command::Cancel,
        "remove" | "delete" => Command::Remove {
            id: parse_id(words.next(), "remove")?,
        },
        "suggest" => {
            let id = match words.next() {
                Some(word) => Some(
                    word.parse::<u32>()
                        .map_err(|_| format!("not an entry id: {word}"))?,
                ),
                None => None,
            };
            Command::Suggest { id }
        }
        "new" => Command::New,
        "recipe" => Command::Recipe {
            id: parse_id(words.next(), "recipe")?,
        },
        "close" => Command::CloseRecipe,
        "grocery" => Command::Grocery,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command '{other}' (try 'help')")),
    };
    Ok(Some(command))
}

fn parse_id(word: Option<&str>, verb: &str) -> Result<u32, String> {
    let word = word.ok_or_else(|| format!("usage: {verb} <id>"))?;
    word.parse::<u32>()
        .map_err(|_| format!("not an entry id: {word}"))
}

/// Canonical name of today's weekday, for the no-argument `suggest` form.
pub fn today_day_name() -> &'static str {
    match Local::now().weekday() {
        Weekday::Sun => DAYS[0],
        Weekday::Mon => DAYS[1],
        Weekday::Tue => DAYS[2],
        Weekday::Wed => DAYS[3],
        Weekday::Thu => DAYS[4],
        Weekday::Fri => DAYS[5],
        Weekday::Sat => DAYS[6],
    }
}

/// Run the session until `quit` or end of input.
pub fn run<G, R, W>(
    planner: &mut Planner<G>,
    opts: &SessionOptions,
    input: R,
    mut out: W,
) -> std::io::Result<()>
where
    G: TextGenerator,
    R: BufRead,
    W: Write,
{
    let mut edit = EditSession::new();

    writeln!(
        out,
        "ulam — weekly dinner planner. Today is {}. Type 'help' for commands.",
        today_day_name()
    )?;

    for line in input.lines() {
        let line = line?;
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(msg) => {
                writeln!(out, "{msg}")?;
                continue;
            }
        };
        debug!(?command, "dispatching");

        match command {
            Command::Help => writeln!(out, "{HELP_TEXT}")?,
            Command::Show => show_menu(planner, &edit, &mut out)?,
            Command::Add { day, meal } => {
                let (meal, from_suggestion) = match meal {
                    Some(meal) => (meal, false),
                    None => match planner.pending_meal_name() {
                        Some(name) => (name.to_owned(), true),
                        None => {
                            writeln!(out, "no pending suggestion; use: add <day> <meal>")?;
                            continue;
                        }
                    },
                };
                match planner.menu.add(&day, &meal) {
                    Some(id) => {
                        if from_suggestion {
                            planner.clear_pending_meal_name();
                        }
                        writeln!(out, "added [{id}] {day}: {meal}")?;
                    }
                    None => writeln!(out, "meal name must not be blank")?,
                }
            }
            Command::Edit { id } => match planner.menu.get(id) {
                Some(entry) => {
                    edit.start(entry);
                    writeln!(out, "editing [{id}]; draft: {}", entry.meal)?;
                }
                None => writeln!(out, "no entry [{id}]")?,
            },
            Command::Draft { text } => {
                if edit.editing_id().is_some() {
                    edit.set_draft(&text);
                } else {
                    writeln!(out, "nothing being edited (use: edit <id>)")?;
                }
            }
            Command::Save => match edit.save(&mut planner.menu) {
                Some(id) => writeln!(out, "saved [{id}]")?,
                None => writeln!(out, "nothing being edited")?,
            },
            Command::Cancel => {
                edit.cancel();
                writeln!(out, "edit cancelled")?;
            }
            Command::Remove { id } => {
                planner.menu.remove(id);
                writeln!(out, "removed [{id}]")?;
            }
            Command::Suggest { id } => {
                let target = id.or_else(|| first_entry_for_today(planner));
                match target {
                    Some(id) => match planner.suggest_meal_for(id) {
                        Some(name) => writeln!(out, "[{id}] is now: {name}")?,
                        None => writeln!(out, "no suggestion received")?,
                    },
                    None => writeln!(out, "no entry for {} to suggest for", today_day_name())?,
                }
            }
            Command::New => match planner.suggest_new_meal() {
                Some(name) => writeln!(out, "suggested: {name} (place it with: add <day>)")?,
                None => writeln!(out, "no suggestion received")?,
            },
            Command::Recipe { id } => {
                if planner.menu.get(id).is_none() {
                    writeln!(out, "no entry [{id}]")?;
                } else if planner.fetch_recipe(id) {
                    let recipe = planner.recipe().expect("recipe set on success");
                    writeln!(out, "Recipe: {}", recipe.title)?;
                    writeln!(
                        out,
                        "{}",
                        format::format_markup(&recipe.content, &opts.recipe_format)
                    )?;
                } else if let Some(msg) = planner.recipe_error() {
                    writeln!(out, "Error: {msg}")?;
                }
            }
            Command::CloseRecipe => {
                planner.close_recipe();
                writeln!(out, "recipe closed")?;
            }
            Command::Grocery => {
                if planner.generate_grocery_list() {
                    let list = planner.grocery_list().expect("list set on success");
                    writeln!(out, "{}", format::format_markup(list, &opts.grocery_format))?;
                } else {
                    writeln!(out, "no grocery list generated")?;
                }
            }
            Command::Quit => break,
        }
    }

    Ok(())
}

fn show_menu<G: TextGenerator, W: Write>(
    planner: &Planner<G>,
    edit: &EditSession,
    out: &mut W,
) -> std::io::Result<()> {
    if planner.menu.is_empty() {
        writeln!(out, "(menu is empty)")?;
        return Ok(());
    }
    for entry in planner.menu.weekly_view() {
        let marker = if edit.editing_id() == Some(entry.id) {
            " (editing)"
        } else {
            ""
        };
        writeln!(out, "{:<9} [{}] {}{}", entry.day, entry.id, entry.meal, marker)?;
    }
    Ok(())
}

fn first_entry_for_today<G: TextGenerator>(planner: &Planner<G>) -> Option<u32> {
    let today = today_day_name();
    planner
        .menu
        .entries()
        .iter()
        .find(|e| e.day == today)
        .map(|e| e.id)
}
