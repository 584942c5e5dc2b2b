//! Suggestion orchestration against the text-generation capability.
//!
//! Each of the four operation kinds follows the same protocol: mark the
//! kind's in-flight indicator, invoke the generator with its prompt
//! template, apply the kind's single effect on success, degrade silently on
//! failure (recipe fetch alone surfaces the message), then clear the
//! indicator.
//!
//! Overlapping requests of one kind are not serialized: each `begin_*`
//! issues a generation token, the marker tracks only the newest token, and a
//! completion clears the marker only when its token is still the tracked
//! one. Effects always apply on completion regardless of token age, so the
//! last-applied response wins. This makes the original's implicit
//! last-write-wins behavior an explicit, testable policy.

use std::time::Instant;

use tracing::{info, warn};

use crate::error::UlamError;
use crate::gemini::TextGenerator;
use crate::menu::MenuStore;
use crate::prompt;

/// A fetched recipe, shown until the next fetch or an explicit close.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeResult {
    /// Meal name captured at request time; a mid-flight menu edit does not
    /// retitle the result.
    pub title: String,
    /// Raw generated text; rendering happens in [`crate::format`].
    pub content: String,
}

/// Fallback shown when a recipe fetch fails without a usable message.
const NO_RECIPE_MESSAGE: &str = "No recipe generated.";

/// Completion token for one issued request of one operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    token: u64,
    entry_id: Option<u32>,
}

/// Recipe tickets additionally carry the title captured at request time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeTicket {
    ticket: Ticket,
    title: String,
}

/// One operation kind's in-flight indicator: the newest issued token plus
/// the entry it targets (for the per-entry kinds). Gates UI affordances
/// only; it is not a mutual-exclusion mechanism.
#[derive(Debug, Default)]
struct InFlight {
    last_token: u64,
    current: Option<(u64, Option<u32>)>,
}

impl InFlight {
    fn begin(&mut self, entry_id: Option<u32>) -> Ticket {
        self.last_token += 1;
        self.current = Some((self.last_token, entry_id));
        Ticket {
            token: self.last_token,
            entry_id,
        }
    }

    /// Clear the indicator unless a newer request has overwritten it.
    fn clear(&mut self, token: u64) {
        if matches!(self.current, Some((t, _)) if t == token) {
            self.current = None;
        }
    }

    fn pending_entry(&self) -> Option<u32> {
        self.current.and_then(|(_, id)| id)
    }

    fn is_pending(&self) -> bool {
        self.current.is_some()
    }
}

/// Owns the menu, the result slots, and the in-flight markers; drives the
/// generator for all four operation kinds.
#[derive(Debug)]
pub struct Planner<G> {
    generator: G,
    pub menu: MenuStore,
    day_marker: InFlight,
    new_meal_marker: InFlight,
    recipe_marker: InFlight,
    grocery_marker: InFlight,
    recipe: Option<RecipeResult>,
    recipe_error: Option<String>,
    grocery_list: Option<String>,
    pending_meal_name: Option<String>,
}

impl<G: TextGenerator> Planner<G> {
    pub fn new(generator: G, menu: MenuStore) -> Self {
        Self {
            generator,
            menu,
            day_marker: InFlight::default(),
            new_meal_marker: InFlight::default(),
            recipe_marker: InFlight::default(),
            grocery_marker: InFlight::default(),
            recipe: None,
            recipe_error: None,
            grocery_list: None,
            pending_meal_name: None,
        }
    }

    // -- Per-day suggestion --

    /// Replace `entry_id`'s meal with a fresh suggestion. Returns the
    /// applied name, or `None` when the entry is unknown or generation
    /// failed (silent degrade).
    pub fn suggest_meal_for(&mut self, entry_id: u32) -> Option<String> {
        let Some(entry) = self.menu.get(entry_id) else {
            warn!(entry_id, "per-day suggestion for unknown entry skipped");
            return None;
        };
        let day = entry.day.clone();

        let ticket = self.begin_day_suggestion(entry_id);
        let start = Instant::now();
        let result = self
            .generator
            .generate(&prompt::suggest_for_day(&day), prompt::MEAL_PLANNER_PERSONA);
        info!(
            entry_id,
            day = %day,
            duration_ms = start.elapsed().as_millis() as u64,
            ok = result.is_ok(),
            "per-day suggestion complete"
        );
        self.finish_day_suggestion(ticket, result)
    }

    pub fn begin_day_suggestion(&mut self, entry_id: u32) -> Ticket {
        self.day_marker.begin(Some(entry_id))
    }

    /// Apply a per-day completion. The effect targets the ticket's entry,
    /// which may have been deleted mid-flight (store-level no-op).
    pub fn finish_day_suggestion(
        &mut self,
        ticket: Ticket,
        result: Result<String, UlamError>,
    ) -> Option<String> {
        let applied = meal_name_of(result).inspect(|name| {
            if let Some(id) = ticket.entry_id {
                self.menu.update(id, name);
            }
        });
        self.day_marker.clear(ticket.token);
        applied
    }

    // -- New-meal suggestion --

    /// Fill the add-meal field with a suggested name. Silent on failure.
    pub fn suggest_new_meal(&mut self) -> Option<String> {
        let ticket = self.begin_new_meal_suggestion();
        let start = Instant::now();
        let result = self
            .generator
            .generate(prompt::suggest_new_meal(), prompt::MEAL_PLANNER_PERSONA);
        info!(
            duration_ms = start.elapsed().as_millis() as u64,
            ok = result.is_ok(),
            "new-meal suggestion complete"
        );
        self.finish_new_meal_suggestion(ticket, result)
    }

    pub fn begin_new_meal_suggestion(&mut self) -> Ticket {
        self.new_meal_marker.begin(None)
    }

    pub fn finish_new_meal_suggestion(
        &mut self,
        ticket: Ticket,
        result: Result<String, UlamError>,
    ) -> Option<String> {
        let applied = meal_name_of(result);
        if let Some(name) = &applied {
            self.pending_meal_name = Some(name.clone());
        }
        self.new_meal_marker.clear(ticket.token);
        applied
    }

    // -- Recipe fetch --

    /// Fetch a recipe for `entry_id`'s meal. On failure the error slot is
    /// populated and any prior result cleared; this is the only operation
    /// that surfaces a message.
    pub fn fetch_recipe(&mut self, entry_id: u32) -> bool {
        let Some(entry) = self.menu.get(entry_id) else {
            warn!(entry_id, "recipe fetch for unknown entry skipped");
            return false;
        };
        let title = entry.meal.clone();

        let ticket = self.begin_recipe(entry_id, &title);
        let start = Instant::now();
        let result = self
            .generator
            .generate(&prompt::recipe(&title), prompt::CHEF_PERSONA);
        info!(
            entry_id,
            title = %title,
            duration_ms = start.elapsed().as_millis() as u64,
            ok = result.is_ok(),
            "recipe fetch complete"
        );
        self.finish_recipe(ticket, result)
    }

    pub fn begin_recipe(&mut self, entry_id: u32, title: &str) -> RecipeTicket {
        RecipeTicket {
            ticket: self.recipe_marker.begin(Some(entry_id)),
            title: title.to_owned(),
        }
    }

    pub fn finish_recipe(
        &mut self,
        ticket: RecipeTicket,
        result: Result<String, UlamError>,
    ) -> bool {
        let ok = match result {
            Ok(content) if !content.is_empty() => {
                self.recipe = Some(RecipeResult {
                    title: ticket.title,
                    content,
                });
                self.recipe_error = None;
                true
            }
            Ok(_) => {
                self.recipe = None;
                self.recipe_error = Some(NO_RECIPE_MESSAGE.to_owned());
                false
            }
            Err(e) => {
                self.recipe = None;
                self.recipe_error = Some(e.to_string());
                false
            }
        };
        self.recipe_marker.clear(ticket.ticket.token);
        ok
    }

    /// Dismiss the recipe view, clearing both the result and the error.
    pub fn close_recipe(&mut self) {
        self.recipe = None;
        self.recipe_error = None;
    }

    // -- Grocery list --

    /// Generate a grocery list from the whole menu (store order). A failure
    /// keeps any previously generated list.
    pub fn generate_grocery_list(&mut self) -> bool {
        let ticket = self.begin_grocery_list();
        let request = prompt::grocery_list(self.menu.entries());
        let start = Instant::now();
        let result = self.generator.generate(&request, prompt::GROCERY_PERSONA);
        info!(
            entry_count = self.menu.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            ok = result.is_ok(),
            "grocery list generation complete"
        );
        self.finish_grocery_list(ticket, result)
    }

    pub fn begin_grocery_list(&mut self) -> Ticket {
        self.grocery_marker.begin(None)
    }

    pub fn finish_grocery_list(
        &mut self,
        ticket: Ticket,
        result: Result<String, UlamError>,
    ) -> bool {
        let ok = match result {
            Ok(list) if !list.is_empty() => {
                self.grocery_list = Some(list);
                true
            }
            _ => false,
        };
        self.grocery_marker.clear(ticket.token);
        ok
    }

    // -- State accessors --

    pub fn recipe(&self) -> Option<&RecipeResult> {
        self.recipe.as_ref()
    }

    pub fn recipe_error(&self) -> Option<&str> {
        self.recipe_error.as_deref()
    }

    pub fn grocery_list(&self) -> Option<&str> {
        self.grocery_list.as_deref()
    }

    /// Suggested name waiting in the add-meal field.
    pub fn pending_meal_name(&self) -> Option<&str> {
        self.pending_meal_name.as_deref()
    }

    pub fn clear_pending_meal_name(&mut self) {
        self.pending_meal_name = None;
    }

    pub fn day_suggestion_pending(&self) -> Option<u32> {
        self.day_marker.pending_entry()
    }

    pub fn recipe_pending(&self) -> Option<u32> {
        self.recipe_marker.pending_entry()
    }

    pub fn new_meal_pending(&self) -> bool {
        self.new_meal_marker.is_pending()
    }

    pub fn grocery_pending(&self) -> bool {
        self.grocery_marker.is_pending()
    }
}

/// Meal names are single-line: trim the reply and treat whitespace-only
/// output like empty output (no effect).
fn meal_name_of(result: Result<String, UlamError>) -> Option<String> {
    result
        .ok()
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}
