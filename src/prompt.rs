//! Centralized prompt construction for all Gemini calls.
//!
//! Every prompt and system instruction sent to the generator is built here
//! so there is exactly one place to review and test the strings that reach
//! the model. The templates are deterministic: identical menu state yields
//! identical prompts.

use crate::menu::MealEntry;

/// Persona for the two meal-name suggestion operations.
pub const MEAL_PLANNER_PERSONA: &str = "Act as a creative Filipino meal planner.";

/// Persona for recipe fetches.
pub const CHEF_PERSONA: &str = "Be a professional concise chef.";

/// Persona for grocery-list generation.
pub const GROCERY_PERSONA: &str = "Produce a categorized grocery list in Markdown. \
     Put a quantity  for each items for 1 serving.";

/// Prompt for replacing one day's meal with a fresh suggestion.
pub fn suggest_for_day(day: &str) -> String {
    format!("Suggest a healthy, easy dinner idea for {day}. Only meal name.")
}

/// Prompt for suggesting a meal name for the add-meal form.
pub fn suggest_new_meal() -> &'static str {
    "Suggest one healthy dinner idea. Only meal name."
}

/// Prompt for fetching a recipe for a named meal.
pub fn recipe(meal_name: &str) -> String {
    format!(
        "Provide ingredients and preparation steps for {meal_name}. \
         Markdown headings: Ingredients, Preparation."
    )
}

/// Prompt for generating a grocery list from the whole menu.
///
/// Entries are serialized one per line in *store* order, not weekly-sorted
/// order (preserved observed behavior).
pub fn grocery_list(entries: &[MealEntry]) -> String {
    let menu_text = entries
        .iter()
        .map(|e| format!("{}: {}", e.day, e.meal))
        .collect::<Vec<_>>()
        .join("\n");
    format!("Make a grocery list grouped by category from:\n{menu_text}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u32, day: &str, meal: &str) -> MealEntry {
        MealEntry {
            id,
            day: day.to_owned(),
            meal: meal.to_owned(),
        }
    }

    #[test]
    fn suggest_for_day_interpolates_the_day() {
        let prompt = suggest_for_day("Tuesday");
        assert_eq!(
            prompt,
            "Suggest a healthy, easy dinner idea for Tuesday. Only meal name."
        );
    }

    #[test]
    fn suggest_new_meal_is_fixed() {
        assert_eq!(suggest_new_meal(), "Suggest one healthy dinner idea. Only meal name.");
    }

    #[test]
    fn recipe_interpolates_the_meal_name() {
        let prompt = recipe("Chicken Adobo");
        assert!(
            prompt.starts_with("Provide ingredients and preparation steps for Chicken Adobo."),
            "got: {prompt}"
        );
        assert!(
            prompt.ends_with("Markdown headings: Ingredients, Preparation."),
            "got: {prompt}"
        );
    }

    #[test]
    fn grocery_list_serializes_store_order() {
        let entries = vec![
            entry(3, "Wednesday", "Bicol Express"),
            entry(1, "Sunday", "Pork Sinigang"),
        ];
        let prompt = grocery_list(&entries);
        assert_eq!(
            prompt,
            "Make a grocery list grouped by category from:\n\
             Wednesday: Bicol Express\n\
             Sunday: Pork Sinigang",
            "store order must be preserved, not weekly order"
        );
    }

    #[test]
    fn grocery_list_handles_empty_menu() {
        let prompt = grocery_list(&[]);
        assert_eq!(prompt, "Make a grocery list grouped by category from:\n");
    }

    #[test]
    fn personas_are_distinct_per_operation() {
        assert_ne!(MEAL_PLANNER_PERSONA, CHEF_PERSONA);
        assert_ne!(CHEF_PERSONA, GROCERY_PERSONA);
        assert!(GROCERY_PERSONA.contains("1 serving"));
    }
}
