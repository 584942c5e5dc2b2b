use crate::error::UlamError;

/// Canonical weekday order for the weekly view, Sunday first.
pub const DAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Sort key for the weekly view. Unknown day names sort after the seven
/// known days; they cannot occur through the CLI, which validates on entry.
pub fn day_index(day: &str) -> usize {
    DAYS.iter().position(|d| *d == day).unwrap_or(DAYS.len())
}

/// Resolve a user-typed day name to its canonical spelling,
/// case-insensitively. Returns `UlamError::InvalidDay` for anything that is
/// not one of the seven weekday names.
pub fn parse_day(input: &str) -> Result<&'static str, UlamError> {
    let wanted = input.trim();
    DAYS.iter()
        .find(|d| d.eq_ignore_ascii_case(wanted))
        .copied()
        .ok_or_else(|| UlamError::InvalidDay {
            value: input.to_owned(),
        })
}

/// One meal assigned to one weekday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealEntry {
    /// Unique, monotonically assigned; never reused after removal.
    pub id: u32,
    pub day: String,
    pub meal: String,
}

/// The ordered menu. Insertion order is preserved internally; the weekly
/// view is a derived projection and never mutates the stored order.
#[derive(Debug, Clone, Default)]
pub struct MenuStore {
    entries: Vec<MealEntry>,
    next_id: u32,
}

impl MenuStore {
    /// An empty menu; the first added entry gets id 1.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    /// The seven-dish starter menu, one dinner per day, ids 1 through 7.
    pub fn seeded() -> Self {
        let dishes = [
            "Pork Sinigang",
            "Chicken Adobo",
            "Bicol Express",
            "Paksiw na Bangus",
            "Crispy Pata",
            "Menudo",
            "Beef Caldereta",
        ];
        let entries = DAYS
            .iter()
            .zip(dishes)
            .enumerate()
            .map(|(i, (day, meal))| MealEntry {
                id: i as u32 + 1,
                day: (*day).to_owned(),
                meal: meal.to_owned(),
            })
            .collect();
        Self {
            entries,
            next_id: dishes.len() as u32 + 1,
        }
    }

    /// Append a new entry for `day`. A blank (empty after trim) meal name is
    /// a silent no-op. Duplicate days are allowed. Returns the new entry's
    /// id when one was created.
    pub fn add(&mut self, day: &str, meal: &str) -> Option<u32> {
        let meal = meal.trim();
        if meal.is_empty() {
            return None;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(MealEntry {
            id,
            day: day.to_owned(),
            meal: meal.to_owned(),
        });
        Some(id)
    }

    /// Replace the meal text of the entry with `id`, leaving day and id
    /// unchanged. No-op when the id is not present.
    pub fn update(&mut self, id: u32, meal: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) {
            entry.meal = meal.to_owned();
        }
    }

    /// Remove the entry with `id`. No-op when the id is not present.
    pub fn remove(&mut self, id: u32) {
        self.entries.retain(|e| e.id != id);
    }

    /// Look up an entry by id.
    pub fn get(&self, id: u32) -> Option<&MealEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Entries in store (insertion) order. The grocery-list prompt
    /// serializes this order, not the weekly order.
    pub fn entries(&self) -> &[MealEntry] {
        &self.entries
    }

    /// Entries stable-sorted into canonical weekday order. Entries sharing
    /// a day keep their relative store order.
    pub fn weekly_view(&self) -> Vec<MealEntry> {
        let mut view = self.entries.clone();
        view.sort_by_key(|e| day_index(&e.day));
        view
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_menu_covers_the_week_in_order() {
        let store = MenuStore::seeded();
        assert_eq!(store.len(), 7);
        let days: Vec<&str> = store.entries().iter().map(|e| e.day.as_str()).collect();
        assert_eq!(days, DAYS.to_vec());
        assert_eq!(store.get(1).unwrap().meal, "Pork Sinigang");
        assert_eq!(store.get(7).unwrap().meal, "Beef Caldereta");
    }

    #[test]
    fn add_assigns_monotone_ids_above_seed() {
        let mut store = MenuStore::seeded();
        let first = store.add("Monday", "Lumpia").unwrap();
        let second = store.add("Monday", "Pancit").unwrap();
        assert_eq!(first, 8);
        assert_eq!(second, 9);
    }

    #[test]
    fn add_trims_meal_name() {
        let mut store = MenuStore::new();
        let id = store.add("Friday", "  Kare-Kare  ").unwrap();
        assert_eq!(store.get(id).unwrap().meal, "Kare-Kare");
    }

    #[test]
    fn add_blank_meal_is_a_no_op() {
        let mut store = MenuStore::new();
        assert_eq!(store.add("Sunday", ""), None);
        assert_eq!(store.add("Sunday", "   "), None);
        assert!(store.is_empty(), "blank names must not create entries");
    }

    #[test]
    fn ids_are_never_reused_after_removal() {
        let mut store = MenuStore::new();
        let a = store.add("Sunday", "Sinigang").unwrap();
        store.remove(a);
        let b = store.add("Sunday", "Adobo").unwrap();
        assert!(b > a, "removed id {a} must not be reassigned (got {b})");
    }

    #[test]
    fn update_replaces_meal_only() {
        let mut store = MenuStore::seeded();
        store.update(3, "Laing");
        let entry = store.get(3).unwrap();
        assert_eq!(entry.meal, "Laing");
        assert_eq!(entry.day, "Tuesday");
        assert_eq!(entry.id, 3);
    }

    #[test]
    fn update_unknown_id_is_a_no_op() {
        let mut store = MenuStore::seeded();
        let before = store.entries().to_vec();
        store.update(99, "Nothing");
        assert_eq!(store.entries(), &before[..]);
    }

    #[test]
    fn remove_unknown_id_is_a_no_op() {
        let mut store = MenuStore::seeded();
        store.remove(99);
        assert_eq!(store.len(), 7);
    }

    #[test]
    fn weekly_view_sorts_by_weekday() {
        let mut store = MenuStore::new();
        store.add("Wednesday", "C");
        store.add("Sunday", "A");
        store.add("Monday", "B");
        let view = store.weekly_view();
        let days: Vec<&str> = view.iter().map(|e| e.day.as_str()).collect();
        assert_eq!(days, vec!["Sunday", "Monday", "Wednesday"]);
    }

    #[test]
    fn weekly_view_is_stable_for_shared_days() {
        let mut store = MenuStore::new();
        let first = store.add("Tuesday", "First").unwrap();
        store.add("Sunday", "Earlier day");
        let second = store.add("Tuesday", "Second").unwrap();
        let view = store.weekly_view();
        let tuesday_ids: Vec<u32> = view
            .iter()
            .filter(|e| e.day == "Tuesday")
            .map(|e| e.id)
            .collect();
        assert_eq!(
            tuesday_ids,
            vec![first, second],
            "entries sharing a day must keep store order"
        );
    }

    #[test]
    fn weekly_view_does_not_mutate_store_order() {
        let mut store = MenuStore::new();
        store.add("Saturday", "Late");
        store.add("Sunday", "Early");
        let _ = store.weekly_view();
        let days: Vec<&str> = store.entries().iter().map(|e| e.day.as_str()).collect();
        assert_eq!(days, vec!["Saturday", "Sunday"]);
    }

    #[test]
    fn weekly_view_length_tracks_live_entries() {
        let mut store = MenuStore::seeded();
        store.remove(2);
        store.add("Monday", "Replacement");
        assert_eq!(store.weekly_view().len(), store.len());
    }

    #[test]
    fn parse_day_is_case_insensitive() {
        assert_eq!(parse_day("monday").unwrap(), "Monday");
        assert_eq!(parse_day("  SATURDAY ").unwrap(), "Saturday");
    }

    #[test]
    fn parse_day_rejects_unknown_names() {
        let err = parse_day("Funday").unwrap_err();
        assert!(format!("{err}").contains("Funday"));
    }

    #[test]
    fn day_index_orders_sunday_first() {
        assert_eq!(day_index("Sunday"), 0);
        assert_eq!(day_index("Saturday"), 6);
        assert_eq!(day_index("NotADay"), 7);
    }
}
