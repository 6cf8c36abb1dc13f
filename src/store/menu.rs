use std::collections::{BTreeMap, BTreeSet};

use uuid::Uuid;

use crate::models::menu::{HallLocation, MenuOption};

use super::OrderStore;

impl OrderStore {
    /// Swaps in a fresh scrape for one hall: every existing row for that
    /// hall goes away, the new rows take their place. Returns the new row
    /// count.
    pub fn replace_hall_menu(&self, hall_id: &str, options: Vec<MenuOption>) -> usize {
        let stale: Vec<Uuid> = self
            .inner
            .menu
            .iter()
            .filter(|entry| entry.value().hall_id == hall_id)
            .map(|entry| *entry.key())
            .collect();
        for id in stale {
            self.inner.menu.remove(&id);
        }

        let count = options.len();
        for option in options {
            self.inner.menu.insert(option.id, option);
        }
        count
    }

    /// Rows available today, optionally narrowed to one hall and one meal
    /// period, ordered by category then name.
    pub fn list_menu(&self, hall_id: Option<&str>, meal_type: Option<&str>) -> Vec<MenuOption> {
        let mut options: Vec<MenuOption> = self
            .inner
            .menu
            .iter()
            .filter(|entry| {
                let option = entry.value();
                option.available_today
                    && hall_id.is_none_or(|wanted| option.hall_id == wanted)
                    && meal_type.is_none_or(|wanted| option.meal_type == wanted)
            })
            .map(|entry| entry.value().clone())
            .collect();

        options.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.name.cmp(&b.name)));
        options
    }

    /// Distinct halls currently represented in the catalog, id order.
    pub fn menu_locations(&self) -> Vec<HallLocation> {
        let mut halls: BTreeMap<String, String> = BTreeMap::new();
        for entry in self.inner.menu.iter() {
            let option = entry.value();
            halls
                .entry(option.hall_id.clone())
                .or_insert_with(|| option.hall_name.clone());
        }

        halls
            .into_iter()
            .map(|(id, name)| HallLocation { id, name })
            .collect()
    }

    /// Distinct categories on today's menu, optionally per hall, sorted.
    pub fn menu_categories(&self, hall_id: Option<&str>) -> Vec<String> {
        let mut categories = BTreeSet::new();
        for entry in self.inner.menu.iter() {
            let option = entry.value();
            if !option.available_today {
                continue;
            }
            if hall_id.is_some_and(|wanted| option.hall_id != wanted) {
                continue;
            }
            if let Some(category) = &option.category {
                if !category.is_empty() {
                    categories.insert(category.clone());
                }
            }
        }

        categories.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;

    use crate::models::menu::MenuOption;
    use crate::store::OrderStore;

    fn option(hall_id: &str, name: &str, category: &str, meal: &str, today: bool) -> MenuOption {
        MenuOption {
            id: Uuid::new_v4(),
            name: name.to_string(),
            category: Some(category.to_string()),
            hall_id: hall_id.to_string(),
            hall_name: format!("{hall_id} commons"),
            meal_type: meal.to_string(),
            nutrition: json!({}),
            allergens: vec![],
            tags: vec![],
            available_today: today,
            scraped_at: Utc::now(),
        }
    }

    #[test]
    fn replace_is_wholesale_per_hall() {
        let store = OrderStore::new();
        store.replace_hall_menu(
            "worcester",
            vec![
                option("worcester", "Pancakes", "Breakfast", "breakfast", true),
                option("worcester", "Omelet", "Breakfast", "breakfast", true),
            ],
        );
        store.replace_hall_menu(
            "franklin",
            vec![option("franklin", "Pizza", "Entrees", "lunch", true)],
        );

        let count = store.replace_hall_menu(
            "worcester",
            vec![option("worcester", "Waffles", "Breakfast", "breakfast", true)],
        );
        assert_eq!(count, 1);
        assert_eq!(store.menu_count(), 2);

        let worcester = store.list_menu(Some("worcester"), None);
        assert_eq!(worcester.len(), 1);
        assert_eq!(worcester[0].name, "Waffles");
    }

    #[test]
    fn list_menu_filters_and_sorts() {
        let store = OrderStore::new();
        store.replace_hall_menu(
            "worcester",
            vec![
                option("worcester", "Tofu Bowl", "Vegan", "lunch", true),
                option("worcester", "Burger", "Grill", "lunch", true),
                option("worcester", "Fries", "Grill", "lunch", true),
                option("worcester", "Oatmeal", "Breakfast", "breakfast", true),
                option("worcester", "Ghost Dish", "Grill", "lunch", false),
            ],
        );

        let lunch = store.list_menu(Some("worcester"), Some("lunch"));
        let names: Vec<&str> = lunch.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Burger", "Fries", "Tofu Bowl"]);

        let everything_today = store.list_menu(None, None);
        assert_eq!(everything_today.len(), 4);
    }

    #[test]
    fn locations_and_categories_are_distinct_and_sorted() {
        let store = OrderStore::new();
        store.replace_hall_menu(
            "worcester",
            vec![
                option("worcester", "Burger", "Grill", "lunch", true),
                option("worcester", "Fries", "Grill", "lunch", true),
            ],
        );
        store.replace_hall_menu(
            "berkshire",
            vec![option("berkshire", "Sushi", "International", "dinner", true)],
        );

        let locations = store.menu_locations();
        let ids: Vec<&str> = locations.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["berkshire", "worcester"]);

        assert_eq!(store.menu_categories(None), vec!["Grill", "International"]);
        assert_eq!(store.menu_categories(Some("worcester")), vec!["Grill"]);
    }
}
