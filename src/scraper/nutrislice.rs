use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::models::menu::MenuOption;

/// Weekly menu payload from `/menu/api/weeks/...`. Only the fields the
/// catalog needs are modelled; the rest of the payload is ignored.
#[derive(Debug, Deserialize)]
pub struct WeekMenu {
    #[serde(default)]
    pub days: Vec<DayMenu>,
}

#[derive(Debug, Deserialize)]
pub struct DayMenu {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub menu_items: Vec<RawMenuItem>,
}

/// One row of the upstream feed. Field naming shifted across feed
/// versions (`food_name` vs a nested `food` object), so both are
/// accepted; section-header rows carry neither and are dropped.
#[derive(Debug, Deserialize)]
pub struct RawMenuItem {
    #[serde(default)]
    pub food_name: Option<String>,
    #[serde(default)]
    pub food: Option<RawFood>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub nutrition: Value,
    #[serde(default)]
    pub allergens: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawFood {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rounded_nutrition_info: Option<Value>,
}

/// Flattens a week payload into catalog rows for one hall and meal
/// period. `available_today` marks the rows whose day matches the
/// requested date; the rest of the week is kept for lookahead.
pub fn normalize(
    hall_id: &str,
    hall_name: &str,
    meal_type: &str,
    today: &str,
    week: WeekMenu,
) -> Vec<MenuOption> {
    let scraped_at = Utc::now();
    let mut options = Vec::new();

    for day in week.days {
        let available_today = day.date == today;

        for item in day.menu_items {
            let Some(name) = display_name(&item.food_name, &item.food) else {
                continue;
            };

            let nutrition = if item.nutrition.is_null() {
                item.food
                    .and_then(|food| food.rounded_nutrition_info)
                    .unwrap_or(Value::Null)
            } else {
                item.nutrition
            };

            options.push(MenuOption {
                id: Uuid::new_v4(),
                name,
                category: item.category.filter(|category| !category.is_empty()),
                hall_id: hall_id.to_string(),
                hall_name: hall_name.to_string(),
                meal_type: meal_type.to_string(),
                nutrition,
                allergens: item.allergens,
                tags: item.tags,
                available_today,
                scraped_at,
            });
        }
    }

    options
}

fn display_name(food_name: &Option<String>, food: &Option<RawFood>) -> Option<String> {
    food_name
        .as_deref()
        .or_else(|| food.as_ref().and_then(|food| food.name.as_deref()))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{normalize, WeekMenu};

    fn sample_week() -> WeekMenu {
        serde_json::from_value(json!({
            "start_date": "2025-03-10",
            "days": [
                {
                    "date": "2025-03-14",
                    "menu_items": [
                        {
                            "food_name": "Buffalo Chicken Wrap",
                            "category": "Grill",
                            "nutrition": {"calories": 540},
                            "allergens": ["gluten", "dairy"],
                            "tags": ["halal"]
                        },
                        {
                            "text": "-- Soups --",
                            "is_section_title": true
                        },
                        {
                            "food": {
                                "name": "Tomato Basil Soup",
                                "rounded_nutrition_info": {"calories": 180}
                            },
                            "category": "Soups"
                        }
                    ]
                },
                {
                    "date": "2025-03-15",
                    "menu_items": [
                        {"food_name": "Weekend Pancakes", "category": "Breakfast"}
                    ]
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn normalize_flattens_and_marks_today() {
        let rows = normalize("worcester", "Worcester", "lunch", "2025-03-14", sample_week());

        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|row| row.hall_id == "worcester"));
        assert!(rows.iter().all(|row| row.meal_type == "lunch"));

        let wrap = rows.iter().find(|row| row.name == "Buffalo Chicken Wrap").unwrap();
        assert!(wrap.available_today);
        assert_eq!(wrap.nutrition["calories"], 540);
        assert_eq!(wrap.allergens, vec!["gluten", "dairy"]);

        let pancakes = rows.iter().find(|row| row.name == "Weekend Pancakes").unwrap();
        assert!(!pancakes.available_today);
    }

    #[test]
    fn nested_food_object_supplies_name_and_nutrition() {
        let rows = normalize("worcester", "Worcester", "lunch", "2025-03-14", sample_week());

        let soup = rows.iter().find(|row| row.name == "Tomato Basil Soup").unwrap();
        assert_eq!(soup.category.as_deref(), Some("Soups"));
        assert_eq!(soup.nutrition["calories"], 180);
    }

    #[test]
    fn section_rows_without_names_are_dropped() {
        let rows = normalize("worcester", "Worcester", "lunch", "2025-03-14", sample_week());
        assert!(rows.iter().all(|row| !row.name.contains("Soups")));
    }

    #[test]
    fn empty_payload_yields_no_rows() {
        let week: WeekMenu = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(normalize("worcester", "Worcester", "lunch", "2025-03-14", week).is_empty());
    }
}
