use serde_json::{Map, Value};

use crate::error::{PlannerError, Result};
use crate::models::{Dish, Ingredient, MealKind, MenuItem, Quantity};

/// Extract the valid menus from one parsed menu file.
///
/// The document must be a JSON object. Keys name meal categories
/// (case-insensitive, `snack*` folds into the snack bucket); the `id` key and
/// unknown categories are skipped. Invalid menu entries are dropped silently.
pub fn parse_menu_document(value: &Value) -> Result<Vec<(MealKind, MenuItem)>> {
    let object = value
        .as_object()
        .ok_or_else(|| PlannerError::InvalidInput("menu file is not a JSON object".to_string()))?;

    let mut menus = Vec::new();

    for (key, entries) in object {
        if key.eq_ignore_ascii_case("id") {
            continue;
        }

        let Some(kind) = MealKind::from_document_key(key) else {
            tracing::debug!("Skipping unknown menu category '{}'", key);
            continue;
        };

        let Some(entries) = entries.as_array() else {
            continue;
        };

        let before = menus.len();
        menus.extend(entries.iter().filter_map(parse_menu).map(|m| (kind, m)));
        let kept = menus.len() - before;
        if kept < entries.len() {
            tracing::debug!(
                "Dropped {} invalid entries under '{}'",
                entries.len() - kept,
                key
            );
        }
    }

    Ok(menus)
}

fn parse_menu(value: &Value) -> Option<MenuItem> {
    let object = value.as_object()?;

    let menu_name = object.get("menuName")?.as_str()?;
    if menu_name.trim().is_empty() {
        return None;
    }

    let raw_dishes = object.get("dishes")?.as_array()?;
    let dishes: Vec<Dish> = raw_dishes.iter().filter_map(parse_dish).collect();
    if dishes.is_empty() {
        return None;
    }

    Some(MenuItem {
        menu_name: menu_name.to_string(),
        dishes,
    })
}

fn parse_dish(value: &Value) -> Option<Dish> {
    let object = value.as_object()?;
    let name = object.get("name")?.as_str()?.to_string();

    let ingredients = object
        .get("ingredients")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(parse_ingredient).collect())
        .unwrap_or_default();

    Some(Dish { name, ingredients })
}

fn parse_ingredient(value: &Value) -> Option<Ingredient> {
    let object = value.as_object()?;
    let name = object.get("name")?.as_str()?.to_string();

    Some(Ingredient {
        name,
        metric_quantity: quantity_field(object, "metricQuantity"),
        metric_unit: text_field(object, "metricUnit"),
        alternative_quantity: quantity_field(object, "alternativeQuantity"),
        alternative_unit: text_field(object, "alternativeUnit"),
    })
}

fn quantity_field(object: &Map<String, Value>, key: &str) -> Option<Quantity> {
    match object.get(key)? {
        Value::Number(n) => n.as_f64().map(Quantity::Number),
        Value::String(s) => Some(Quantity::Text(s.clone())),
        _ => None,
    }
}

fn text_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key)?.as_str().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rejects_non_object_documents() {
        assert!(parse_menu_document(&json!([1, 2, 3])).is_err());
        assert!(parse_menu_document(&json!("menus")).is_err());
    }

    #[test]
    fn test_folds_keys_and_skips_id() {
        let doc = json!({
            "id": "week-12",
            "Breakfast": [{"menuName": "Oats", "dishes": [{"name": "Porridge", "ingredients": []}]}],
            "snackMorning": [{"menuName": "Apple", "dishes": [{"name": "Apple"}]}],
            "snack_afternoon": [{"menuName": "Nuts", "dishes": [{"name": "Almonds"}]}],
            "brunch": [{"menuName": "Eggs", "dishes": [{"name": "Eggs"}]}]
        });

        let menus = parse_menu_document(&doc).unwrap();
        let kinds: Vec<MealKind> = menus.iter().map(|(k, _)| *k).collect();
        assert_eq!(menus.len(), 3);
        assert_eq!(kinds.iter().filter(|k| **k == MealKind::Snack).count(), 2);
        assert!(kinds.contains(&MealKind::Breakfast));
    }

    #[test]
    fn test_filters_invalid_menus() {
        let doc = json!({
            "lunch": [
                {"menuName": "", "dishes": [{"name": "x"}]},
                {"menuName": "No dishes", "dishes": []},
                {"menuName": 42, "dishes": [{"name": "x"}]},
                {"dishes": [{"name": "x"}]},
                "not an object",
                {"menuName": "Valid", "dishes": [{"name": "Rice", "ingredients": [
                    {"name": "Rice", "metricQuantity": 80, "metricUnit": "g"},
                    {"metricQuantity": 1}
                ]}]}
            ],
            "dinner": "not an array"
        });

        let menus = parse_menu_document(&doc).unwrap();
        assert_eq!(menus.len(), 1);
        let (kind, menu) = &menus[0];
        assert_eq!(*kind, MealKind::Lunch);
        assert_eq!(menu.menu_name, "Valid");
        assert_eq!(menu.dishes[0].ingredients.len(), 1);
        assert_eq!(
            menu.dishes[0].ingredients[0].metric_text().as_deref(),
            Some("80 g")
        );
    }

    #[test]
    fn test_menu_without_valid_dishes_is_dropped() {
        let doc = json!({
            "dinner": [{"menuName": "Ghost", "dishes": [{"ingredients": []}]}]
        });
        assert!(parse_menu_document(&doc).unwrap().is_empty());
    }
}
