use std::collections::BTreeMap;

use crate::models::{Category, Ingredient};
use crate::planner::SelectionState;

/// One aggregated line of the weekly shopping list.
#[derive(Debug, Clone, PartialEq)]
pub struct ShoppingItem {
    pub name: String,
    pub unit: Option<String>,
    /// Sum of numeric metric quantities, each multiplied by its days.
    pub quantity: Option<f64>,
    /// Measures that could not be summed, e.g. `"1/2 cup x3"`.
    pub notes: Vec<String>,
    /// Number of days (servings) the ingredient appears in.
    pub servings: u32,
}

/// Aggregate every ingredient of the committed selections.
///
/// Lines are keyed by lower-cased name and metric unit and sorted by that
/// key.
pub fn shopping_list(state: &SelectionState) -> Vec<ShoppingItem> {
    let mut lines: BTreeMap<(String, String), ShoppingItem> = BTreeMap::new();

    for category in Category::ALL {
        for selection in state.selections(category) {
            let days = selection.days_used;
            for ingredient in selection.dishes.iter().flat_map(|d| &d.ingredients) {
                add_ingredient(&mut lines, ingredient, days);
            }
        }
    }

    lines.into_values().collect()
}

fn add_ingredient(
    lines: &mut BTreeMap<(String, String), ShoppingItem>,
    ingredient: &Ingredient,
    days: u8,
) {
    let name = ingredient.name.trim();
    if name.is_empty() {
        return;
    }
    let unit = ingredient
        .metric_unit
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty());

    let key = (
        name.to_lowercase(),
        unit.map(str::to_lowercase).unwrap_or_default(),
    );
    let line = lines.entry(key).or_insert_with(|| ShoppingItem {
        name: name.to_string(),
        unit: unit.map(str::to_string),
        quantity: None,
        notes: Vec::new(),
        servings: 0,
    });
    line.servings += days as u32;

    let metric = ingredient.metric_quantity.as_ref().filter(|q| q.is_present());
    match metric.map(|q| (q, q.as_number())) {
        Some((_, Some(amount))) => {
            line.quantity = Some(line.quantity.unwrap_or(0.0) + amount * days as f64);
        }
        Some((raw, None)) => line.notes.push(format!("{} x{}", raw, days)),
        None => {
            if let Some(alt) = ingredient.alternative_text() {
                line.notes.push(format!("{} x{}", alt, days));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::models::{Dish, MealKind, MenuItem, Quantity};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn ingredient(name: &str, qty: Option<Quantity>, unit: Option<&str>) -> Ingredient {
        Ingredient {
            name: name.to_string(),
            metric_quantity: qty,
            metric_unit: unit.map(str::to_string),
            alternative_quantity: Some(Quantity::Text("1/2".to_string())),
            alternative_unit: Some("cup".to_string()),
        }
    }

    fn menu(name: &str, ingredients: Vec<Ingredient>) -> MenuItem {
        MenuItem {
            menu_name: name.to_string(),
            dishes: vec![Dish {
                name: name.to_string(),
                ingredients,
            }],
        }
    }

    #[test]
    fn test_quantities_scale_by_days_and_merge() {
        let mut catalog = Catalog::default();
        catalog.push(
            MealKind::Breakfast,
            menu(
                "Oats",
                vec![
                    ingredient("Oats", Some(Quantity::Number(40.0)), Some("g")),
                    ingredient("Honey", Some(Quantity::Text("a drizzle".into())), None),
                ],
            ),
        );
        catalog.push(
            MealKind::Lunch,
            menu(
                "Bowl",
                vec![
                    ingredient("oats", Some(Quantity::Text("10".into())), Some("G")),
                    ingredient("Spinach", None, None),
                ],
            ),
        );

        let mut state = SelectionState::new();
        state.initialize(&catalog, &mut StdRng::seed_from_u64(1));
        // Snack slots are empty, so fill around them.
        state.autofill(&catalog);

        let list = shopping_list(&state);
        let oats = list.iter().find(|i| i.name == "Oats").unwrap();
        assert_float_absolute_eq!(oats.quantity.unwrap(), 40.0 * 7.0 + 10.0 * 7.0, 1e-9);
        assert_eq!(oats.servings, 14);

        let honey = list.iter().find(|i| i.name == "Honey").unwrap();
        assert_eq!(honey.quantity, None);
        assert_eq!(honey.notes, vec!["a drizzle x7".to_string()]);

        let spinach = list.iter().find(|i| i.name == "Spinach").unwrap();
        assert_eq!(spinach.notes, vec!["1/2 cup x7".to_string()]);
    }

    #[test]
    fn test_empty_selection_gives_empty_list() {
        assert!(shopping_list(&SelectionState::new()).is_empty());
    }
}
