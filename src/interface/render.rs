use crate::models::{Category, CommittedSelection, Ingredient};
use crate::planner::{SelectionState, ShoppingItem, Step, TOTAL_DAYS, days_label};

const BAR_WIDTH: usize = 14;

/// One ingredient as `name | metric | alternative`, skipping absent measures.
pub fn ingredient_line(ingredient: &Ingredient) -> String {
    let mut line = ingredient.name.clone();
    for measure in [ingredient.metric_text(), ingredient.alternative_text()]
        .into_iter()
        .flatten()
    {
        line.push_str(" | ");
        line.push_str(&measure);
    }
    line
}

fn push_selection(text: &mut String, selection: &CommittedSelection) {
    text.push_str(&format!(
        "  {} - {}\n",
        selection.menu_name,
        days_label(selection.days_used)
    ));
    for dish in &selection.dishes {
        text.push_str(&format!("    {}\n", dish.name));
        for ingredient in &dish.ingredients {
            text.push_str(&format!("      {}\n", ingredient_line(ingredient)));
        }
    }
    text.push('\n');
}

/// Plain-text weekly summary, suitable for copying.
pub fn summary_text(state: &SelectionState) -> String {
    let mut text = String::from("Weekly Summary\n\n");

    for category in Category::ALL {
        let selections = state.selections(category);
        if selections.is_empty() {
            continue;
        }
        text.push_str(category.label());
        text.push('\n');
        for selection in selections {
            push_selection(&mut text, selection);
        }
        text.push('\n');
    }

    format!("{}\n", text.trim_end())
}

/// `Breakfast  [######........]  3 / 7 days`
pub fn progress_line(state: &SelectionState, category: Category) -> String {
    let used = state.days_allocated(category) as usize;
    let filled = used * BAR_WIDTH / TOTAL_DAYS as usize;
    format!(
        "{:<10} [{}{}] {} / {} days",
        category.label(),
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled),
        used,
        TOTAL_DAYS
    )
}

/// Progress of every category plus the current step.
pub fn status_text(state: &SelectionState) -> String {
    let mut text = String::new();
    for category in Category::ALL {
        let marker = if state.current_category() == Some(category) {
            ">"
        } else {
            " "
        };
        text.push_str(&format!("{} {}\n", marker, progress_line(state, category)));
    }

    match state.current_step() {
        Step::Complete => text.push_str("\nThe week is complete.\n"),
        Step::Category(category) => {
            text.push_str(&format!(
                "\nChoosing {} ({} left)",
                category.label(),
                days_label(state.remaining_days(category))
            ));
            if let Some(days) = state.pending_days() {
                text.push_str(&format!(", staged {}", days_label(days)));
            }
            text.push('\n');
        }
    }
    text
}

/// The active candidate with its dishes, or an empty-state message.
pub fn candidate_card(state: &SelectionState) -> String {
    let Some(category) = state.current_category() else {
        return String::new();
    };
    let pool = state.pool(category);
    let index = state.active_candidate_index();
    let Some(entry) = pool.get(index) else {
        return "No menus available for this category.\n".to_string();
    };

    let used = if state.is_used(category, index) {
        "  (already chosen)"
    } else {
        ""
    };
    let mut text = format!(
        "Menu {} of {}{}\n  {}\n",
        index + 1,
        pool.len(),
        used,
        entry.menu.menu_name
    );
    for dish in &entry.menu.dishes {
        text.push_str(&format!("    {}\n", dish.name));
        for ingredient in &dish.ingredients {
            text.push_str(&format!("      {}\n", ingredient_line(ingredient)));
        }
    }
    text
}

/// Pool entries as selectable labels, marking the ones already chosen.
pub fn pool_labels(state: &SelectionState, category: Category) -> Vec<String> {
    state
        .pool(category)
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            if state.is_used(category, i) {
                format!("{} (chosen)", entry.menu.menu_name)
            } else {
                entry.menu.menu_name.clone()
            }
        })
        .collect()
}

/// Aligned shopping list.
pub fn shopping_table(items: &[ShoppingItem]) -> String {
    if items.is_empty() {
        return "Shopping list is empty.\n".to_string();
    }

    let width = items.iter().map(|i| i.name.len()).max().unwrap_or(10);
    let mut text = String::from("=== Shopping List ===\n\n");

    for item in items {
        let amount = match (item.quantity, item.unit.as_deref()) {
            (Some(q), Some(u)) => format!("{} {}", q, u),
            (Some(q), None) => q.to_string(),
            (None, _) => String::new(),
        };
        let notes = if item.notes.is_empty() {
            String::new()
        } else {
            format!("  ({})", item.notes.join(", "))
        };
        text.push_str(&format!(
            "  {:<width$}  {:>10}  x{}{}\n",
            item.name,
            amount,
            item.servings,
            notes,
            width = width
        ));
    }
    text
}
