use std::fs;
use std::path::Path;

use crate::error::{PlannerError, Result};
use crate::interface::render::summary_text;
use crate::planner::{SelectionState, ShoppingItem};

/// Text for pasting into an AI assistant: the template, a blank line, then
/// the weekly summary.
pub fn ai_prompt_text(template: &str, state: &SelectionState) -> String {
    format!("{}\n\n{}", template, summary_text(state))
}

/// Read a prompt template and combine it with the summary.
///
/// A missing, unreadable or blank template is a `Template` error.
pub fn build_ai_prompt(template_path: &Path, state: &SelectionState) -> Result<String> {
    let template_error = |reason: String| PlannerError::Template {
        path: template_path.display().to_string(),
        reason,
    };

    let template = fs::read_to_string(template_path).map_err(|e| template_error(e.to_string()))?;
    if template.trim().is_empty() {
        return Err(template_error("template is empty".to_string()));
    }

    tracing::debug!("Building AI prompt from {}", template_path.display());
    Ok(ai_prompt_text(&template, state))
}

/// Write the shopping list as CSV: `ingredient,quantity,unit,servings,notes`.
pub fn write_shopping_csv(items: &[ShoppingItem], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["ingredient", "quantity", "unit", "servings", "notes"])?;

    for item in items {
        wtr.write_record([
            item.name.clone(),
            item.quantity.map(|q| format!("{:.2}", q)).unwrap_or_default(),
            item.unit.clone().unwrap_or_default(),
            item.servings.to_string(),
            item.notes.join("; "),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
