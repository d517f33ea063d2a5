use std::path::{Path, PathBuf};

use dialoguer::{Confirm, Input, Select};

use crate::catalog::Catalog;
use crate::error::{Result, SelectionError};
use crate::interface::export::build_ai_prompt;
use crate::interface::render::{
    candidate_card, pool_labels, shopping_table, status_text, summary_text,
};
use crate::models::Category;
use crate::planner::{SelectionState, UndoOutcome, days_label, search_pool, shopping_list};
use crate::session::Session;
use crate::state::{KeyValueStore, share_url};

/// Everything the wizard can offer at one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardAction {
    ChooseDays,
    Confirm,
    NextMenu,
    PreviousMenu,
    JumpToMenu,
    FindMenu,
    Undo,
    ShowSummary,
    ShareLink,
    ShoppingList,
    AiPrompt,
    Autofill,
    LoadFiles,
    Reset,
    Quit,
}

/// Actions that make sense for the current state, in menu order.
pub fn available_actions(state: &SelectionState, catalog: &Catalog) -> Vec<WizardAction> {
    let mut actions = Vec::new();

    match state.current_category() {
        None => {
            actions.push(WizardAction::ShowSummary);
            actions.push(WizardAction::ShareLink);
            actions.push(WizardAction::ShoppingList);
            actions.push(WizardAction::AiPrompt);
            if state.can_undo() {
                actions.push(WizardAction::Undo);
            }
        }
        Some(category) => {
            if state.active_candidate().is_some() {
                actions.push(WizardAction::ChooseDays);
            }
            if state.pending_days().is_some() {
                actions.push(WizardAction::Confirm);
            }
            if state.pool(category).len() > 1 {
                actions.extend([
                    WizardAction::NextMenu,
                    WizardAction::PreviousMenu,
                    WizardAction::JumpToMenu,
                    WizardAction::FindMenu,
                ]);
            }
            if state.can_undo() {
                actions.push(WizardAction::Undo);
            }
            if Category::ALL
                .iter()
                .any(|c| !state.selections(*c).is_empty())
            {
                actions.push(WizardAction::ShowSummary);
            }
            if catalog.should_offer_autofill() {
                actions.push(WizardAction::Autofill);
            }
        }
    }

    actions.extend([WizardAction::LoadFiles, WizardAction::Reset, WizardAction::Quit]);
    actions
}

/// Menu label for an action. Confirm says where it leads.
pub fn action_label(action: WizardAction, state: &SelectionState) -> String {
    match action {
        WizardAction::ChooseDays => "Choose number of days".to_string(),
        WizardAction::Confirm => {
            let days = state.pending_days().unwrap_or(0);
            let finishes_week = state.current_category() == Some(Category::Dinner)
                && state.remaining_days(Category::Dinner) == days;
            if finishes_week {
                format!("Confirm {} and go to summary", days_label(days))
            } else {
                format!("Confirm {}", days_label(days))
            }
        }
        WizardAction::NextMenu => "Next menu".to_string(),
        WizardAction::PreviousMenu => "Previous menu".to_string(),
        WizardAction::JumpToMenu => "Jump to menu...".to_string(),
        WizardAction::FindMenu => "Find menu by name...".to_string(),
        WizardAction::Undo => "Undo".to_string(),
        WizardAction::ShowSummary => "Show summary".to_string(),
        WizardAction::ShareLink => "Show share link".to_string(),
        WizardAction::ShoppingList => "Show shopping list".to_string(),
        WizardAction::AiPrompt => "Build AI prompt from template...".to_string(),
        WizardAction::Autofill => "Autofill the week".to_string(),
        WizardAction::LoadFiles => "Load menu files...".to_string(),
        WizardAction::Reset => "Start over".to_string(),
        WizardAction::Quit => "Quit".to_string(),
    }
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

fn show_rejection<T>(result: std::result::Result<T, SelectionError>) {
    if let Err(e) = result {
        println!("! {}", e);
    }
}

/// Interactive planning loop. Returns when the user quits.
pub fn run_wizard<S: KeyValueStore>(session: &mut Session<S>, share_base: &str) -> Result<()> {
    loop {
        println!();
        print!("{}", status_text(session.state()));
        if !session.state().is_complete() {
            println!();
            print!("{}", candidate_card(session.state()));
        }
        println!();

        let actions = available_actions(session.state(), session.catalog());
        let labels: Vec<String> = actions
            .iter()
            .map(|a| action_label(*a, session.state()))
            .collect();
        let default = actions
            .iter()
            .position(|a| *a == WizardAction::Confirm)
            .unwrap_or(0);

        let choice = Select::new()
            .with_prompt("What next?")
            .items(&labels)
            .default(default)
            .interact()?;

        match actions[choice] {
            WizardAction::ChooseDays => prompt_days(session)?,
            WizardAction::Confirm => match session.commit() {
                Ok(outcome) => {
                    println!(
                        "Added '{}' for {} to {}.",
                        outcome.menu_name,
                        days_label(outcome.days_used),
                        outcome.category.label()
                    );
                    if session.state().is_complete() {
                        println!();
                        print!("{}", summary_text(session.state()));
                    }
                }
                Err(e) => println!("! {}", e),
            },
            WizardAction::NextMenu => show_rejection(session.navigate(1)),
            WizardAction::PreviousMenu => show_rejection(session.navigate(-1)),
            WizardAction::JumpToMenu => prompt_jump(session)?,
            WizardAction::FindMenu => prompt_find(session)?,
            WizardAction::Undo => match session.undo() {
                UndoOutcome::ClearedPending => println!("Cleared the staged day count."),
                UndoOutcome::Reverted(record) => println!(
                    "Removed '{}' ({}) from {}.",
                    record.selection.menu_name,
                    days_label(record.selection.days_used),
                    record.category.label()
                ),
                UndoOutcome::Nothing => println!("Nothing to undo."),
            },
            WizardAction::ShowSummary => print!("{}", summary_text(session.state())),
            WizardAction::ShareLink => println!("{}", share_url(share_base, session.state())?),
            WizardAction::ShoppingList => {
                print!("{}", shopping_table(&shopping_list(session.state())))
            }
            WizardAction::AiPrompt => prompt_ai(session)?,
            WizardAction::Autofill => prompt_autofill(session)?,
            WizardAction::LoadFiles => prompt_load(session)?,
            WizardAction::Reset => {
                if prompt_yes_no("Start over? This forgets loaded menus and your selection.", false)? {
                    for notice in session.reset() {
                        println!("! {}", notice);
                    }
                }
            }
            WizardAction::Quit => return Ok(()),
        }
    }
}

fn prompt_days<S: KeyValueStore>(session: &mut Session<S>) -> Result<()> {
    let Some(category) = session.state().current_category() else {
        return Ok(());
    };
    let remaining = session.state().remaining_days(category);
    let options: Vec<String> = (1..=remaining).map(days_label).collect();
    let default = session
        .state()
        .pending_days()
        .map(|d| d as usize - 1)
        .unwrap_or(options.len().saturating_sub(1));

    let selection = Select::new()
        .with_prompt(format!("How many days? ({} available)", remaining))
        .items(&options)
        .default(default)
        .interact()?;

    show_rejection(session.choose_day_count(selection as u8 + 1));
    Ok(())
}

fn prompt_jump<S: KeyValueStore>(session: &mut Session<S>) -> Result<()> {
    let Some(category) = session.state().current_category() else {
        return Ok(());
    };
    let labels = pool_labels(session.state(), category);

    let selection = Select::new()
        .with_prompt("Which menu?")
        .items(&labels)
        .default(session.state().active_candidate_index())
        .interact()?;

    show_rejection(session.select_candidate(selection));
    Ok(())
}

fn prompt_find<S: KeyValueStore>(session: &mut Session<S>) -> Result<()> {
    let Some(category) = session.state().current_category() else {
        return Ok(());
    };

    let query: String = Input::new()
        .with_prompt("Menu name")
        .allow_empty(true)
        .interact_text()?;

    let matches = search_pool(session.state().pool(category), &query);
    match matches.as_slice() {
        [] => println!("No matching menu found for '{}'", query.trim()),
        [only] => {
            println!("Found: {}", only.menu_name);
            show_rejection(session.select_candidate(only.index));
        }
        many => {
            let mut options: Vec<String> = many.iter().map(|m| m.menu_name.clone()).collect();
            options.push("None of these".to_string());

            let selection = Select::new()
                .with_prompt("Which did you mean?")
                .items(&options)
                .default(0)
                .interact()?;

            if let Some(found) = many.get(selection) {
                show_rejection(session.select_candidate(found.index));
            }
        }
    }
    Ok(())
}

fn prompt_ai<S: KeyValueStore>(session: &Session<S>) -> Result<()> {
    let path: String = Input::new()
        .with_prompt("Prompt template file")
        .allow_empty(true)
        .interact_text()?;
    if path.trim().is_empty() {
        return Ok(());
    }

    match build_ai_prompt(Path::new(path.trim()), session.state()) {
        Ok(text) => {
            println!();
            print!("{}", text);
        }
        Err(e) => println!("! {}", e),
    }
    Ok(())
}

fn prompt_autofill<S: KeyValueStore>(session: &mut Session<S>) -> Result<()> {
    let catalog = session.catalog();
    let missing: Vec<&str> = Category::ALL
        .iter()
        .filter(|c| catalog.bucket(c.meal_kind()).is_empty())
        .map(|c| c.key())
        .collect();

    let mut prompt = "Autofill the week? This replaces your current selection.".to_string();
    if !missing.is_empty() {
        prompt.push_str(&format!(" No menus for: {}.", missing.join(", ")));
    }

    if prompt_yes_no(&prompt, false)? {
        session.autofill();
        print!("{}", summary_text(session.state()));
    }
    Ok(())
}

fn prompt_load<S: KeyValueStore>(session: &mut Session<S>) -> Result<()> {
    let input: String = Input::new()
        .with_prompt("Menu file paths (comma-separated)")
        .allow_empty(true)
        .interact_text()?;

    let paths: Vec<PathBuf> = input
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .collect();
    if paths.is_empty() {
        println!("No files given.");
        return Ok(());
    }

    match session.load_manual(&paths) {
        Ok(report) => {
            println!("Loaded {} menus.", report.catalog.len());
            if !report.errors.is_empty() {
                println!("! Some files were skipped: {}", report.errors.join(", "));
            }
        }
        Err(e) => println!("! {}", e),
    }
    Ok(())
}
