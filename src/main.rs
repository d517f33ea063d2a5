use std::path::{Path, PathBuf};

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;

use nutri_planner_rs::cli::{Cli, Command};
use nutri_planner_rs::error::{PlannerError, Result};
use nutri_planner_rs::interface::{
    build_ai_prompt, candidate_card, prompt_yes_no, run_wizard, shopping_table, status_text, summary_text,
    write_shopping_csv,
};
use nutri_planner_rs::logging;
use nutri_planner_rs::planner::{UndoOutcome, days_label, shopping_list};
use nutri_planner_rs::session::Session;
use nutri_planner_rs::state::{FileStore, import_portable, share_url};

type FileSession = Session<FileStore>;

fn main() {
    let cli = Cli::parse();
    logging::init_with_level(if cli.verbose { "debug" } else { "warn" });

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let command = cli.command.clone().unwrap_or_default();

    // Shared links are read-only and never touch saved data.
    if let Command::View { link } = &command {
        return cmd_view(link);
    }

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let (mut session, notices) = Session::open(FileStore::new(&cli.data_dir), &cli.manifest, rng);
    for notice in &notices {
        eprintln!("! {}", notice);
    }

    match command {
        Command::Plan { base_url } => run_wizard(&mut session, &base_url),
        Command::Status => cmd_status(&session),
        Command::Select { index, days } => cmd_select(&mut session, index, days),
        Command::Undo => cmd_undo(&mut session),
        Command::Summary => cmd_summary(&session),
        Command::Share { base_url } => cmd_share(&session, &base_url),
        Command::View { .. } => Ok(()),
        Command::Load { files } => cmd_load(&mut session, &files),
        Command::Autofill { yes } => cmd_autofill(&mut session, yes),
        Command::Prompt { template } => cmd_prompt(&session, &template),
        Command::ShoppingList { csv } => cmd_shopping_list(&session, csv.as_deref()),
        Command::Reset { yes } => cmd_reset(&mut session, yes),
    }
}

/// Print progress and the menu currently on offer.
fn cmd_status(session: &FileSession) -> Result<()> {
    print!("{}", status_text(session.state()));
    if !session.state().is_complete() {
        println!();
        print!("{}", candidate_card(session.state()));
    }
    Ok(())
}

/// Pick a menu for the current category and commit it.
fn cmd_select(session: &mut FileSession, index: usize, days: u8) -> Result<()> {
    if index == 0 {
        return Err(PlannerError::InvalidInput(
            "menu numbers start at 1".to_string(),
        ));
    }

    let outcome = session.commit_candidate(index - 1, days)?;

    println!(
        "Added '{}' for {} to {}.",
        outcome.menu_name,
        days_label(outcome.days_used),
        outcome.category.label()
    );

    if session.state().is_complete() {
        println!();
        print!("{}", summary_text(session.state()));
    } else {
        println!();
        print!("{}", status_text(session.state()));
    }
    Ok(())
}

fn cmd_undo(session: &mut FileSession) -> Result<()> {
    match session.undo() {
        UndoOutcome::ClearedPending => println!("Cleared the staged day count."),
        UndoOutcome::Reverted(record) => println!(
            "Removed '{}' ({}) from {}.",
            record.selection.menu_name,
            days_label(record.selection.days_used),
            record.category.label()
        ),
        UndoOutcome::Nothing => println!("Nothing to undo."),
    }
    Ok(())
}

fn cmd_summary(session: &FileSession) -> Result<()> {
    if !session.state().is_complete() {
        eprintln!("! The week is not complete yet.");
    }
    print!("{}", summary_text(session.state()));
    Ok(())
}

fn cmd_share(session: &FileSession, base_url: &str) -> Result<()> {
    if !session.state().is_complete() {
        eprintln!("! The week is not complete yet; the link shows a partial summary.");
    }
    println!("{}", share_url(base_url, session.state())?);
    Ok(())
}

fn cmd_view(link: &str) -> Result<()> {
    let state = import_portable(link)?;
    print!("{}", summary_text(&state));
    Ok(())
}

/// Replace the catalog with menu files given on the command line.
fn cmd_load(session: &mut FileSession, files: &[PathBuf]) -> Result<()> {
    let report = session.load_manual(files)?;

    println!("Loaded {} menus.", report.catalog.len());
    for error in &report.errors {
        eprintln!("! Skipped {}", error);
    }
    Ok(())
}

fn cmd_autofill(session: &mut FileSession, yes: bool) -> Result<()> {
    if !session.catalog().should_offer_autofill() {
        return Err(PlannerError::InvalidInput(
            "autofill needs at most one breakfast, lunch and dinner and two snacks".to_string(),
        ));
    }

    if !yes && !prompt_yes_no("Autofill the week? This replaces your current selection.", false)? {
        return Ok(());
    }

    let missing = session.autofill();
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|c| c.key()).collect();
        eprintln!("! No menus for: {}", names.join(", "));
    }
    print!("{}", summary_text(session.state()));
    Ok(())
}

/// Print an AI prompt template followed by the weekly summary.
fn cmd_prompt(session: &FileSession, template: &Path) -> Result<()> {
    if !session.state().is_complete() {
        eprintln!("! The week is not complete yet; the prompt carries a partial summary.");
    }
    match build_ai_prompt(template, session.state()) {
        Ok(text) => print!("{}", text),
        Err(e) => eprintln!("! {}", e),
    }
    Ok(())
}

fn cmd_shopping_list(session: &FileSession, csv: Option<&Path>) -> Result<()> {
    let items = shopping_list(session.state());
    print!("{}", shopping_table(&items));

    if let Some(path) = csv {
        write_shopping_csv(&items, path)?;
        println!("Wrote shopping list to {}", path.display());
    }
    Ok(())
}

fn cmd_reset(session: &mut FileSession, yes: bool) -> Result<()> {
    if !yes && !prompt_yes_no("Start over? This forgets loaded menus and your selection.", false)? {
        return Ok(());
    }

    for notice in session.reset() {
        eprintln!("! {}", notice);
    }
    println!("Selection reset.");
    Ok(())
}
