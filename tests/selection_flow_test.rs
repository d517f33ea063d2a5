use std::fs;
use std::path::PathBuf;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tempfile::TempDir;

use nutri_planner_rs::interface::summary_text;
use nutri_planner_rs::models::Category;
use nutri_planner_rs::planner::{Step, TOTAL_DAYS, UndoOutcome};
use nutri_planner_rs::session::{Notice, Session};
use nutri_planner_rs::state::MemoryStore;
use nutri_planner_rs::SelectionError;

const WEEK: &str = r#"{
    "id": "week-1",
    "breakfast": [
        {"menuName": "Oats", "dishes": [{"name": "Porridge", "ingredients": [
            {"name": "Rolled oats", "metricQuantity": 50, "metricUnit": "g"}
        ]}]},
        {"menuName": "Eggs", "dishes": [{"name": "Scrambled eggs"}]}
    ],
    "snacks": [
        {"menuName": "Apple", "dishes": [{"name": "Apple"}]},
        {"menuName": "Nuts", "dishes": [{"name": "Almonds"}]}
    ],
    "lunch": [{"menuName": "Rice Bowl", "dishes": [{"name": "Rice"}]}],
    "dinner": [{"menuName": "Soup", "dishes": [{"name": "Lentil soup"}]}]
}"#;

const SINGLE: &str = r#"{
    "breakfast": [{"menuName": "Oats", "dishes": [{"name": "Porridge", "ingredients": [
        {"name": "Rolled oats", "metricQuantity": 50, "metricUnit": "g", "alternativeQuantity": "1/2", "alternativeUnit": "cup"}
    ]}]}],
    "snacks": [
        {"menuName": "Apple", "dishes": [{"name": "Apple"}]},
        {"menuName": "Nuts", "dishes": [{"name": "Almonds"}]}
    ],
    "lunch": [{"menuName": "Rice Bowl", "dishes": [{"name": "Rice"}]}],
    "dinner": [{"menuName": "Soup", "dishes": [{"name": "Lentil soup"}]}]
}"#;

fn open_with(files: &[&str]) -> (TempDir, Session<MemoryStore>, Vec<Notice>) {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("week.json"), WEEK).unwrap();
    fs::write(dir.path().join("single.json"), SINGLE).unwrap();
    let manifest: PathBuf = dir.path().join("json_directory.json");
    fs::write(&manifest, serde_json::json!({ "jsonFiles": files }).to_string()).unwrap();

    let (session, notices) = Session::open(MemoryStore::new(), manifest, StdRng::seed_from_u64(7));
    (dir, session, notices)
}

/// Commit the whole remaining week for the current category.
fn fill_current(session: &mut Session<MemoryStore>) {
    let category = session.state().current_category().unwrap();
    let remaining = session.state().remaining_days(category);
    session.choose_day_count(remaining).unwrap();
    session.commit().unwrap();
}

#[test]
fn test_empty_manifest_prompts_manual_load() {
    let (_dir, session, notices) = open_with(&[]);

    assert_eq!(notices, vec![Notice::NeedsManualLoad]);
    assert!(session.catalog().is_empty());
    assert_eq!(
        session.state().current_step(),
        Step::Category(Category::Breakfast)
    );
    assert!(session.state().active_candidate().is_none());
}

#[test]
fn test_full_week_reaches_summary() {
    let (_dir, mut session, notices) = open_with(&["week.json"]);
    assert!(notices.is_empty());
    assert_eq!(session.catalog().len(), 6);

    for expected in Category::ALL {
        assert_eq!(session.state().current_category(), Some(expected));
        fill_current(&mut session);
        assert_eq!(session.state().days_allocated(expected), TOTAL_DAYS);
    }

    assert!(session.state().is_complete());
    assert_eq!(session.state().current_step(), Step::Complete);
    assert_eq!(
        session.choose_day_count(1),
        Err(SelectionError::AlreadyComplete)
    );

    let summary = summary_text(session.state());
    assert!(summary.starts_with("Weekly Summary"));
    assert!(summary.contains("Lunch"));
    assert!(summary.contains("Rice Bowl"));
    assert!(summary.contains("7 days"));
}

#[test]
fn test_split_week_then_undo_restores_position() {
    let (_dir, mut session, _) = open_with(&["week.json"]);

    session.choose_day_count(3).unwrap();
    session.commit().unwrap();
    assert_eq!(session.state().remaining_days(Category::Breakfast), 4);
    assert!(session.state().is_used(Category::Breakfast, 0));

    session.navigate(1).unwrap();
    session.choose_day_count(4).unwrap();
    let outcome = session.commit().unwrap();
    assert!(outcome.category_filled);
    assert_eq!(session.state().current_category(), Some(Category::Snack1));

    let undone = session.undo();
    assert!(matches!(undone, UndoOutcome::Reverted(ref r) if r.selection.days_used == 4));
    assert_eq!(session.state().current_category(), Some(Category::Breakfast));
    assert_eq!(session.state().days_allocated(Category::Breakfast), 3);
    assert_eq!(session.state().active_candidate_index(), 1);
    assert!(!session.state().is_used(Category::Breakfast, 1));
}

#[test]
fn test_rejected_commands_leave_state_untouched() {
    let (_dir, mut session, _) = open_with(&["week.json"]);
    let before = session.state().clone();

    assert!(matches!(
        session.choose_day_count(8),
        Err(SelectionError::InvalidDayCount { requested: 8, .. })
    ));
    assert_eq!(session.commit(), Err(SelectionError::NoPendingDays));
    assert!(matches!(
        session.select_candidate(9),
        Err(SelectionError::CandidateOutOfRange { index: 9, len: 2 })
    ));
    assert_eq!(session.state(), &before);
    assert!(matches!(session.undo(), UndoOutcome::Nothing));
}

#[test]
fn test_autofill_offered_only_for_small_catalogs() {
    let (_dir, mut session, _) = open_with(&["week.json"]);
    // Two breakfasts on offer.
    assert!(!session.catalog().should_offer_autofill());

    let dir = TempDir::new().unwrap();
    let single = dir.path().join("single.json");
    fs::write(
        &single,
        r#"{
            "breakfast": [{"menuName": "Oats", "dishes": [{"name": "Porridge"}]}],
            "snack": [{"menuName": "Apple", "dishes": [{"name": "Apple"}]}],
            "lunch": [{"menuName": "Rice Bowl", "dishes": [{"name": "Rice"}]}],
            "dinner": [{"menuName": "Soup", "dishes": [{"name": "Soup"}]}]
        }"#,
    )
    .unwrap();
    session.load_manual(&[single]).unwrap();
    assert!(session.catalog().should_offer_autofill());

    let missing = session.autofill();
    assert!(missing.is_empty());
    assert!(session.state().is_complete());
    assert_eq!(session.state().selections(Category::Snack2)[0].menu_name, "Apple");
}

#[test]
fn test_single_choice_file_walks_every_category() {
    let (_dir, mut session, notices) = open_with(&["single.json"]);
    assert!(notices.is_empty());

    let mut visited = Vec::new();
    while let Some(category) = session.state().current_category() {
        visited.push(category);
        let remaining = session.state().remaining_days(category);
        session.choose_day_count(remaining).unwrap();
        session.commit().unwrap();
    }
    assert_eq!(visited, Category::ALL.to_vec());
    assert!(session.state().is_complete());

    let summary = summary_text(session.state());
    for label in ["Breakfast", "Snack", "Lunch", "Dinner"] {
        assert!(summary.contains(label), "missing {label}");
    }
    assert!(summary.contains("  Oats - 7 days"));
    assert!(summary.contains("      Rolled oats | 50 g | 1/2 cup"));
}

#[test]
fn test_manifest_of_broken_files_asks_for_manual_load() {
    let (dir, _, _) = open_with(&[]);
    fs::write(dir.path().join("broken.json"), "{oops").unwrap();
    fs::write(
        dir.path().join("json_directory.json"),
        r#"{"jsonFiles": ["broken.json", "absent.json"]}"#,
    )
    .unwrap();

    let (session, notices) = Session::open(
        MemoryStore::new(),
        dir.path().join("json_directory.json"),
        StdRng::seed_from_u64(7),
    );
    assert!(matches!(&notices[0], Notice::LoadErrors(errors) if errors.len() == 2));
    assert_eq!(notices[1], Notice::NeedsManualLoad);
    assert!(session.catalog().is_empty());
}
