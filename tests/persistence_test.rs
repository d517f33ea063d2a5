use std::fs;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tempfile::TempDir;

use nutri_planner_rs::interface::summary_text;
use nutri_planner_rs::models::Category;
use nutri_planner_rs::planner::shopping_list;
use nutri_planner_rs::session::{Notice, Session};
use nutri_planner_rs::state::{FileStore, MenuSource, import_portable, share_url};
use nutri_planner_rs::PlannerError;

const WEEK: &str = r#"{
    "breakfast": [{"menuName": "Oats", "dishes": [{"name": "Porridge", "ingredients": [
        {"name": "Rolled oats", "metricQuantity": 50, "metricUnit": "g"},
        {"name": "Milk", "alternativeQuantity": "1 cup"}
    ]}]}],
    "snacks": [{"menuName": "Apple", "dishes": [{"name": "Apple"}]}],
    "lunch": [{"menuName": "Rice Bowl", "dishes": [{"name": "Rice"}]}],
    "dinner": [{"menuName": "Soup", "dishes": [{"name": "Lentil soup"}]}]
}"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("week.json"), WEEK).unwrap();
        fs::write(
            dir.path().join("json_directory.json"),
            r#"{"jsonFiles": ["week.json"]}"#,
        )
        .unwrap();
        Self { dir }
    }

    fn open(&self) -> (Session<FileStore>, Vec<Notice>) {
        Session::open(
            FileStore::new(self.dir.path().join(".nutri")),
            self.dir.path().join("json_directory.json"),
            StdRng::seed_from_u64(1),
        )
    }
}

#[test]
fn test_progress_survives_restart() {
    let ws = Workspace::new();
    let (mut session, _) = ws.open();
    session.choose_day_count(5).unwrap();
    session.commit().unwrap();
    let saved = session.state().clone();
    drop(session);

    let (reopened, notices) = ws.open();
    assert!(notices.is_empty());
    assert_eq!(reopened.state(), &saved);
    assert_eq!(reopened.state().remaining_days(Category::Breakfast), 2);
    assert!(reopened.state().can_undo());
    assert!(ws.dir.path().join(".nutri/nutri_selection_state.json").exists());
}

#[test]
fn test_corrupt_state_file_resets_with_notice() {
    let ws = Workspace::new();
    let store_dir = ws.dir.path().join(".nutri");
    fs::create_dir_all(&store_dir).unwrap();
    fs::write(store_dir.join("nutri_selection_state.json"), "{not json").unwrap();

    let (session, notices) = ws.open();
    assert!(matches!(notices[0], Notice::StateReset(_)));
    assert_eq!(session.state().days_allocated(Category::Breakfast), 0);
    assert!(session.state().has_pool());
}

#[test]
fn test_shared_link_reproduces_summary() {
    let ws = Workspace::new();
    let (mut session, _) = ws.open();
    assert!(session.catalog().should_offer_autofill());
    session.autofill();
    assert!(session.state().is_complete());

    let link = share_url("https://planner.test/index.html#old", session.state()).unwrap();
    assert!(link.starts_with("https://planner.test/index.html#share="));

    let shared = import_portable(&link).unwrap();
    assert_eq!(summary_text(&shared), summary_text(session.state()));
    assert_eq!(session.source(), Some(MenuSource::Directory));
}

#[test]
fn test_garbage_link_is_a_decode_error() {
    assert!(matches!(
        import_portable("https://planner.test/#share=%%%"),
        Err(PlannerError::Decode(_))
    ));
    assert!(matches!(
        import_portable("#share="),
        Err(PlannerError::Decode(_))
    ));
}

#[test]
fn test_shopping_list_scales_by_days() {
    let ws = Workspace::new();
    let (mut session, _) = ws.open();
    session.autofill();

    let items = shopping_list(session.state());
    let oats = items.iter().find(|i| i.name == "Rolled oats").unwrap();
    assert_eq!(oats.quantity, Some(350.0));
    assert_eq!(oats.unit.as_deref(), Some("g"));
    let milk = items.iter().find(|i| i.name == "Milk").unwrap();
    assert!(milk.quantity.is_none());
    assert!(!milk.notes.is_empty());
}
