pub mod export;
pub mod prompts;
pub mod render;

pub use export::{ai_prompt_text, build_ai_prompt, write_shopping_csv};
pub use prompts::{WizardAction, action_label, available_actions, prompt_yes_no, run_wizard};
pub use render::{
    candidate_card, ingredient_line, pool_labels, progress_line, shopping_table, status_text,
    summary_text,
};
