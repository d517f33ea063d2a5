use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Nutri Planner: pick breakfast, two snacks, lunch and dinner for every day of the week.
#[derive(Parser, Debug)]
#[command(name = "nutri_planner")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Directory holding the saved selection and manually loaded menus.
    #[arg(short, long, global = true, default_value = ".nutri")]
    pub data_dir: PathBuf,

    /// Manifest listing the menu files, e.g. {"jsonFiles": ["menus/week1.json"]}.
    #[arg(short, long, global = true, default_value = "json_directory.json")]
    pub manifest: PathBuf,

    /// Seed for shuffling the menu pools.
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Plan the week interactively.
    Plan {
        /// Page URL the share link is attached to.
        #[arg(long, default_value = "")]
        base_url: String,
    },

    /// Show progress for every category.
    Status,

    /// Choose menu INDEX (1-based) of the current category for DAYS days.
    Select { index: usize, days: u8 },

    /// Undo the last selection.
    Undo,

    /// Print the weekly summary.
    Summary,

    /// Print a link that reproduces this week's summary.
    Share {
        /// Page URL the share link is attached to.
        #[arg(long, default_value = "")]
        base_url: String,
    },

    /// Show the summary stored in a share link without touching saved data.
    View {
        /// A share link, a `#share=` fragment or a bare token.
        link: String,
    },

    /// Load menu files by hand, replacing the manifest menus.
    Load {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Fill the whole week when each category has a single menu.
    Autofill {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },

    /// Print a prompt template followed by the weekly summary, ready for an AI assistant.
    Prompt {
        /// Text file holding the prompt, e.g. a shopping-list or Notion export request.
        template: PathBuf,
    },

    /// Aggregate the ingredients of the chosen menus.
    ShoppingList {
        /// Also write the list to this CSV file.
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Forget the selection and any manually loaded menus.
    Reset {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Plan {
            base_url: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_plan() {
        let cli = Cli::parse_from(["nutri_planner"]);
        assert!(cli.command.is_none());
        assert!(matches!(Command::default(), Command::Plan { .. }));
        assert_eq!(cli.data_dir, PathBuf::from(".nutri"));
        assert_eq!(cli.manifest, PathBuf::from("json_directory.json"));
    }

    #[test]
    fn test_select_and_global_flags() {
        let cli = Cli::parse_from(["nutri_planner", "select", "2", "3", "--seed", "5", "-v"]);
        assert_eq!(cli.seed, Some(5));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Some(Command::Select { index: 2, days: 3 })));
    }

    #[test]
    fn test_prompt_takes_template_path() {
        let cli = Cli::parse_from(["nutri_planner", "prompt", "prompts/shopping.txt"]);
        assert!(matches!(
            cli.command,
            Some(Command::Prompt { template }) if template == PathBuf::from("prompts/shopping.txt")
        ));
    }

    #[test]
    fn test_load_requires_files() {
        assert!(Cli::try_parse_from(["nutri_planner", "load"]).is_err());
    }
}
