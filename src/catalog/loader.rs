use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use serde::Deserialize;
use serde_json::Value;

use crate::catalog::{Catalog, parse_menu_document};
use crate::error::{PlannerError, Result};
use crate::models::{MealKind, MenuItem};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Manifest {
    #[serde(default)]
    json_files: Vec<String>,
}

/// Outcome of loading a set of menu files.
///
/// Loading tolerates partial failure: every file that could not be read or
/// parsed is reported in `errors` and the rest are merged into `catalog`.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub catalog: Catalog,
    pub errors: Vec<String>,
    pub files_requested: usize,
}

impl LoadReport {
    /// The manifest listed no files, so the user has to load menus by hand.
    pub fn needs_manual_load(&self) -> bool {
        self.files_requested == 0
    }
}

/// Load every menu file listed in a manifest of the form
/// `{"jsonFiles": ["menus/week1.json", ...]}`.
///
/// Paths resolve relative to the manifest's directory. A missing or
/// malformed manifest is an error; an empty list is not.
pub fn load_manifest(path: &Path) -> Result<LoadReport> {
    let content = fs::read_to_string(path)
        .map_err(|e| PlannerError::Manifest(format!("cannot read {}: {}", path.display(), e)))?;
    let manifest: Manifest = serde_json::from_str(&content)
        .map_err(|e| PlannerError::Manifest(format!("cannot parse {}: {}", path.display(), e)))?;

    if manifest.json_files.is_empty() {
        tracing::warn!("Manifest {} lists no menu files", path.display());
        return Ok(LoadReport::default());
    }

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let paths: Vec<PathBuf> = manifest.json_files.iter().map(|f| base.join(f)).collect();
    tracing::info!("Loading {} menu files from manifest", paths.len());

    Ok(load_paths(&paths))
}

/// Load user-supplied menu files. Paths without a `.json` extension are
/// reported and skipped; passing none at all is an error.
pub fn load_files(paths: &[PathBuf]) -> Result<LoadReport> {
    let (json, other): (Vec<PathBuf>, Vec<PathBuf>) = paths
        .iter()
        .cloned()
        .partition(|p| p.extension().is_some_and(|e| e.eq_ignore_ascii_case("json")));

    if json.is_empty() {
        return Err(PlannerError::InvalidInput(
            "no .json files given; menu files must have a .json extension".to_string(),
        ));
    }

    let mut report = load_paths(&json);
    report.errors.extend(
        other
            .iter()
            .map(|p| format!("{}: not a .json file", p.display())),
    );
    Ok(report)
}

/// Read and validate a single menu file.
pub fn load_file(path: &Path) -> Result<Vec<(MealKind, MenuItem)>> {
    let content = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;
    parse_menu_document(&value)
}

/// Load files in parallel and merge them in the order given.
fn load_paths(paths: &[PathBuf]) -> LoadReport {
    let results: Vec<Result<Vec<(MealKind, MenuItem)>>> = thread::scope(|scope| {
        let handles: Vec<_> = paths
            .iter()
            .map(|path| scope.spawn(move || load_file(path)))
            .collect();

        handles
            .into_iter()
            .map(|handle| {
                handle.join().unwrap_or_else(|_| {
                    Err(PlannerError::InvalidInput("menu loader thread panicked".to_string()))
                })
            })
            .collect()
    });

    let mut report = LoadReport {
        files_requested: paths.len(),
        ..LoadReport::default()
    };

    for (path, result) in paths.iter().zip(results) {
        match result {
            Ok(menus) => {
                tracing::debug!("Loaded {} menus from {}", menus.len(), path.display());
                report.catalog.extend(menus);
            }
            Err(e) => {
                tracing::warn!("Failed to load {}: {}", path.display(), e);
                report.errors.push(format!("{}: {}", path.display(), e));
            }
        }
    }

    report
}
