use strsim::jaro_winkler;

use crate::models::PoolEntry;
use crate::planner::constants::{FUZZY_MATCH_THRESHOLD, MAX_SEARCH_RESULTS};

/// A pool entry matching a name query.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchMatch {
    pub index: usize,
    pub menu_name: String,
    pub score: f64,
}

/// Find menus in `pool` by name.
///
/// Exact case-insensitive matches win outright. Otherwise substring hits and
/// fuzzy matches above [`FUZZY_MATCH_THRESHOLD`] are ranked by similarity.
pub fn search_pool(pool: &[PoolEntry], query: &str) -> Vec<SearchMatch> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let exact: Vec<SearchMatch> = pool
        .iter()
        .enumerate()
        .filter(|(_, e)| e.menu.menu_name.to_lowercase() == query)
        .map(|(index, e)| SearchMatch {
            index,
            menu_name: e.menu.menu_name.clone(),
            score: 1.0,
        })
        .collect();
    if !exact.is_empty() {
        return exact;
    }

    let mut candidates: Vec<SearchMatch> = pool
        .iter()
        .enumerate()
        .map(|(index, e)| {
            let name = e.menu.menu_name.to_lowercase();
            let mut score = jaro_winkler(&name, &query);
            if name.contains(&query) {
                score = score.max(0.9);
            }
            SearchMatch {
                index,
                menu_name: e.menu.menu_name.clone(),
                score,
            }
        })
        .filter(|m| m.score > FUZZY_MATCH_THRESHOLD)
        .collect();

    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    candidates.truncate(MAX_SEARCH_RESULTS);
    candidates
}
