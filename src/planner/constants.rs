/// Days in the planned week. Every category must reach exactly this many.
pub const TOTAL_DAYS: u8 = 7;

/// Version stamped into persisted and shared selection state.
pub const SCHEMA_VERSION: u32 = 1;

/// Minimum Jaro-Winkler similarity for a fuzzy menu-name match.
pub const FUZZY_MATCH_THRESHOLD: f64 = 0.7;

/// Maximum number of fuzzy matches offered to the user.
pub const MAX_SEARCH_RESULTS: usize = 5;

/// Pluralized day count, e.g. `"1 day"`, `"3 days"`.
pub fn days_label(days: u8) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", days)
    }
}
