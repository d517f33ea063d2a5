use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

use crate::error::{PlannerError, Result};
use crate::planner::SelectionState;
use crate::state::schema::decode_state;

/// URL fragment prefix carrying a shared state token.
pub const SHARE_PREFIX: &str = "#share=";

/// Encode the full state as a self-contained token (base64 of compact JSON).
pub fn export_portable(state: &SelectionState) -> Result<String> {
    let json = serde_json::to_string(state)?;
    Ok(STANDARD.encode(json))
}

/// `base` with the state token attached as a `#share=` fragment.
pub fn share_url(base: &str, state: &SelectionState) -> Result<String> {
    let base = base.split('#').next().unwrap_or_default();
    Ok(format!("{}{}{}", base, SHARE_PREFIX, export_portable(state)?))
}

/// Pull the token out of a full URL, a bare fragment or a bare token.
pub fn extract_token(input: &str) -> &str {
    let input = input.trim();
    match input.find(SHARE_PREFIX) {
        Some(pos) => &input[pos + SHARE_PREFIX.len()..],
        None => input,
    }
}

/// Decode a shared token back into a validated state.
///
/// Tokens produced by the old browser planner are accepted too.
pub fn import_portable(input: &str) -> Result<SelectionState> {
    let token = extract_token(input);
    if token.is_empty() {
        return Err(PlannerError::Decode("empty share token".to_string()));
    }

    let bytes = STANDARD
        .decode(token)
        .map_err(|e| PlannerError::Decode(format!("invalid base64: {}", e)))?;
    // Browser tokens were written one Latin-1 byte per character.
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => e.into_bytes().iter().map(|&b| b as char).collect(),
    };
    let value: Value = serde_json::from_str(&text)
        .map_err(|e| PlannerError::Decode(format!("invalid JSON: {}", e)))?;

    decode_state(value).map_err(PlannerError::Decode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_token_forms() {
        assert_eq!(extract_token("abc"), "abc");
        assert_eq!(extract_token("#share=abc"), "abc");
        assert_eq!(
            extract_token(" https://example.org/planner/#share=abc== "),
            "abc=="
        );
    }

    #[test]
    fn test_share_url_replaces_existing_fragment() {
        let state = SelectionState::new();
        let url = share_url("https://example.org/#old", &state).unwrap();
        assert!(url.starts_with("https://example.org/#share="));
        assert_eq!(import_portable(&url).unwrap(), state);
    }

    #[test]
    fn test_corrupt_tokens_are_decode_errors() {
        for bad in ["", "#share=", "!!!", "bm90IGpzb24="] {
            assert!(matches!(import_portable(bad), Err(PlannerError::Decode(_))));
        }
    }

    #[test]
    fn test_imports_legacy_browser_token() {
        let legacy = r#"{"dinner":[{"menuName":"Soup","daysUsed":7,"dishes":[]}],"currentCategoryIndex":0}"#;
        let token = STANDARD.encode(legacy);
        let state = import_portable(&token).unwrap();
        assert_eq!(
            state.selections(crate::models::Category::Dinner)[0].menu_name,
            "Soup"
        );
    }

    #[test]
    fn test_imports_latin1_browser_token() {
        let legacy = r#"{"dinner":[{"menuName":"Café con leche","daysUsed":7,"dishes":[{"name":"Piña"}]}],"currentCategoryIndex":5}"#;
        let latin1: Vec<u8> = legacy.chars().map(|c| c as u32 as u8).collect();
        assert!(String::from_utf8(latin1.clone()).is_err());

        let state = import_portable(&format!("#share={}", STANDARD.encode(latin1))).unwrap();
        let dinner = &state.selections(crate::models::Category::Dinner)[0];
        assert_eq!(dinner.menu_name, "Café con leche");
        assert_eq!(dinner.dishes[0].name, "Piña");
    }
}
