use super::pattern::is_pattern;

/// Catch-all identifier, consulted only after every other match failed.
pub const WILDCARD: &str = "*";

/// Lower-cased identifier without leading scope separators.
/// Pattern identifiers are returned exactly as declared.
pub fn normalize_id(id: &str) -> String {
    if is_pattern(id) {
        return id.to_string();
    }
    id.trim_start_matches(|c| c == '\\' || c == ':').to_lowercase()
}
