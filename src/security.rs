use crate::error::AppError;

/// Maximum accepted length for a free-text search term.
const MAX_SEARCH_LEN: usize = 120;

/// Escapes ILIKE pattern metacharacters in a user-supplied search term.
///
/// The term is always bound as a query parameter, so this is not about SQL
/// injection; it stops `%`, `_`, and `\` in the input from acting as wildcards
/// inside the pattern we build around it.
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\\' | '%' | '_' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Normalizes a search term: trims surrounding whitespace, rejects empty or
/// oversized input, and escapes pattern metacharacters.
pub fn normalize_search_term(input: &str) -> Result<String, AppError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest("Search term must not be empty".into()));
    }
    if trimmed.len() > MAX_SEARCH_LEN {
        return Err(AppError::BadRequest("Search term too long".into()));
    }
    Ok(escape_like(trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("coffee"), "coffee");
        assert_eq!(escape_like("100% arabica"), "100\\% arabica");
        assert_eq!(escape_like("snake_case"), "snake\\_case");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn test_normalize_search_term() {
        assert_eq!(normalize_search_term("  bakery ").unwrap(), "bakery");
        assert!(normalize_search_term("   ").is_err());
        assert!(normalize_search_term(&"a".repeat(121)).is_err());
    }
}
