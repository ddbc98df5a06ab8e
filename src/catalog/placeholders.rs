/*!
 * Format-specifier detection for catalog strings.
 *
 * Recognizes the printf-style tokens used by Foundation strings: `%@`,
 * positional forms such as `%1$@`, and the length-modified `%l` forms
 * such as `%lld`. Tokens must survive translation verbatim.
 */

use once_cell::sync::Lazy;
use regex::Regex;

static PLACEHOLDER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"%(\d+\$)?[@dDuUxXoOfFeEgGcCsSpaA]|%l[ldufega]")
        .expect("placeholder pattern is a valid regex")
});

/// Returns true when `text` contains at least one placeholder token
pub fn has_placeholders(text: &str) -> bool {
    PLACEHOLDER_PATTERN.is_match(text)
}

/// Extract placeholder tokens in order of first occurrence, without duplicates
pub fn extract_placeholders(text: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for found in PLACEHOLDER_PATTERN.find_iter(text) {
        let token = found.as_str();
        if !tokens.iter().any(|t| t == token) {
            tokens.push(token.to_string());
        }
    }
    tokens
}
