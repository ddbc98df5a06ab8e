/*!
 * Tests for language utilities
 */

use xcstrings_translator::language_utils::{
    SUPPORTED_LANGUAGES, base_language, find_supported_language, get_language_name, validate_language_code,
};

/// Every supported identifier validates and has a display name
#[test]
fn test_supported_languages_should_all_validate() {
    for language in SUPPORTED_LANGUAGES {
        assert!(validate_language_code(language.code).is_ok(), "{}", language.code);
        assert_eq!(get_language_name(language.code), language.name);
    }
}

/// Region and script subtags are stripped to the base language
#[test]
fn test_base_language_with_subtags_should_return_base() {
    assert_eq!(base_language("pt-BR"), "pt");
    assert_eq!(base_language("zh-Hans"), "zh");
    assert_eq!(base_language("en_GB"), "en");
    assert_eq!(base_language("fr"), "fr");
}

/// Unknown identifiers are rejected but still displayable
#[test]
fn test_unknown_language_code_should_fail_validation_and_echo_name() {
    assert!(validate_language_code("zz").is_err());
    assert!(validate_language_code("").is_err());
    assert_eq!(get_language_name("zz"), "zz");
}

/// Lookup in the supported list is exact
#[test]
fn test_find_supported_language_should_match_exact_identifier() {
    assert_eq!(find_supported_language("es-MX").map(|l| l.name), Some("Spanish (Mexico)"));
    assert!(find_supported_language("es-AR").is_none());
    assert!(validate_language_code("es-AR").is_ok());
}
