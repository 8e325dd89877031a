//! Supported-language clamp for `/detect-language/`

/// Languages the service recognises as hints
pub const SUPPORTED_LANGUAGES: [&str; 5] = ["English", "Tamil", "Telugu", "Malayalam", "Kannada"];

/// Language assumed when the hint is missing or unsupported
pub const DEFAULT_LANGUAGE: &str = "English";

/// Return the hint when it names a supported language, else [`DEFAULT_LANGUAGE`]
///
/// Matching is exact, so `"tamil"` falls back to English.
pub fn resolve_language(hint: Option<&str>) -> &'static str {
    hint.and_then(|hint| SUPPORTED_LANGUAGES.iter().find(|lang| **lang == hint))
        .copied()
        .unwrap_or(DEFAULT_LANGUAGE)
}
