/// Identifiers treated as English. Matching is exact.
pub const ENGLISH_ALIASES: [&str; 2] = ["english", "en"];

/// Language names offered by the UI, mapped to the codes the translation
/// service expects.
static NAMED_LANGUAGES: &[(&str, &str)] = &[
    ("arabic", "ar"),
    ("assamese", "as"),
    ("bengali", "bn"),
    ("chinese", "zh-CN"),
    ("french", "fr"),
    ("german", "de"),
    ("gujarati", "gu"),
    ("hindi", "hi"),
    ("italian", "it"),
    ("japanese", "ja"),
    ("kannada", "kn"),
    ("malayalam", "ml"),
    ("marathi", "mr"),
    ("nepali", "ne"),
    ("odia", "or"),
    ("portuguese", "pt"),
    ("punjabi", "pa"),
    ("russian", "ru"),
    ("spanish", "es"),
    ("swahili", "sw"),
    ("tamil", "ta"),
    ("telugu", "te"),
    ("urdu", "ur"),
];

#[inline]
pub fn is_english(lang: &str) -> bool {
    ENGLISH_ALIASES.contains(&lang)
}

/// Resolve a UI language name to a service code. Anything not in the table
/// is passed through trimmed, so raw codes like `fr` keep working.
pub fn language_code(lang: &str) -> &str {
    let lang = lang.trim();
    NAMED_LANGUAGES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(lang))
        .map(|(_, code)| *code)
        .unwrap_or(lang)
}
