use unicode_normalization::UnicodeNormalization;

/// Known artifacts of UTF-8 punctuation decoded as Windows-1252, in the
/// order they are applied. Only these exact sequences are repaired; any
/// other `â€` artifact is left in place.
pub const MOJIBAKE_REPLACEMENTS: &[(&str, &str)] = &[
    ("â€™", "'"),
    ("â€˜", "'"),
    ("â€œ", "\""),
    ("â€\u{9d}", "\""),
    ("â€”", "—"),
    ("â€“", "-"),
    ("â€¦", "..."),
    ("â€ ", "\""),
    ("Â", ""),
];

/// Apply the replacement table without any other normalization
pub fn replace_artifacts(text: &str) -> String {
    MOJIBAKE_REPLACEMENTS
        .iter()
        .fold(text.to_string(), |acc, (bad, good)| {
            if acc.contains(bad) {
                acc.replace(bad, good)
            } else {
                acc
            }
        })
}

/// NFC-normalize, repair known artifacts, and trim a text field
///
/// Returns the cleaned text and whether it differs from the input.
pub fn clean_text(text: &str) -> (String, bool) {
    let composed: String = text.nfc().collect();
    let cleaned = replace_artifacts(&composed).trim().to_string();
    let changed = cleaned != text;
    (cleaned, changed)
}
