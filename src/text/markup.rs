use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

/// Remove every `<...>` tag from verse text, keeping the enclosed words
pub fn strip_markup(text: &str) -> String {
    TAG_RE.replace_all(text, "").into_owned()
}
