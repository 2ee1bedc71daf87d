/// Fuzzy book-name predicate tolerant of each translation's naming style
///
/// A name matches when it contains a long-form marker together with the
/// distinguishing keyword (e.g. "The Second Epistle of Paul to Timothy"),
/// or when it contains one of the short forms (e.g. "2 Timothy").
#[derive(Debug, Clone)]
pub struct BookMatcher {
    /// Long-form markers, lowercase (e.g. "second epistle")
    pub long_markers: Vec<String>,
    /// Word that must accompany a long-form marker, lowercase
    pub keyword: String,
    /// Short canonical spellings, lowercase (e.g. "2 timothy")
    pub short_forms: Vec<String>,
}

impl Default for BookMatcher {
    fn default() -> Self {
        Self {
            long_markers: vec!["second epistle".to_string()],
            keyword: "timothy".to_string(),
            short_forms: vec!["2 timothy".to_string()],
        }
    }
}

impl BookMatcher {
    pub fn new(
        long_markers: impl IntoIterator<Item = String>,
        keyword: impl Into<String>,
        short_forms: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            long_markers: long_markers.into_iter().map(|m| m.to_lowercase()).collect(),
            keyword: keyword.into().to_lowercase(),
            short_forms: short_forms.into_iter().map(|s| s.to_lowercase()).collect(),
        }
    }

    /// Add another accepted short spelling
    pub fn with_short_form(mut self, form: impl Into<String>) -> Self {
        self.short_forms.push(form.into().to_lowercase());
        self
    }

    /// Test an already lowercased, trimmed book name
    pub fn matches_normalized(&self, name: &str) -> bool {
        let long_form = !self.keyword.is_empty()
            && name.contains(self.keyword.as_str())
            && self.long_markers.iter().any(|m| name.contains(m.as_str()));
        long_form || self.short_forms.iter().any(|s| name.contains(s.as_str()))
    }

    /// Test a book name as it appears in a verse table
    pub fn matches(&self, name: &str) -> bool {
        self.matches_normalized(&name.trim().to_lowercase())
    }
}

/// Where a composed book lives in the document tree
#[derive(Debug, Clone)]
pub struct BookTarget {
    /// Display name used in messages
    pub label: String,
    /// Slug used for the book directory and file names (e.g. "2-timothy")
    pub slug: String,
    /// Testament directory (e.g. "new-testament")
    pub testament: String,
    pub matcher: BookMatcher,
}

impl Default for BookTarget {
    fn default() -> Self {
        Self {
            label: "2 Timothy".to_string(),
            slug: "2-timothy".to_string(),
            testament: "new-testament".to_string(),
            matcher: BookMatcher::default(),
        }
    }
}
