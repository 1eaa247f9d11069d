//! Heading matcher strategies.
//!
//! Each matcher is a pure `text -> Vec<String>` scan for one surface syntax
//! of a module heading. Matches are confined to a single line and trimmed.

use std::sync::LazyLock;

use regex::Regex;

/// A single heading recognition strategy.
///
/// Matchers are tried in priority order by [`crate::HeadingExtractor`].
pub trait HeadingMatcher: Send + Sync {
    /// All matching headings in document order, trimmed.
    fn find(&self, text: &str) -> Vec<String>;

    /// Human-readable matcher name for tracing.
    fn name(&self) -> &str;
}

/// A matcher backed by one line-anchored regex.
pub struct RegexMatcher {
    name: &'static str,
    pattern: &'static LazyLock<Regex>,
}

impl RegexMatcher {
    pub const fn new(name: &'static str, pattern: &'static LazyLock<Regex>) -> Self {
        Self { name, pattern }
    }
}

impl HeadingMatcher for RegexMatcher {
    fn find(&self, text: &str) -> Vec<String> {
        self.pattern
            .find_iter(text)
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    fn name(&self) -> &str {
        self.name
    }
}

// ---------------------------------------------------------------------------
// Built-in patterns
// ---------------------------------------------------------------------------

/// `Module 3: Title`
static PLAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^[ \t]*Module[ \t]+\d+:[ \t]*[^\n\r]+").expect("valid regex")
});

/// `3. Module 3: Title` or `3. Module: Title`
static NUMBERED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^[ \t]*\d+\.[ \t]*Module[ \t]*\d*:[ \t]*[^\n\r]+").expect("valid regex")
});

/// `## Module 3: Title` (H1 to H3)
static MARKDOWN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^[ \t]*#{1,3}[ \t]*Module[ \t]+\d+:[ \t]*[^\n\r]+").expect("valid regex")
});

/// Plain `Module N: Title` lines.
pub fn plain() -> RegexMatcher {
    RegexMatcher::new("plain", &PLAIN_RE)
}

/// Numbered-list `N. Module: Title` lines.
pub fn numbered() -> RegexMatcher {
    RegexMatcher::new("numbered", &NUMBERED_RE)
}

/// Markdown heading `# Module N: Title` lines.
pub fn markdown() -> RegexMatcher {
    RegexMatcher::new("markdown", &MARKDOWN_RE)
}
