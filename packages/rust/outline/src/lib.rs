//! Module heading extraction from generated course text.
//!
//! Generated text has no guaranteed grammar, so headings are recovered by an
//! ordered list of [`HeadingMatcher`] strategies. The first matcher that finds
//! anything wins; if none do, a fixed synthetic outline is returned so
//! enrichment always has headings to work with.

pub mod matchers;

use std::sync::LazyLock;

use tracing::{debug, instrument};

use coursegen_shared::{CourseDocument, ModuleHeading, Topic};

pub use matchers::{HeadingMatcher, RegexMatcher};

/// Name reported when no matcher fired.
pub const FALLBACK_NAME: &str = "fallback";

static DEFAULT_EXTRACTOR: LazyLock<HeadingExtractor> = LazyLock::new(HeadingExtractor::new);

// ---------------------------------------------------------------------------
// Extraction result
// ---------------------------------------------------------------------------

/// Headings plus the strategy that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub headings: Vec<ModuleHeading>,
    /// Matcher name, or [`FALLBACK_NAME`].
    pub source: String,
}

impl Extraction {
    pub fn is_fallback(&self) -> bool {
        self.source == FALLBACK_NAME
    }
}

// ---------------------------------------------------------------------------
// Extractor
// ---------------------------------------------------------------------------

/// Holds heading matchers in priority order.
pub struct HeadingExtractor {
    matchers: Vec<Box<dyn HeadingMatcher>>,
}

impl HeadingExtractor {
    /// Built-in matchers: plain, then numbered list, then Markdown heading.
    pub fn new() -> Self {
        Self::with_matchers(vec![
            Box::new(matchers::plain()),
            Box::new(matchers::numbered()),
            Box::new(matchers::markdown()),
        ])
    }

    /// Use a custom matcher list (tried in the given order).
    pub fn with_matchers(matchers: Vec<Box<dyn HeadingMatcher>>) -> Self {
        Self { matchers }
    }

    /// Names of the registered matchers, in priority order.
    pub fn matcher_names(&self) -> Vec<&str> {
        self.matchers.iter().map(|m| m.name()).collect()
    }

    /// Run the matchers against `doc`, falling back to the synthetic outline.
    #[instrument(skip_all, fields(chars = doc.text.len()))]
    pub fn extract(&self, doc: &CourseDocument) -> Extraction {
        for matcher in &self.matchers {
            let found = matcher.find(&doc.text);
            if !found.is_empty() {
                debug!(matcher = matcher.name(), count = found.len(), "headings matched");
                return Extraction {
                    headings: found.into_iter().map(ModuleHeading).collect(),
                    source: matcher.name().to_string(),
                };
            }
        }

        debug!("no heading matcher fired, using fallback outline");
        Extraction {
            headings: fallback_headings(&doc.topic),
            source: FALLBACK_NAME.to_string(),
        }
    }
}

impl Default for HeadingExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract ordered module headings with the built-in matchers.
pub fn extract_headings(doc: &CourseDocument) -> Vec<ModuleHeading> {
    DEFAULT_EXTRACTOR.extract(doc).headings
}

/// Fixed four-module outline used when nothing in the text looks like a heading.
pub fn fallback_headings(topic: &Topic) -> Vec<ModuleHeading> {
    vec![
        ModuleHeading(format!("Module 1: Introduction to {topic}")),
        ModuleHeading::new("Module 2: Core Concepts"),
        ModuleHeading::new("Module 3: Practical Applications"),
        ModuleHeading::new("Module 4: Advanced Topics"),
    ]
}
