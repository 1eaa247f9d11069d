//! Core domain types for a generated course.
//!
//! Every value here is built fresh per request and dropped with the response.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::ValidationConfig;
use crate::error::{CourseGenError, Result};

// ---------------------------------------------------------------------------
// Topic
// ---------------------------------------------------------------------------

/// A validated, trimmed course topic.
///
/// Only constructible through [`Topic::parse`], so holding one means the
/// length and denylist checks already passed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Topic(String);

impl Topic {
    /// Trim and validate raw user input.
    pub fn parse(raw: &str, rules: &ValidationConfig) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CourseGenError::validation("topic is missing"));
        }

        let len = trimmed.chars().count();
        if len < rules.min_topic_len {
            return Err(CourseGenError::validation(format!(
                "topic must be at least {} characters",
                rules.min_topic_len
            )));
        }
        if len > rules.max_topic_len {
            return Err(CourseGenError::validation(format!(
                "topic must be at most {} characters",
                rules.max_topic_len
            )));
        }

        if let Some(term) = denylisted_term(trimmed, &rules.denylist) {
            return Err(CourseGenError::validation(format!(
                "topic contains a disallowed term: {term}"
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Return the first denylist entry that appears as a whole word or phrase in `text`.
///
/// Matching is case-insensitive. Words of a multi-word entry may be separated
/// by any whitespace, and entries may contain punctuation (`c++`).
fn denylisted_term<'a>(text: &str, denylist: &'a [String]) -> Option<&'a str> {
    denylist
        .iter()
        .map(|term| term.trim())
        .filter(|term| !term.is_empty())
        .find(|term| term_pattern(term).is_ok_and(|re| re.is_match(text)))
}

fn term_pattern(term: &str) -> std::result::Result<Regex, regex::Error> {
    let words: Vec<String> = term.split_whitespace().map(regex::escape).collect();
    Regex::new(&format!(r"(?i)(?:^|\W){}(?:\W|$)", words.join(r"\s+")))
}

// ---------------------------------------------------------------------------
// CourseDocument
// ---------------------------------------------------------------------------

/// Raw text returned by the text generation service.
///
/// No structure is guaranteed; headings are recovered by pattern matching.
#[derive(Debug, Clone, Serialize)]
pub struct CourseDocument {
    /// Topic the document was generated for.
    pub topic: Topic,
    /// Generated Markdown-ish text, unmodified.
    pub text: String,
}

// ---------------------------------------------------------------------------
// ModuleHeading
// ---------------------------------------------------------------------------

/// A section title recovered from a [`CourseDocument`], e.g. `Module 2: Functions`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleHeading(pub String);

impl ModuleHeading {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ModuleHeading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Videos
// ---------------------------------------------------------------------------

/// One video search result, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoDescriptor {
    /// Video title.
    pub title: String,
    /// Channel display name.
    pub channel: String,
    /// Best available thumbnail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Embeddable player URL.
    pub embed_url: String,
    /// Publish timestamp, when the provider reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

/// Videos attached to one module heading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleVideos {
    pub heading: ModuleHeading,
    pub videos: Vec<VideoDescriptor>,
}

// ---------------------------------------------------------------------------
// CourseResult
// ---------------------------------------------------------------------------

/// Output of the course-assembly pipeline.
///
/// `modules` keeps extraction order and keeps duplicate headings as separate entries.
#[derive(Debug, Clone)]
pub struct CourseResult {
    pub document: CourseDocument,
    pub modules: Vec<ModuleVideos>,
}

impl Serialize for CourseResult {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("CourseResult", 3)?;
        state.serialize_field("topic", &self.document.topic)?;
        state.serialize_field("document", &self.document.text)?;
        state.serialize_field("videos_by_module", &self.modules)?;
        state.end()
    }
}

impl CourseResult {
    /// The generated course text.
    pub fn text(&self) -> &str {
        &self.document.text
    }

    /// Headings in extraction order.
    pub fn headings(&self) -> impl Iterator<Item = &ModuleHeading> {
        self.modules.iter().map(|m| &m.heading)
    }

    /// Videos for the first module with this exact heading.
    pub fn videos_for(&self, heading: &str) -> Option<&[VideoDescriptor]> {
        self.modules
            .iter()
            .find(|m| m.heading.as_str() == heading)
            .map(|m| m.videos.as_slice())
    }
}
