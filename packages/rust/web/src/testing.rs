//! Fakes for driving the router without network access.

use std::sync::atomic::{AtomicUsize, Ordering};

use coursegen_llm::TextGenerator;
use coursegen_shared::{CourseDocument, CourseGenError, Result, Topic, VideoDescriptor};
use coursegen_videos::VideoSearch;

pub(crate) fn video(id: &str) -> VideoDescriptor {
    VideoDescriptor {
        title: format!("Video {id}"),
        channel: "Test Channel".into(),
        thumbnail_url: None,
        embed_url: format!("https://www.youtube.com/embed/{id}"),
        published_at: None,
    }
}

/// Counting generator; fails with a detailed error when built with `failing`.
pub(crate) struct FakeGenerator {
    text: Option<String>,
    pub calls: AtomicUsize,
}

impl FakeGenerator {
    pub fn ok(text: &str) -> Self {
        Self {
            text: Some(text.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            text: None,
            calls: AtomicUsize::new(0),
        }
    }
}

impl TextGenerator for FakeGenerator {
    async fn generate(&self, topic: &Topic) -> Result<CourseDocument> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.text {
            Some(text) => Ok(CourseDocument {
                topic: topic.clone(),
                text: text.clone(),
            }),
            None => Err(CourseGenError::Generation("HTTP 502: upstream exploded".into())),
        }
    }
}

pub(crate) struct FakeSearch {
    results: Vec<VideoDescriptor>,
}

impl FakeSearch {
    pub fn returning(results: Vec<VideoDescriptor>) -> Self {
        Self { results }
    }
}

impl VideoSearch for FakeSearch {
    async fn search(&self, _query: &str) -> Result<Vec<VideoDescriptor>> {
        Ok(self.results.clone())
    }
}
