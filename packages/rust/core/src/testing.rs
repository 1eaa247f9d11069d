//! In-memory fakes for the generator and video search seams.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use coursegen_llm::TextGenerator;
use coursegen_shared::{
    CourseDocument, CourseGenError, Result, Topic, ValidationConfig, VideoDescriptor,
};
use coursegen_videos::VideoSearch;

pub(crate) fn topic(raw: &str) -> Topic {
    Topic::parse(raw, &ValidationConfig::default()).unwrap()
}

pub(crate) fn video(title: &str) -> VideoDescriptor {
    VideoDescriptor {
        title: title.into(),
        channel: "Test Channel".into(),
        thumbnail_url: Some(format!("https://i.ytimg.com/vi/{title}/hqdefault.jpg")),
        embed_url: format!("https://www.youtube.com/embed/{title}"),
        published_at: None,
    }
}

/// Generator returning canned text, or failing when `text` is `None`.
pub(crate) struct FakeGenerator {
    text: Option<String>,
    delay: Option<Duration>,
    pub calls: AtomicUsize,
}

impl FakeGenerator {
    pub fn ok(text: &str) -> Self {
        Self {
            text: Some(text.into()),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            text: None,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn slow(text: &str, delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::ok(text)
        }
    }
}

impl TextGenerator for FakeGenerator {
    async fn generate(&self, topic: &Topic) -> Result<CourseDocument> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.text {
            Some(text) => Ok(CourseDocument {
                topic: topic.clone(),
                text: text.clone(),
            }),
            None => Err(CourseGenError::Generation("HTTP 500: upstream exploded".into())),
        }
    }
}

/// Search returning `results` for every query, failing for queries containing `fail_on`.
pub(crate) struct FakeSearch {
    results: Vec<VideoDescriptor>,
    fail_on: Option<String>,
    delay: Option<Duration>,
    queries: Mutex<Vec<String>>,
}

impl FakeSearch {
    pub fn returning(results: Vec<VideoDescriptor>) -> Self {
        Self {
            results,
            fail_on: None,
            delay: None,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_on(mut self, needle: &str) -> Self {
        self.fail_on = Some(needle.into());
        self
    }

    /// Sleep this long inside every search.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

impl VideoSearch for FakeSearch {
    async fn search(&self, query: &str) -> Result<Vec<VideoDescriptor>> {
        self.queries.lock().unwrap().push(query.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.fail_on {
            Some(needle) if query.contains(needle.as_str()) => {
                Err(CourseGenError::Network("connection reset by peer".into()))
            }
            _ => Ok(self.results.clone()),
        }
    }
}
