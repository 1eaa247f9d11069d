//! Per-module video enrichment.
//!
//! Looks up a couple of videos for each of the first few module headings,
//! one search at a time. Every heading ends up with a list; a failed or
//! skipped lookup yields an empty one instead of an error. Searches still
//! pending when the deadline passes are dropped the same way.

use std::sync::LazyLock;

use regex::Regex;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, info, instrument, warn};

use coursegen_shared::{CourseGenError, ModuleHeading, ModuleVideos, Topic, VideoDescriptor};
use coursegen_videos::VideoSearch;

use crate::pipeline::ProgressReporter;

/// Upper bound on headings enriched per course (and so on search calls).
pub const MAX_ENRICHED_MODULES: usize = 5;

/// Shortest heading-derived query worth searching for, in characters.
pub const MIN_QUERY_LEN: usize = 4;

static MODULE_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^Module\s+\d+:\s*").expect("valid regex"));

// ---------------------------------------------------------------------------
// Lookup outcome
// ---------------------------------------------------------------------------

/// Outcome of enriching one heading.
#[derive(Debug)]
pub enum VideoLookup {
    /// Search succeeded (possibly with zero results).
    Found(Vec<VideoDescriptor>),
    /// Query was empty or too short; no call was made.
    Degenerate,
    /// No search client configured; no call was made.
    Unconfigured,
    /// Search failed; recovered as an empty list.
    Failed(CourseGenError),
}

impl VideoLookup {
    /// Collapse the outcome to the list shown for this heading.
    pub fn into_videos(self) -> Vec<VideoDescriptor> {
        match self {
            Self::Found(videos) => videos,
            Self::Degenerate | Self::Unconfigured | Self::Failed(_) => Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Strip a leading `Module N:` and trim. `None` for degenerate queries.
pub fn derive_query(heading: &ModuleHeading) -> Option<String> {
    let query = MODULE_PREFIX_RE.replace(heading.as_str(), "");
    let query = query.trim();

    (query.chars().count() >= MIN_QUERY_LEN).then(|| query.to_string())
}

/// Full search string: the bare query plus the topic and "tutorial".
fn search_query(query: &str, topic: &Topic) -> String {
    format!("{query} {topic} tutorial")
}

// ---------------------------------------------------------------------------
// Enrichment
// ---------------------------------------------------------------------------

/// Look up videos for a single heading.
pub async fn lookup<S: VideoSearch>(
    search: Option<&S>,
    heading: &ModuleHeading,
    topic: &Topic,
) -> VideoLookup {
    let Some(search) = search else {
        return VideoLookup::Unconfigured;
    };
    let Some(query) = derive_query(heading) else {
        debug!(%heading, "degenerate query, skipping search");
        return VideoLookup::Degenerate;
    };

    match search.search(&search_query(&query, topic)).await {
        Ok(videos) => VideoLookup::Found(videos),
        Err(e) => VideoLookup::Failed(e),
    }
}

/// Look up videos for a heading, giving up at `deadline`.
async fn lookup_until<S: VideoSearch>(
    search: Option<&S>,
    heading: &ModuleHeading,
    topic: &Topic,
    deadline: Option<Instant>,
) -> VideoLookup {
    let Some(deadline) = deadline else {
        return lookup(search, heading, topic).await;
    };
    if Instant::now() >= deadline {
        return VideoLookup::Failed(budget_exhausted());
    }

    timeout_at(deadline, lookup(search, heading, topic))
        .await
        .unwrap_or_else(|_| VideoLookup::Failed(budget_exhausted()))
}

fn budget_exhausted() -> CourseGenError {
    CourseGenError::Enrichment("time budget exhausted before search completed".into())
}

/// Enrich up to [`MAX_ENRICHED_MODULES`] headings, sequentially and in order.
///
/// Never fails. With `search = None` every heading maps to an empty list
/// and no call is attempted. With a `deadline`, a search still running when
/// it passes is dropped, and every later heading gets an empty list.
#[instrument(skip_all, fields(topic = %topic, headings = headings.len()))]
pub async fn enrich<S: VideoSearch>(
    search: Option<&S>,
    headings: &[ModuleHeading],
    topic: &Topic,
    deadline: Option<Instant>,
    progress: &dyn ProgressReporter,
) -> Vec<ModuleVideos> {
    let selected = &headings[..headings.len().min(MAX_ENRICHED_MODULES)];
    let total = selected.len();
    let mut modules = Vec::with_capacity(total);
    let mut found = 0;
    let mut failed = 0;

    if search.is_none() {
        debug!("video search unconfigured, modules get no videos");
    }

    for (i, heading) in selected.iter().enumerate() {
        progress.module_searched(heading.as_str(), i + 1, total);

        let outcome = lookup_until(search, heading, topic, deadline).await;
        match &outcome {
            VideoLookup::Found(videos) => found += videos.len(),
            VideoLookup::Failed(e) => {
                failed += 1;
                warn!(%heading, error = %e, "video search failed, continuing without videos");
            }
            VideoLookup::Degenerate | VideoLookup::Unconfigured => {}
        }

        modules.push(ModuleVideos {
            heading: heading.clone(),
            videos: outcome.into_videos(),
        });
    }

    info!(modules = modules.len(), videos = found, failed, "enrichment complete");
    modules
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::pipeline::SilentProgress;
    use crate::testing::{FakeSearch, topic, video};

    fn headings(items: &[&str]) -> Vec<ModuleHeading> {
        items.iter().map(|h| ModuleHeading::new(*h)).collect()
    }

    #[test]
    fn query_strips_module_prefix() {
        let q = derive_query(&ModuleHeading::new("Module 2: Functions"));
        assert_eq!(q.as_deref(), Some("Functions"));

        let q = derive_query(&ModuleHeading::new("module 10:   Error Handling  "));
        assert_eq!(q.as_deref(), Some("Error Handling"));
    }

    #[test]
    fn query_keeps_other_prefixes() {
        let q = derive_query(&ModuleHeading::new("## Module 1: Foundations"));
        assert_eq!(q.as_deref(), Some("## Module 1: Foundations"));
    }

    #[test]
    fn short_queries_are_degenerate() {
        assert_eq!(derive_query(&ModuleHeading::new("Module 3: OOP")), None);
        assert_eq!(derive_query(&ModuleHeading::new("Module 1:")), None);
        assert_eq!(derive_query(&ModuleHeading::new("Module 1:    ")), None);
        assert_eq!(
            derive_query(&ModuleHeading::new("Module 4: Data")).as_deref(),
            Some("Data")
        );
    }

    #[test]
    fn search_query_adds_topic_and_tutorial() {
        let t = topic("Python programming");
        assert_eq!(
            search_query("Functions", &t),
            "Functions Python programming tutorial"
        );
    }

    #[test]
    fn lookup_outcomes_collapse_to_lists() {
        assert_eq!(VideoLookup::Found(vec![video("a")]).into_videos().len(), 1);
        assert!(VideoLookup::Degenerate.into_videos().is_empty());
        assert!(VideoLookup::Unconfigured.into_videos().is_empty());
        assert!(
            VideoLookup::Failed(CourseGenError::Network("boom".into()))
                .into_videos()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn every_heading_gets_videos_in_order() {
        let search = FakeSearch::returning(vec![video("v1"), video("v2")]);
        let hs = headings(&["Module 1: Basics", "Module 2: Functions"]);
        let t = topic("Python programming");

        let modules = enrich(Some(&search), &hs, &t, None, &SilentProgress).await;

        assert_eq!(modules.len(), 2);
        assert_eq!(modules[0].heading.as_str(), "Module 1: Basics");
        assert_eq!(modules[1].heading.as_str(), "Module 2: Functions");
        assert!(modules.iter().all(|m| m.videos.len() == 2));
        assert_eq!(
            search.queries(),
            vec![
                "Basics Python programming tutorial",
                "Functions Python programming tutorial",
            ]
        );
    }

    #[tokio::test]
    async fn degenerate_heading_makes_no_call() {
        let search = FakeSearch::returning(vec![video("v1")]);
        let hs = headings(&["Module 1: Basics", "Module 2: OOP", "Module 3:"]);
        let t = topic("Python programming");

        let modules = enrich(Some(&search), &hs, &t, None, &SilentProgress).await;

        assert_eq!(search.calls(), 1);
        assert_eq!(modules.len(), 3);
        assert_eq!(modules[0].videos.len(), 1);
        assert!(modules[1].videos.is_empty());
        assert!(modules[2].videos.is_empty());
    }

    #[tokio::test]
    async fn at_most_five_searches() {
        let search = FakeSearch::returning(vec![video("v")]);
        let hs: Vec<ModuleHeading> = (1..=8)
            .map(|i| ModuleHeading(format!("Module {i}: Chapter number {i}")))
            .collect();
        let t = topic("Rust");

        let modules = enrich(Some(&search), &hs, &t, None, &SilentProgress).await;

        assert_eq!(search.calls(), MAX_ENRICHED_MODULES);
        assert_eq!(modules.len(), MAX_ENRICHED_MODULES);
        assert_eq!(modules[4].heading.as_str(), "Module 5: Chapter number 5");
    }

    #[tokio::test]
    async fn unconfigured_search_yields_empty_lists() {
        let hs = headings(&["Module 1: Basics", "Module 2: Functions", "Module 3: OOP"]);
        let t = topic("Python programming");

        let modules = enrich(None::<&FakeSearch>, &hs, &t, None, &SilentProgress).await;

        assert_eq!(modules.len(), 3);
        assert!(modules.iter().all(|m| m.videos.is_empty()));
    }

    #[tokio::test]
    async fn failed_search_is_absorbed_per_heading() {
        let search = FakeSearch::returning(vec![video("v1")]).failing_on("Functions");
        let hs = headings(&["Module 1: Basics", "Module 2: Functions", "Module 3: Classes"]);
        let t = topic("Python programming");

        let modules = enrich(Some(&search), &hs, &t, None, &SilentProgress).await;

        assert_eq!(search.calls(), 3);
        assert_eq!(modules[1].heading.as_str(), "Module 2: Functions");
        assert!(modules[1].videos.is_empty());
        assert_eq!(modules[0].videos.len(), 1);
        assert_eq!(modules[2].videos.len(), 1);
    }

    #[tokio::test]
    async fn all_searches_failing_still_covers_every_heading() {
        let search = FakeSearch::returning(vec![video("v1")]).failing_on("tutorial");
        let hs = headings(&["Module 1: Basics", "Module 2: Functions"]);
        let t = topic("Python programming");

        let modules = enrich(Some(&search), &hs, &t, None, &SilentProgress).await;

        assert_eq!(modules.len(), 2);
        assert!(modules.iter().all(|m| m.videos.is_empty()));
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_cuts_off_remaining_searches() {
        let search = FakeSearch::returning(vec![video("v1")]).with_delay(Duration::from_secs(8));
        let hs = headings(&["Module 1: Basics", "Module 2: Functions", "Module 3: Classes"]);
        let t = topic("Python programming");
        let deadline = Instant::now() + Duration::from_secs(10);

        let modules = enrich(Some(&search), &hs, &t, Some(deadline), &SilentProgress).await;

        assert_eq!(modules.len(), 3);
        assert_eq!(modules[0].videos.len(), 1);
        assert!(modules[1].videos.is_empty());
        assert!(modules[2].videos.is_empty());
        // The third search is never started once the deadline has passed.
        assert_eq!(search.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_deadline_makes_no_calls() {
        let search = FakeSearch::returning(vec![video("v1")]);
        let hs = headings(&["Module 1: Basics", "Module 2: Functions"]);
        let t = topic("Python programming");
        let deadline = Instant::now();

        let modules = enrich(Some(&search), &hs, &t, Some(deadline), &SilentProgress).await;

        assert_eq!(search.calls(), 0);
        assert!(modules.iter().all(|m| m.videos.is_empty()));
    }

    #[tokio::test]
    async fn duplicate_headings_stay_separate() {
        let search = FakeSearch::returning(vec![video("v1")]);
        let hs = headings(&["Module 1: Intro", "Module 1: Intro"]);
        let t = topic("Rust");

        let modules = enrich(Some(&search), &hs, &t, None, &SilentProgress).await;

        assert_eq!(modules.len(), 2);
        assert_eq!(search.calls(), 2);
    }
}
