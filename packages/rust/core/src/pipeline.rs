//! End-to-end course pipeline: topic → generate → extract headings → enrich → result.

use std::time::Duration;

use tokio::time::{Instant, timeout_at};

use tracing::{error, info, instrument};

use coursegen_llm::TextGenerator;
use coursegen_outline::HeadingExtractor;
use coursegen_shared::{CourseGenError, CourseResult, PipelineConfig, Result, Topic};
use coursegen_videos::VideoSearch;

use crate::enrichment;

/// Runtime options for [`build_course`].
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Total latency budget. Generation must finish within it; video searches
    /// still pending when it runs out are dropped and their modules stay empty.
    pub timeout: Duration,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::from(&PipelineConfig::default())
    }
}

impl From<&PipelineConfig> for PipelineOptions {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called before each module's video search.
    fn module_searched(&self, heading: &str, current: usize, total: usize);
    /// Called when the pipeline completes successfully.
    fn done(&self, result: &CourseResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn module_searched(&self, _heading: &str, _current: usize, _total: usize) {}
    fn done(&self, _result: &CourseResult) {}
}

/// Run the full course pipeline.
///
/// 1. Generate the course text (fatal on failure or timeout)
/// 2. Extract module headings (never fails, falls back to a fixed outline)
/// 3. Enrich up to five modules with videos (best effort per module, within
///    whatever is left of the time budget)
///
/// Generation failures and timeouts are logged here and surfaced as the
/// opaque [`CourseGenError::CourseGeneration`]. No partial result is returned.
/// Once the document exists the call always succeeds.
#[instrument(skip_all, fields(topic = %topic))]
pub async fn build_course<G, S>(
    generator: &G,
    search: Option<&S>,
    topic: &Topic,
    options: &PipelineOptions,
    progress: &dyn ProgressReporter,
) -> Result<CourseResult>
where
    G: TextGenerator,
    S: VideoSearch,
{
    let start = Instant::now();
    let deadline = start + options.timeout;

    // --- Phase 1: Generate ---
    progress.phase("Generating course");
    let document = match timeout_at(deadline, generator.generate(topic)).await {
        Ok(Ok(document)) => document,
        Ok(Err(e)) => {
            error!(error = %e, "course generation failed");
            return Err(CourseGenError::CourseGeneration);
        }
        Err(_) => {
            error!(
                timeout_secs = options.timeout.as_secs(),
                "course generation timed out"
            );
            return Err(CourseGenError::CourseGeneration);
        }
    };

    // --- Phase 2: Extract headings ---
    progress.phase("Extracting modules");
    let extraction = HeadingExtractor::new().extract(&document);
    info!(
        matcher = %extraction.source,
        headings = extraction.headings.len(),
        "module headings extracted"
    );

    // --- Phase 3: Enrich ---
    progress.phase("Searching videos");
    let modules =
        enrichment::enrich(search, &extraction.headings, topic, Some(deadline), progress).await;

    let result = CourseResult { document, modules };
    info!(
        modules = result.modules.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "course built"
    );
    progress.done(&result);
    Ok(result)
}
