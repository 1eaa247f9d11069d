//! Course text generation against a hosted chat-completions API.
//!
//! The generator interpolates the topic into a fixed instructional template
//! ([`prompt::build_prompt`]), sends it as a single `user` turn, and returns
//! the completion text unmodified. Failures are reported once; there is no retry.

pub mod prompt;

use std::future::Future;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use coursegen_shared::{CourseDocument, CourseGenError, Credentials, OpenAiConfig, Result, Topic};

pub use prompt::build_prompt;

/// User-Agent string for generation requests.
const USER_AGENT: &str = concat!("CourseGen/", env!("CARGO_PKG_VERSION"));

/// Longest slice of an error body echoed into an error message.
const ERROR_BODY_PREVIEW: usize = 200;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Produces a raw course document for a validated topic.
pub trait TextGenerator: Send + Sync {
    /// Generate the course text. Errors are `CourseGenError::Generation`.
    fn generate(&self, topic: &Topic) -> impl Future<Output = Result<CourseDocument>> + Send;
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

// ---------------------------------------------------------------------------
// OpenAI client
// ---------------------------------------------------------------------------

/// Text generator backed by an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiGenerator {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiGenerator {
    /// Create a generator from config and resolved credentials.
    pub fn new(config: &OpenAiConfig, credentials: &Credentials) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()
            .map_err(|e| CourseGenError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: chat_endpoint(&config.base_url),
            api_key: credentials.openai_api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    /// Model ID used for requests.
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl TextGenerator for OpenAiGenerator {
    #[instrument(skip_all, fields(topic = %topic, model = %self.model))]
    async fn generate(&self, topic: &Topic) -> Result<CourseDocument> {
        let prompt = build_prompt(topic);
        let request = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: &prompt,
            }],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        debug!(endpoint = %self.endpoint, prompt_len = prompt.len(), "requesting course text");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| CourseGenError::Generation(format!("request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CourseGenError::Generation(format!("failed to read body: {e}")))?;

        if !status.is_success() {
            return Err(CourseGenError::Generation(format!(
                "HTTP {status}: {}",
                preview(&body)
            )));
        }

        let text = parse_completion(&body)?;
        info!(chars = text.len(), "course text generated");

        Ok(CourseDocument {
            topic: topic.clone(),
            text,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve the chat completions endpoint from the base URL.
fn chat_endpoint(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if base.ends_with("/chat/completions") {
        base.to_string()
    } else {
        format!("{base}/chat/completions")
    }
}

/// Extract `choices[0].message.content`, rejecting missing or blank output.
fn parse_completion(body: &str) -> Result<String> {
    let parsed: ChatResponse = serde_json::from_str(body).map_err(|e| {
        CourseGenError::Generation(format!("invalid response: {e} (got: {})", preview(body)))
    })?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| CourseGenError::Generation("response contained no course text".into()))
}

fn preview(body: &str) -> &str {
    match body.char_indices().nth(ERROR_BODY_PREVIEW) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
