use crate::error::{Error, Result};
use crate::types::Policy;
use serde_json::{json, Value};
use std::future::Future;

/// Default generative-text endpoint
pub const DEFAULT_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";

/// User-visible message for every summarization failure path
pub const FAILURE_MESSAGE: &str =
    "要約の生成に失敗しました。しばらくしてからもう一度お試しください。";

/// Terminal result of a summarization request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    Success(String),
    Failure(String),
}

/// Client for the policy summarization endpoint.
///
/// One request, no retry, no caching: a bad HTTP status, a response body
/// missing the expected shape, and a transport error all collapse into
/// `SummaryOutcome::Failure` with the same user-visible message.
pub struct Summarizer {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl Summarizer {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key,
        }
    }

    /// Request a citizen-friendly summary of a policy. Never returns an
    /// error; failures surface as `SummaryOutcome::Failure`.
    pub async fn summarize(&self, policy: &Policy) -> SummaryOutcome {
        match self.request(policy).await {
            Ok(text) => SummaryOutcome::Success(text),
            Err(_) => SummaryOutcome::Failure(FAILURE_MESSAGE.to_string()),
        }
    }

    async fn request(&self, policy: &Policy) -> Result<String> {
        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": build_prompt(policy) }]
            }]
        });

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key)]);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(Error::Summarize(format!(
                "unexpected status {}",
                response.status()
            )));
        }
        let value: Value = response.json().await?;
        extract_text(&value)
            .map(|t| t.to_string())
            .ok_or_else(|| Error::Summarize("response missing candidate text".to_string()))
    }
}

/// Fixed prompt template embedding the policy fields
pub fn build_prompt(policy: &Policy) -> String {
    format!(
        "以下の政策を、市民にわかりやすい言葉で3文以内に要約してください。\n\n\
         タイトル: {}\n目的: {}\n概要: {}\n詳細計画: {}",
        policy.title, policy.purpose, policy.overview, policy.detailed_plan
    )
}

/// Pull the first candidate's first part text out of a generateContent
/// response body
pub fn extract_text(value: &Value) -> Option<&str> {
    value
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
}

/// Display state for an in-flight summarization
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SummaryState {
    #[default]
    Idle,
    Pending,
    Ready(String),
    Failed(String),
}

/// Caller-side pending tracking for a summarization task. `run` always
/// lands in a terminal state; a second invocation while pending simply
/// restarts the cycle.
#[derive(Debug, Clone, Default)]
pub struct SummaryCell {
    state: SummaryState,
}

impl SummaryCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SummaryState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state == SummaryState::Pending
    }

    /// Drive a summarization task to completion, tracking the pending
    /// state in between
    pub async fn run<F>(&mut self, task: F) -> &SummaryState
    where
        F: Future<Output = SummaryOutcome>,
    {
        self.state = SummaryState::Pending;
        self.state = match task.await {
            SummaryOutcome::Success(text) => SummaryState::Ready(text),
            SummaryOutcome::Failure(message) => SummaryState::Failed(message),
        };
        &self.state
    }
}
