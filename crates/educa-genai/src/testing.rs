//! A scripted provider for tests.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::{GenerationError, Result};
use crate::provider::ContentProvider;
use crate::wire::{GenerateContentRequest, GenerateContentResponse};

/// One request seen by a [`ScriptedProvider`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// Model the request targeted.
    pub model: String,
    /// The request as sent.
    pub request: GenerateContentRequest,
}

#[derive(Debug, Default)]
struct Script {
    replies: VecDeque<Result<GenerateContentResponse>>,
    calls: Vec<RecordedCall>,
}

/// Answers requests from a queue of prepared replies and records every call.
///
/// An exhausted queue answers with an empty response, which the tasks treat
/// as "no content".
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    script: Mutex<Script>,
}

impl ScriptedProvider {
    /// Creates a provider with no prepared replies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Queues a full response.
    pub fn push_response(&self, response: GenerateContentResponse) {
        self.lock().replies.push_back(Ok(response));
    }

    /// Queues a response holding a single text part.
    pub fn push_text(&self, text: impl Into<String>) {
        self.push_response(GenerateContentResponse::from_text(text));
    }

    /// Queues a failure.
    pub fn push_error(&self, error: GenerationError) {
        self.lock().replies.push_back(Err(error));
    }

    /// Calls received so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }
}

#[async_trait]
impl ContentProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let mut script = self.lock();
        script.calls.push(RecordedCall {
            model: model.to_string(),
            request: request.clone(),
        });
        script
            .replies
            .pop_front()
            .unwrap_or_else(|| Ok(GenerateContentResponse::default()))
    }
}
