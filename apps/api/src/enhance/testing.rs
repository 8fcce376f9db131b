//! Scripted upstream provider shared by the endpoint and client tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use parking_lot::Mutex;

use crate::llm_client::{CompletionProvider, FragmentStream, LlmError};
use crate::state::AppState;

#[derive(Debug, Clone)]
pub enum Step {
    Fragment(&'static str),
    Fail(&'static str),
}

pub struct ScriptedProvider {
    steps: Vec<Step>,
    open_error: Option<&'static str>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new(steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            steps,
            open_error: None,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing_open(message: &'static str) -> Arc<Self> {
        Arc::new(Self {
            steps: Vec::new(),
            open_error: Some(message),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

fn api_error(message: &str) -> LlmError {
    LlmError::Api {
        status: 500,
        message: message.to_string(),
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn stream_completion(&self, prompt: &str) -> Result<FragmentStream, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().push(prompt.to_string());

        if let Some(message) = self.open_error {
            return Err(api_error(message));
        }

        let items: Vec<Result<String, LlmError>> = self
            .steps
            .iter()
            .map(|step| match step {
                Step::Fragment(text) => Ok(text.to_string()),
                Step::Fail(message) => Err(api_error(message)),
            })
            .collect();
        Ok(stream::iter(items).boxed())
    }
}

pub fn test_state(provider: Option<Arc<ScriptedProvider>>) -> AppState {
    AppState {
        llm: provider.map(|p| p as Arc<dyn CompletionProvider>),
    }
}
