//! Scripted engine shared by the pipeline unit tests.

use crate::summarization::{
    EngineError, SummarizationEngine, SummarizationRequest, SummaryLength,
};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

type Responder = Box<dyn Fn(&str) -> Result<String, EngineError> + Send + Sync>;
type Delay = Box<dyn Fn(&str) -> Duration + Send + Sync>;

/// Engine whose answers are computed from the request text.
pub(crate) struct ScriptedEngine {
    respond: Responder,
    delay: Option<Delay>,
    calls: Mutex<Vec<SummarizationRequest>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedEngine {
    pub(crate) fn new(
        respond: impl Fn(&str) -> Result<String, EngineError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            respond: Box::new(respond),
            delay: None,
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Answer with the first word of the request text.
    pub(crate) fn echo_prefix() -> Self {
        Self::new(|text| Ok(text.split_whitespace().next().unwrap_or("").to_string()))
    }

    pub(crate) fn with_delay(
        mut self,
        delay: impl Fn(&str) -> Duration + Send + Sync + 'static,
    ) -> Self {
        self.delay = Some(Box::new(delay));
        self
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().expect("calls lock").len()
    }

    pub(crate) fn texts(&self) -> Vec<String> {
        self.calls
            .lock()
            .expect("calls lock")
            .iter()
            .map(|request| request.text.clone())
            .collect()
    }

    pub(crate) fn lengths(&self) -> Vec<SummaryLength> {
        self.calls
            .lock()
            .expect("calls lock")
            .iter()
            .map(|request| request.length)
            .collect()
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SummarizationEngine for ScriptedEngine {
    async fn summarize(&self, request: SummarizationRequest) -> Result<String, EngineError> {
        self.calls.lock().expect("calls lock").push(request.clone());
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some(delay) = self.delay.as_ref() {
            tokio::time::sleep(delay(&request.text)).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        (self.respond)(&request.text)
    }
}

/// Build `count` distinct words sharing a prefix, e.g. `a-0 a-1 a-2`.
pub(crate) fn words(prefix: &str, count: usize) -> String {
    (0..count)
        .map(|index| format!("{prefix}-{index}"))
        .collect::<Vec<_>>()
        .join(" ")
}
