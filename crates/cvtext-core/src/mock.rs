//! Mock extraction backend for testing.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::backend::{BackendError, BackendOutput, TextBackend};
use crate::DocumentRef;

/// A configurable mock response for [`MockBackend`].
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Simulate a successful extraction returning these pages.
    Text(Vec<String>),
    /// Simulate a backend that runs but finds no text (image-only page).
    Empty,
    /// Simulate a backend whose library or tool is missing.
    Unavailable(String),
    /// Simulate a parse error.
    Error(String),
}

/// A hand-rolled mock implementing [`TextBackend`] for tests.
///
/// Supports a fixed response or a sequence of responses (one per call,
/// repeating the last when exhausted), plus call counting via
/// [`call_count()`](MockBackend::call_count).
pub struct MockBackend {
    name: &'static str,
    responses: Mutex<Vec<MockResponse>>,
    fallback: MockResponse,
    call_count: AtomicUsize,
}

impl MockBackend {
    /// Create a mock that always returns `response`.
    pub fn new(name: &'static str, response: MockResponse) -> Self {
        Self {
            name,
            responses: Mutex::new(Vec::new()),
            fallback: response,
            call_count: AtomicUsize::new(0),
        }
    }

    /// Create a mock that returns responses in order, repeating the last one.
    pub fn with_sequence(name: &'static str, mut responses: Vec<MockResponse>) -> Self {
        assert!(
            !responses.is_empty(),
            "sequence must have at least one response"
        );
        responses.reverse();
        let fallback = responses[0].clone();
        Self {
            name,
            responses: Mutex::new(responses),
            fallback,
            call_count: AtomicUsize::new(0),
        }
    }

    /// Number of times [`TextBackend::extract`] was called.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    fn next_response(&self) -> MockResponse {
        let mut seq = self.responses.lock().unwrap_or_else(|e| e.into_inner());
        seq.pop().unwrap_or_else(|| self.fallback.clone())
    }
}

impl TextBackend for MockBackend {
    fn name(&self) -> &str {
        self.name
    }

    fn extract(&self, _doc: &DocumentRef) -> Result<BackendOutput, BackendError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        match self.next_response() {
            MockResponse::Text(pages) => {
                let count = pages.len();
                Ok(BackendOutput::new(pages, count))
            }
            MockResponse::Empty => Ok(BackendOutput::new(vec![String::new()], 1)),
            MockResponse::Unavailable(msg) => Err(BackendError::Unavailable(msg)),
            MockResponse::Error(msg) => Err(BackendError::ExtractionError(msg)),
        }
    }
}
