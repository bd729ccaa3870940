//! Mock Search Client
//!
//! For tests and offline runs. Returns canned text or a canned error.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::SearchClient;
use crate::error::{Result, SearchError};

type ErrorFactory = Box<dyn Fn() -> SearchError + Send + Sync>;

enum Behavior {
    Results(String),
    Fail(ErrorFactory),
}

/// Mock search client with static results
pub struct MockSearchClient {
    behavior: Behavior,
    calls: AtomicUsize,
}

impl MockSearchClient {
    /// Answer every query with the same text
    pub fn with_results(results: impl Into<String>) -> Self {
        Self {
            behavior: Behavior::Results(results.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fail every query with a freshly built error
    pub fn failing(error: impl Fn() -> SearchError + Send + Sync + 'static) -> Self {
        Self {
            behavior: Behavior::Fail(Box::new(error)),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of searches performed
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchClient for MockSearchClient {
    async fn search(&self, _query: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Results(text) => Ok(text.clone()),
            Behavior::Fail(make_error) => Err(make_error()),
        }
    }

    fn name(&self) -> &str {
        "MockSearch"
    }
}
