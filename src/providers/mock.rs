/*!
 * Mock correctors for testing.
 *
 * - `MockCorrector::working()` - Echoes the text behind a gender tag, the way
 *   a chatty correction model sometimes does
 * - `MockCorrector::intermittent(n)` - Fails every nth request
 * - `MockCorrector::failing()` - Always fails with an error
 * - `MockCorrector::empty()` - Returns an empty reply
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::TextCorrector;

/// Behavior mode for the mock corrector
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Succeeds, prefixing the text with `<<MALE>> . `
    Working,
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Returns an empty reply
    Empty,
}

/// Mock corrector with a shared request counter
#[derive(Debug)]
pub struct MockCorrector {
    behavior: MockBehavior,
    request_count: Arc<AtomicUsize>,
    custom_response: Option<fn(&str) -> String>,
}

impl MockCorrector {
    /// Create a new mock with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            custom_response: None,
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Replace the reply of a working mock
    pub fn with_custom_response(mut self, generator: fn(&str) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of correction requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }
}

impl Clone for MockCorrector {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            custom_response: self.custom_response,
        }
    }
}

#[async_trait]
impl TextCorrector for MockCorrector {
    async fn correct(&self, text: &str) -> Result<String, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::Working => Ok(match self.custom_response {
                Some(generator) => generator(text),
                None => format!("<<MALE>> . {}", text),
            }),

            MockBehavior::Intermittent { fail_every } => {
                if fail_every > 0 && count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(text.to_string())
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated correction failure".to_string(),
                status_code: 500,
            }),

            MockBehavior::Empty => Ok(String::new()),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
