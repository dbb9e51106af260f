/*!
 * Text-correction service clients.
 *
 * The cleaning stage can optionally send each normalized block through an
 * external grammar/spelling corrector. This module contains:
 * - `groq`: OpenAI-compatible chat-completions client (Groq by default)
 * - `mock`: scripted corrector for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for text-correction services
///
/// The pipeline treats a corrector as an opaque text-in/text-out function and
/// falls back to the uncorrected text whenever it fails.
#[async_trait]
pub trait TextCorrector: Send + Sync + Debug {
    /// Return a corrected version of `text`
    ///
    /// # Arguments
    /// * `text` - Normalized block text, title line first
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The corrected text or an error
    async fn correct(&self, text: &str) -> Result<String, ProviderError>;

    /// Short name used in log lines
    fn name(&self) -> &str;
}

pub mod groq;
pub mod mock;
