/*!
 * Mock enricher for testing.
 *
 * Behaviors:
 * - `MockEnricher::working()` - deterministic suggestions derived from the input
 * - `MockEnricher::intermittent(n)` - every nth call fails
 * - `MockEnricher::failing()` - every call fails
 * - `MockEnricher::empty()` - succeeds with blank payloads
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::errors::ProviderError;
use crate::model::{AgeRating, MediaSource, MovieMetadata};

use super::{EnrichmentOptions, Enricher, SubtitleData};

/// Behavior mode for the mock enricher
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds
    Working,
    /// Fails every Nth call
    Intermittent { fail_every: usize },
    /// Always fails
    Failing,
    /// Succeeds with empty payloads
    Empty,
    /// Succeeds after a delay
    Slow { delay_ms: u64 },
}

/// Mock enricher with a call counter shared across clones
#[derive(Debug)]
pub struct MockEnricher {
    behavior: MockBehavior,
    call_count: Arc<AtomicUsize>,
}

impl MockEnricher {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            call_count: Arc::new(AtomicUsize::new(0)),
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

    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Number of calls made so far
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Count the call and decide whether it should fail; `Ok(true)` means blank output
    async fn begin_call(&self) -> Result<bool, ProviderError> {
        let count = self.call_count.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            MockBehavior::Working => Ok(false),
            MockBehavior::Empty => Ok(true),
            MockBehavior::Failing => Err(ProviderError::ConnectionError(
                "Mock connection failure".to_string(),
            )),
            MockBehavior::Intermittent { fail_every } => {
                if fail_every > 0 && count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        status_code: 503,
                        message: format!("Mock intermittent failure on call {}", count + 1),
                    })
                } else {
                    Ok(false)
                }
            }
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                Ok(false)
            }
        }
    }
}

impl Clone for MockEnricher {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            call_count: Arc::clone(&self.call_count),
        }
    }
}

#[async_trait]
impl Enricher for MockEnricher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate_metadata(
        &self,
        media: &MediaSource,
        options: &EnrichmentOptions,
        current: &MovieMetadata,
    ) -> Result<MovieMetadata, ProviderError> {
        let blank = self.begin_call().await?;
        let stem = media.stem().unwrap_or_else(|| "Untitled".to_string());

        let mut suggested = current.clone();
        if options.title {
            suggested.title = if blank { String::new() } else { format!("[AI] {}", stem) };
        }
        if options.description {
            suggested.description = if blank { String::new() } else { format!("Generated synopsis of {}", stem) };
        }
        if options.genre {
            suggested.genre = if blank { String::new() } else { "Documentary".to_string() };
        }
        if options.rating && !blank {
            suggested.age_rating = AgeRating::Twelve;
        }
        Ok(suggested)
    }

    async fn generate_subtitles(&self, media: &MediaSource) -> Result<SubtitleData, ProviderError> {
        if self.begin_call().await? {
            return Ok(SubtitleData::default());
        }
        let stem = media.stem().unwrap_or_else(|| "media".to_string());
        Ok(SubtitleData {
            has_speech: true,
            vtt_content: format!("WEBVTT\n\n1\n00:00:00.000 --> 00:00:02.000\n{}\n\n", stem),
        })
    }

    async fn generate_thumbnail(
        &self,
        title: &str,
        _genre: &str,
        _description: &str,
    ) -> Result<Option<String>, ProviderError> {
        if self.begin_call().await? {
            return Ok(None);
        }
        // 1x1 transparent PNG; the title only affects whether one is produced
        if title.is_empty() {
            return Ok(None);
        }
        Ok(Some(
            "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII="
                .to_string(),
        ))
    }
}
