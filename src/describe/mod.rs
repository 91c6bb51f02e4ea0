//! Frame description via label affinity scoring
//!
//! Scores a frame image against the label catalog with an external
//! image-text affinity model, selects the top-ranked labels, and
//! composes a deterministic natural-language description. When the
//! affinity model is absent or failing, description degrades to a
//! fixed fallback string instead of failing the indexing pass.

mod error;


pub use error::DescribeError;

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::{Label, LabelCatalog};
use crate::core::retry::{with_retry, RetryPolicy};

/// Number of top-ranked labels composed into a description
pub const TOP_LABELS: usize = 3;

/// Description used when affinity scoring is unavailable
pub const FALLBACK_DESCRIPTION: &str = "frame from video content, scene from video";

/// Affinity score of one candidate label against an image
#[derive(Debug, Clone, PartialEq)]
pub struct LabelScore {
    /// Label text, matching a catalog entry
    pub label: String,
    /// Affinity score; higher means closer
    pub score: f32,
}

impl LabelScore {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// External image-text affinity function
///
/// Given an image and the candidate labels, returns per-label affinity
/// scores. The returned list may be in any order and may omit labels;
/// the describer re-ranks defensively.
#[async_trait]
pub trait AffinityScorer: Send + Sync {
    async fn score_labels(
        &self,
        image: &[u8],
        labels: &[Label],
    ) -> Result<Vec<LabelScore>, DescribeError>;
}

/// Configuration for the frame describer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriberConfig {
    /// Per-call time budget for affinity scoring (milliseconds)
    pub timeout_ms: u64,

    /// Retry policy for transient scoring failures
    pub retry: RetryPolicy,
}

impl Default for DescriberConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            retry: RetryPolicy::default(),
        }
    }
}

/// A composed frame description
#[derive(Debug, Clone, PartialEq)]
pub struct Description {
    /// The description text
    pub text: String,
    /// True when the fallback was used instead of affinity scoring
    pub degraded: bool,
}

/// Describes frames by scoring them against the label catalog
///
/// Pure function of `(image, catalog)`: identical input yields the
/// identical description string on every call. Tied affinity scores
/// break by catalog declaration order, earlier label wins.
pub struct FrameDescriber {
    catalog: LabelCatalog,
    scorer: Option<Arc<dyn AffinityScorer>>,
    config: DescriberConfig,
}

impl FrameDescriber {
    /// Create a describer with an affinity scorer
    pub fn new(
        catalog: LabelCatalog,
        scorer: Arc<dyn AffinityScorer>,
        config: DescriberConfig,
    ) -> Self {
        Self {
            catalog,
            scorer: Some(scorer),
            config,
        }
    }

    /// Create a describer without affinity scoring
    ///
    /// Every frame gets the fallback description; frames still index.
    pub fn without_scorer(catalog: LabelCatalog, config: DescriberConfig) -> Self {
        Self {
            catalog,
            scorer: None,
            config,
        }
    }

    /// The catalog this describer scores against
    pub fn catalog(&self) -> &LabelCatalog {
        &self.catalog
    }

    /// Describe one frame image
    ///
    /// Decode failures propagate as `DescribeError::FrameRead` so the
    /// caller can skip the frame; scoring failures degrade to the
    /// fallback description after bounded retries.
    pub async fn describe(&self, image: &[u8]) -> Result<Description, DescribeError> {
        image::load_from_memory(image).map_err(|e| DescribeError::FrameRead {
            reason: e.to_string(),
        })?;

        let scorer = match &self.scorer {
            Some(scorer) => scorer,
            None => {
                debug!("No affinity scorer configured, using fallback description");
                return Ok(Description {
                    text: FALLBACK_DESCRIPTION.to_string(),
                    degraded: true,
                });
            }
        };

        let scores = with_retry(&self.config.retry, DescribeError::is_retryable, || {
            self.score_with_timeout(scorer.as_ref(), image)
        })
        .await;

        match scores {
            Ok(scores) => match self.compose(scores) {
                Some(text) => Ok(Description {
                    text,
                    degraded: false,
                }),
                None => {
                    warn!("Affinity scorer returned no usable labels, using fallback description");
                    Ok(Description {
                        text: FALLBACK_DESCRIPTION.to_string(),
                        degraded: true,
                    })
                }
            },
            Err(e) => {
                warn!("Affinity scoring failed, using fallback description: {}", e);
                Ok(Description {
                    text: FALLBACK_DESCRIPTION.to_string(),
                    degraded: true,
                })
            }
        }
    }

    async fn score_with_timeout(
        &self,
        scorer: &dyn AffinityScorer,
        image: &[u8],
    ) -> Result<Vec<LabelScore>, DescribeError> {
        let budget = std::time::Duration::from_millis(self.config.timeout_ms);
        match tokio::time::timeout(budget, scorer.score_labels(image, self.catalog.labels())).await
        {
            Ok(result) => result,
            Err(_) => Err(DescribeError::Timeout {
                timeout_ms: self.config.timeout_ms,
            }),
        }
    }

    /// Compose the description from raw affinity scores
    ///
    /// Unknown labels are dropped, the rest are ranked strictly
    /// descending by score with catalog order breaking ties, and the
    /// top labels are joined with `", "`. Returns None when the scorer
    /// produced nothing usable.
    fn compose(&self, scores: Vec<LabelScore>) -> Option<String> {
        let mut ranked: Vec<(usize, LabelScore)> = scores
            .into_iter()
            .filter_map(|s| self.catalog.position(&s.label).map(|pos| (pos, s)))
            .collect();

        ranked.sort_by(|(pos_a, a), (pos_b, b)| {
            match b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal) {
                Ordering::Equal => pos_a.cmp(pos_b),
                other => other,
            }
        });

        let top: Vec<&str> = ranked
            .iter()
            .take(TOP_LABELS)
            .map(|(_, s)| s.label.as_str())
            .collect();

        if top.is_empty() {
            None
        } else {
            Some(top.join(", "))
        }
    }
}
