//! Tests for the embedding interface

use super::*;
use std::time::Duration;

/// Embedder that sleeps longer than any sane timeout
struct SlowEmbedder;

#[async_trait]
impl TextEmbedder for SlowEmbedder {
    async fn embed(&self, _text: &str) -> EmbeddingResult<Vec<f32>> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(vec![0.0; 4])
    }

    fn dimension(&self) -> usize {
        4
    }

    fn version(&self) -> &str {
        "slow-test"
    }
}

/// Embedder that answers immediately
struct InstantEmbedder;

#[async_trait]
impl TextEmbedder for InstantEmbedder {
    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        if text.is_empty() {
            return Err(EmbeddingError::InvalidInput {
                reason: "empty text".to_string(),
            });
        }
        Ok(vec![1.0, 0.0, 0.0, 0.0])
    }

    fn dimension(&self) -> usize {
        4
    }

    fn version(&self) -> &str {
        "instant-test"
    }
}

#[tokio::test(start_paused = true)]
async fn test_embed_with_timeout_expires() {
    let result = embed_with_timeout(&SlowEmbedder, "a frame", 50).await;
    match result {
        Err(EmbeddingError::Timeout { timeout_ms }) => assert_eq!(timeout_ms, 50),
        other => panic!("expected Timeout, got {:?}", other),
    }
}

#[tokio::test]
async fn test_embed_with_timeout_passes_through() {
    let vector = embed_with_timeout(&InstantEmbedder, "a frame", 1000)
        .await
        .unwrap();
    assert_eq!(vector.len(), 4);
}

#[tokio::test]
async fn test_invalid_input_is_not_retryable() {
    let err = embed_with_timeout(&InstantEmbedder, "", 1000)
        .await
        .unwrap_err();
    assert!(!err.is_retryable());
    assert_eq!(err.retry_delay_ms(), None);
}

#[test]
fn test_retryable_errors_suggest_delays() {
    let cold = EmbeddingError::ModelUnavailable {
        reason: "loading".to_string(),
    };
    assert!(cold.is_retryable());
    assert_eq!(cold.retry_delay_ms(), Some(1000));

    let flaky = EmbeddingError::InferenceFailed {
        reason: "transient".to_string(),
    };
    assert!(flaky.is_retryable());
}
