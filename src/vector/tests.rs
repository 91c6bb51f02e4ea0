//! Tests for the vector store module

use super::*;
use crate::core::error::{ConfigError, FramesearchError};
use crate::core::types::{frame_record_id, FrameRecord};
use proptest::prelude::*;
use std::sync::Arc;
use tempfile::TempDir;

fn test_config(dimension: usize) -> VectorStoreConfig {
    VectorStoreConfig::default()
        .with_collection_name("test_frames")
        .with_dimension(dimension)
        .with_distance(Distance::Euclidean)
        .with_embedder_version("stub-embedder")
}

fn record(video: &str, frame_number: u64, embedding: Vec<f32>) -> FrameRecord {
    FrameRecord {
        record_id: frame_record_id(video, frame_number),
        video_filename: video.to_string(),
        frame_number,
        timestamp_secs: frame_number as f64,
        description: format!("test frame {} of {}", frame_number, video),
        embedding,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[tokio::test]
async fn test_empty_store_has_no_records() {
    let store = EmbeddedVectorStore::new(test_config(4));
    assert_eq!(store.count().await.unwrap(), 0);
    assert!(store
        .query(&[0.0, 0.0, 0.0, 0.0], 10)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_upsert_overwrites_same_id() {
    let store = EmbeddedVectorStore::new(test_config(4));

    let mut first = record("clip.mp4", 1, vec![1.0, 0.0, 0.0, 0.0]);
    first.description = "first pass".to_string();
    store.upsert(first).await.unwrap();

    let mut second = record("clip.mp4", 1, vec![0.0, 1.0, 0.0, 0.0]);
    second.description = "second pass".to_string();
    store.upsert(second).await.unwrap();

    assert_eq!(store.count().await.unwrap(), 1);
    let stored = store.get(&frame_record_id("clip.mp4", 1)).await.unwrap();
    assert_eq!(stored.description, "second pass");
    assert_eq!(stored.embedding, vec![0.0, 1.0, 0.0, 0.0]);
}

#[tokio::test]
async fn test_query_orders_ascending_by_distance() {
    let store = EmbeddedVectorStore::new(test_config(4));
    store
        .upsert(record("a.mp4", 0, vec![1.0, 0.0, 0.0, 0.0]))
        .await
        .unwrap();
    store
        .upsert(record("b.mp4", 0, vec![0.9, 0.1, 0.0, 0.0]))
        .await
        .unwrap();
    store
        .upsert(record("c.mp4", 0, vec![0.0, 1.0, 0.0, 0.0]))
        .await
        .unwrap();

    let results = store.query(&[1.0, 0.0, 0.0, 0.0], 3).await.unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].record.video_filename, "a.mp4");
    assert_eq!(results[1].record.video_filename, "b.mp4");
    assert_eq!(results[2].record.video_filename, "c.mp4");
    assert!(results[0].distance <= results[1].distance);
    assert!(results[1].distance <= results[2].distance);
}

#[tokio::test]
async fn test_query_bounded_by_k() {
    let store = EmbeddedVectorStore::new(test_config(4));
    for i in 0..10 {
        store
            .upsert(record("clip.mp4", i, vec![i as f32, 0.0, 0.0, 0.0]))
            .await
            .unwrap();
    }

    let results = store.query(&[0.0, 0.0, 0.0, 0.0], 3).await.unwrap();
    assert_eq!(results.len(), 3);

    // Fewer records than k returns them all
    let results = store.query(&[0.0, 0.0, 0.0, 0.0], 100).await.unwrap();
    assert_eq!(results.len(), 10);
}

#[tokio::test]
async fn test_tied_distances_break_by_record_id() {
    let store = EmbeddedVectorStore::new(test_config(4));
    // Identical vectors, so every distance ties
    for video in ["delta.mp4", "alpha.mp4", "charlie.mp4", "bravo.mp4"] {
        store
            .upsert(record(video, 0, vec![1.0, 0.0, 0.0, 0.0]))
            .await
            .unwrap();
    }

    let results = store.query(&[1.0, 0.0, 0.0, 0.0], 4).await.unwrap();
    let ids: Vec<&str> = results.iter().map(|r| r.record.record_id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "alpha_frame_00000",
            "bravo_frame_00000",
            "charlie_frame_00000",
            "delta_frame_00000",
        ]
    );
}

#[tokio::test]
async fn test_invalid_dimension_rejected() {
    let store = EmbeddedVectorStore::new(test_config(4));

    let result = store.upsert(record("clip.mp4", 0, vec![1.0, 0.0])).await;
    match result {
        Err(VectorError::InvalidDimension { expected, actual }) => {
            assert_eq!(expected, 4);
            assert_eq!(actual, 2);
        }
        other => panic!("expected InvalidDimension, got {:?}", other),
    }

    assert!(matches!(
        store.query(&[1.0, 0.0], 5).await,
        Err(VectorError::InvalidDimension { .. })
    ));
}

#[tokio::test]
async fn test_delete_removes_record() {
    let store = EmbeddedVectorStore::new(test_config(4));
    store
        .upsert(record("clip.mp4", 0, vec![1.0, 0.0, 0.0, 0.0]))
        .await
        .unwrap();

    assert!(store.delete("clip_frame_00000").await.unwrap());
    assert_eq!(store.count().await.unwrap(), 0);
    assert!(!store.delete("clip_frame_00000").await.unwrap());
}

#[tokio::test]
async fn test_recreate_wipes_cleanly() {
    let store = EmbeddedVectorStore::new(test_config(4));
    for i in 0..5 {
        store
            .upsert(record("clip.mp4", i, vec![i as f32, 0.0, 0.0, 0.0]))
            .await
            .unwrap();
    }
    let generation_before = store.generation().await;

    store.recreate().await.unwrap();

    assert_eq!(store.count().await.unwrap(), 0);
    assert_eq!(store.generation().await, generation_before + 1);
    // No stale records survive into the new generation
    let results = store.query(&[0.0, 0.0, 0.0, 0.0], 100).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_concurrent_upserts_to_distinct_ids() {
    let store = Arc::new(EmbeddedVectorStore::new(test_config(4)));

    let mut handles = Vec::new();
    for i in 0..32u64 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store
                .upsert(record("clip.mp4", i, vec![i as f32, 1.0, 0.0, 0.0]))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(store.count().await.unwrap(), 32);
    // Every record is complete, no interleaved fields
    for i in 0..32u64 {
        let stored = store.get(&frame_record_id("clip.mp4", i)).await.unwrap();
        assert_eq!(stored.frame_number, i);
        assert_eq!(stored.embedding, vec![i as f32, 1.0, 0.0, 0.0]);
        assert_eq!(stored.description, format!("test frame {} of clip.mp4", i));
    }
}

#[tokio::test]
async fn test_concurrent_same_id_resolves_to_one_writer() {
    let store = Arc::new(EmbeddedVectorStore::new(test_config(4)));

    let mut a = record("clip.mp4", 7, vec![1.0, 0.0, 0.0, 0.0]);
    a.description = "writer a".to_string();
    let mut b = record("clip.mp4", 7, vec![0.0, 1.0, 0.0, 0.0]);
    b.description = "writer b".to_string();

    let (store_a, store_b) = (store.clone(), store.clone());
    let (ra, rb) = tokio::join!(
        tokio::spawn({
            let a = a.clone();
            async move { store_a.upsert(a).await }
        }),
        tokio::spawn({
            let b = b.clone();
            async move { store_b.upsert(b).await }
        }),
    );
    ra.unwrap().unwrap();
    rb.unwrap().unwrap();

    assert_eq!(store.count().await.unwrap(), 1);
    let stored = store.get("clip_frame_00007").await.unwrap();
    // The surviving record matches exactly one of the writers, never a mix
    assert!(stored == a || stored == b, "mixed record fields: {:?}", stored);
}

// ============================================================================
// Snapshot Persistence
// ============================================================================

fn snapshot_config(dir: &TempDir, dimension: usize) -> VectorStoreConfig {
    test_config(dimension).with_snapshot_path(dir.path().join("collection.json"))
}

#[tokio::test]
async fn test_snapshot_round_trip() {
    let dir = TempDir::new().unwrap();
    let config = snapshot_config(&dir, 4);

    let store = EmbeddedVectorStore::open(config.clone()).await.unwrap();
    store
        .upsert(record("clip.mp4", 0, vec![1.0, 0.0, 0.0, 0.0]))
        .await
        .unwrap();
    store
        .upsert(record("clip.mp4", 1, vec![0.0, 1.0, 0.0, 0.0]))
        .await
        .unwrap();
    store.flush_snapshot().await.unwrap();

    let reopened = EmbeddedVectorStore::open(config).await.unwrap();
    assert_eq!(reopened.count().await.unwrap(), 2);
    let stored = reopened.get("clip_frame_00001").await.unwrap();
    assert_eq!(stored.embedding, vec![0.0, 1.0, 0.0, 0.0]);
    assert_eq!(stored.description, "test frame 1 of clip.mp4");
}

#[tokio::test]
async fn test_snapshot_dimension_mismatch_refused() {
    let dir = TempDir::new().unwrap();
    let store = EmbeddedVectorStore::open(snapshot_config(&dir, 4)).await.unwrap();
    store
        .upsert(record("clip.mp4", 0, vec![1.0, 0.0, 0.0, 0.0]))
        .await
        .unwrap();
    store.flush_snapshot().await.unwrap();

    let result = EmbeddedVectorStore::open(snapshot_config(&dir, 8)).await;
    assert!(matches!(
        result,
        Err(FramesearchError::Config(ConfigError::DimensionMismatch { .. }))
    ));
}

#[tokio::test]
async fn test_snapshot_metric_mismatch_refused() {
    let dir = TempDir::new().unwrap();
    let store = EmbeddedVectorStore::open(snapshot_config(&dir, 4)).await.unwrap();
    store.flush_snapshot().await.unwrap();

    let cosine = snapshot_config(&dir, 4).with_distance(Distance::Cosine);
    let result = EmbeddedVectorStore::open(cosine).await;
    assert!(matches!(
        result,
        Err(FramesearchError::Config(ConfigError::MetricMismatch { .. }))
    ));
}

#[tokio::test]
async fn test_snapshot_embedder_version_mismatch_refused() {
    let dir = TempDir::new().unwrap();
    let store = EmbeddedVectorStore::open(snapshot_config(&dir, 4)).await.unwrap();
    store.flush_snapshot().await.unwrap();

    let other = snapshot_config(&dir, 4).with_embedder_version("some-other-model-v2");
    let result = EmbeddedVectorStore::open(other).await;
    assert!(matches!(
        result,
        Err(FramesearchError::Config(ConfigError::EmbedderVersionMismatch { .. }))
    ));
}

#[tokio::test]
async fn test_corrupted_snapshot_refused() {
    let dir = TempDir::new().unwrap();
    let config = snapshot_config(&dir, 4);
    std::fs::write(config.snapshot_path.as_ref().unwrap(), b"not json{{").unwrap();

    let result = EmbeddedVectorStore::open(config).await;
    assert!(matches!(
        result,
        Err(FramesearchError::Vector(VectorError::SnapshotCorrupted { .. }))
    ));
}

#[tokio::test]
async fn test_recreate_clears_snapshot() {
    let dir = TempDir::new().unwrap();
    let config = snapshot_config(&dir, 4);

    let store = EmbeddedVectorStore::open(config.clone()).await.unwrap();
    store
        .upsert(record("clip.mp4", 0, vec![1.0, 0.0, 0.0, 0.0]))
        .await
        .unwrap();
    store.flush_snapshot().await.unwrap();
    store.recreate().await.unwrap();

    // A fresh open must not resurrect pre-recreate records
    let reopened = EmbeddedVectorStore::open(config).await.unwrap();
    assert_eq!(reopened.count().await.unwrap(), 0);
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Query results are sorted ascending by distance and bounded by k,
    /// under both supported metrics.
    #[test]
    fn prop_query_sorted_and_bounded(
        vectors in proptest::collection::vec(
            proptest::collection::vec(-1.0f32..1.0f32, 8),
            1..24,
        ),
        query in proptest::collection::vec(-1.0f32..1.0f32, 8),
        k in 1usize..10,
        use_cosine in any::<bool>(),
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let distance = if use_cosine { Distance::Cosine } else { Distance::Euclidean };
            let store = EmbeddedVectorStore::new(
                test_config(8).with_distance(distance),
            );
            let total = vectors.len();
            for (i, vector) in vectors.into_iter().enumerate() {
                store.upsert(record("clip.mp4", i as u64, vector)).await.unwrap();
            }

            let results = store.query(&query, k).await.unwrap();
            prop_assert!(results.len() <= k);
            prop_assert!(results.len() <= total);
            for pair in results.windows(2) {
                prop_assert!(
                    pair[0].distance <= pair[1].distance,
                    "results not ascending: {} > {}",
                    pair[0].distance,
                    pair[1].distance
                );
            }
            Ok(())
        })?;
    }

    /// Re-upserting the same records never grows the store.
    #[test]
    fn prop_upsert_is_idempotent(
        vectors in proptest::collection::vec(
            proptest::collection::vec(-1.0f32..1.0f32, 8),
            1..16,
        ),
        passes in 1usize..4,
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let store = EmbeddedVectorStore::new(test_config(8));
            for _ in 0..passes {
                for (i, vector) in vectors.iter().enumerate() {
                    store
                        .upsert(record("clip.mp4", i as u64, vector.clone()))
                        .await
                        .unwrap();
                }
            }
            prop_assert_eq!(store.count().await.unwrap(), vectors.len());
            Ok(())
        })?;
    }
}
