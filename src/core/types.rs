//! Shared data types for frame indexing and retrieval

use serde::{Deserialize, Serialize};

/// A single sampled frame as produced by the frame source
///
/// `image` holds the encoded image bytes (JPEG/PNG); the engine never
/// re-derives frames from video files.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Name of the source video file (with extension)
    pub video_filename: String,
    /// Zero-based frame index within the video
    pub frame_number: u64,
    /// Position of the frame in the video, in seconds (0 when unknown)
    pub timestamp_secs: f64,
    /// Encoded image bytes
    pub image: Vec<u8>,
}

impl Frame {
    /// Create a frame without timestamp information
    pub fn new(video_filename: impl Into<String>, frame_number: u64, image: Vec<u8>) -> Self {
        Self {
            video_filename: video_filename.into(),
            frame_number,
            timestamp_secs: 0.0,
            image,
        }
    }

    /// Stable record id for this frame
    pub fn record_id(&self) -> String {
        frame_record_id(&self.video_filename, self.frame_number)
    }
}

/// An indexed frame as stored in the vector collection
///
/// At most one record exists per `record_id`; re-indexing the same
/// frame overwrites the prior record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Stable id derived from `(video_filename, frame_number)`
    pub record_id: String,
    /// Name of the source video file
    pub video_filename: String,
    /// Zero-based frame index within the video
    pub frame_number: u64,
    /// Position of the frame in the video, in seconds
    pub timestamp_secs: f64,
    /// Natural-language description composed from top-ranked labels
    pub description: String,
    /// Text embedding of the description document
    pub embedding: Vec<f32>,
}

/// A single search hit, shaped for clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Record id of the matching frame
    pub record_id: String,
    /// Name of the source video file
    pub video_filename: String,
    /// Zero-based frame index within the video
    pub frame_number: u64,
    /// Similarity to the query, in [0, 1]
    pub similarity_score: f32,
    /// URL of the served frame image
    pub image_url: String,
}

/// Response for one search request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Hits ordered by non-increasing similarity
    pub results: Vec<SearchHit>,
    /// Number of hits returned (`results.len()`)
    pub count: usize,
    /// The query string, echoed back
    pub query: String,
}

/// Derive the stable record id for a frame
///
/// Format: `{video_stem}_frame_{frame_number:05}`, matching the frame
/// image file naming scheme, so the id doubles as the image key.
pub fn frame_record_id(video_filename: &str, frame_number: u64) -> String {
    format!("{}_frame_{:05}", video_stem(video_filename), frame_number)
}

/// Relative storage key of the served frame image
pub fn frame_image_key(video_filename: &str, frame_number: u64) -> String {
    format!("{}.jpg", frame_record_id(video_filename, frame_number))
}

/// Video filename without its final extension
pub fn video_stem(video_filename: &str) -> &str {
    match video_filename.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => video_filename,
    }
}
