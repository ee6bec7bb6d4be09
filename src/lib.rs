pub mod analysis;
pub mod config;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod server;
pub mod transcript;

use serde::Serialize;

pub use error::{Error, Result, Unavailable};

/// A single timed transcript line
#[derive(Debug, Clone, Serialize)]
pub struct Segment {
    pub text: String,
    pub start: Option<f64>,
    pub duration: Option<f64>,
}

impl Segment {
    pub fn text(text: impl Into<String>) -> Self {
        Segment {
            text: text.into(),
            start: None,
            duration: None,
        }
    }
}

/// Where the transcript came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TranscriptSource {
    Caption,
    Browser,
}

/// Complete transcript for a video
#[derive(Debug, Clone, Serialize)]
pub struct Transcript {
    pub video_id: VideoId,
    pub source: TranscriptSource,
    pub segments: Vec<Segment>,
}

impl Transcript {
    /// Segment texts joined one per line
    pub fn text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl std::fmt::Display for TranscriptSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranscriptSource::Caption => write!(f, "caption"),
            TranscriptSource::Browser => write!(f, "browser"),
        }
    }
}

/// Opaque YouTube video identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A caller's video reference together with the id resolved from it
#[derive(Debug, Clone)]
pub struct VideoRequest {
    pub reference: String,
    pub video_id: VideoId,
}

impl VideoRequest {
    pub fn resolve(reference: &str) -> Result<Self> {
        let video_id = resolve_video_id(reference)?;
        Ok(VideoRequest {
            reference: reference.trim().to_string(),
            video_id,
        })
    }
}

/// Extract the `v` query parameter from a video URL. The first non-empty
/// binding wins; the host is not checked.
pub fn resolve_video_id(reference: &str) -> Result<VideoId> {
    let url = url::Url::parse(reference.trim()).map_err(|_| Error::InvalidReference)?;

    url.query_pairs()
        .find(|(k, v)| k == "v" && !v.trim().is_empty())
        .map(|(_, v)| VideoId(v.trim().to_string()))
        .ok_or(Error::InvalidReference)
}
