use std::sync::Arc;

use log::info;
use serde::Serialize;

use crate::analysis;
use crate::llm::ChatCompletion;
use crate::transcript::TranscriptProvider;
use crate::{Result, VideoRequest};

/// What a successful request returns
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub transcript: String,
    pub summary: String,
    pub tags: String,
}

/// Resolve, fetch, analyze. Holds no per-request state.
#[derive(Clone)]
pub struct Pipeline {
    provider: Arc<dyn TranscriptProvider>,
    llm: Arc<dyn ChatCompletion>,
}

impl Pipeline {
    pub fn new(provider: Arc<dyn TranscriptProvider>, llm: Arc<dyn ChatCompletion>) -> Self {
        Pipeline { provider, llm }
    }

    pub async fn run(&self, reference: &str) -> Result<Report> {
        let video = VideoRequest::resolve(reference)?;
        info!("Extracted video ID: {}", video.video_id);

        let transcript = self.provider.fetch_transcript(&video).await?;
        info!(
            "Transcript retrieved via {} ({} segments)",
            self.provider.name(),
            transcript.segments.len()
        );

        let text = transcript.text();
        let analysis = analysis::analyze(self.llm.as_ref(), &text).await;

        Ok(Report {
            transcript: text,
            summary: analysis.summary,
            tags: analysis.tags,
        })
    }
}
