use log::{info, warn};

use crate::llm::ChatCompletion;

const SYSTEM_PROMPT: &str = "You are an expert analyst who specializes in summarizing scraped YouTube data.";
const SUMMARY_DIRECTIVE: &str = "Write a 100-word summary of this video.";
const TAGS_DIRECTIVE: &str = "Output a list of tags for this blog post in a Python list, like ['item1','item2','item3'].";

pub const SUMMARY_FALLBACK: &str = "Summary generation failed.";
pub const TAGS_FALLBACK: &str = "Tag generation failed.";

/// Summary and tags for one transcript. Both are model output, passed through as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub summary: String,
    pub tags: String,
}

/// Ask for a short summary; a failed call yields the fallback text
pub async fn summarize(llm: &dyn ChatCompletion, transcript: &str) -> String {
    match llm.complete(SYSTEM_PROMPT, SUMMARY_DIRECTIVE, transcript).await {
        Ok(summary) => {
            info!("Summary generated");
            summary
        }
        Err(e) => {
            warn!("Summary request failed: {e}");
            SUMMARY_FALLBACK.to_string()
        }
    }
}

/// Ask for a tag list; a failed call yields the fallback text
pub async fn extract_tags(llm: &dyn ChatCompletion, transcript: &str) -> String {
    match llm.complete(SYSTEM_PROMPT, TAGS_DIRECTIVE, transcript).await {
        Ok(tags) => {
            info!("Tags generated");
            tags
        }
        Err(e) => {
            warn!("Tags request failed: {e}");
            TAGS_FALLBACK.to_string()
        }
    }
}

/// Run both requests concurrently; they share nothing but the transcript
pub async fn analyze(llm: &dyn ChatCompletion, transcript: &str) -> Analysis {
    let (summary, tags) = tokio::join!(summarize(llm, transcript), extract_tags(llm, transcript));
    Analysis { summary, tags }
}
