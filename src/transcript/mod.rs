pub mod browser;
pub mod captions;

use async_trait::async_trait;

use crate::{Result, Transcript, VideoRequest};

pub use browser::{BrowserProvider, WebDriver};
pub use captions::CaptionProvider;

/// Browser identity presented to YouTube by both strategies
pub const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Something that can produce a transcript for a resolved video.
///
/// Implementations must classify their failures into the crate `Error`
/// taxonomy and never return a transcript without segments.
#[async_trait]
pub trait TranscriptProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch_transcript(&self, video: &VideoRequest) -> Result<Transcript>;
}
