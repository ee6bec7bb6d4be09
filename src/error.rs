/// Why a transcript could not be produced for an otherwise valid video
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unavailable {
    Disabled,
    NotFound,
}

/// Everything a request can fail with. Library errors are folded into these
/// before they leave the module that produced them.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid YouTube URL or missing ?v= parameter")]
    InvalidReference,

    #[error("{0}")]
    TranscriptUnavailable(Unavailable),

    #[error("Could not scrape transcript: {message}")]
    ScrapeFailure { message: String },

    #[error("{message}")]
    UpstreamCallFailure { message: String },
}

impl std::fmt::Display for Unavailable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Unavailable::Disabled => write!(f, "Subtitles are disabled for this video. No transcript is available."),
            Unavailable::NotFound => write!(f, "Transcript exists but is not accessible via the API."),
        }
    }
}

impl Error {
    pub fn scrape(message: impl Into<String>) -> Self {
        Error::ScrapeFailure {
            message: message.into(),
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Error::UpstreamCallFailure {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
