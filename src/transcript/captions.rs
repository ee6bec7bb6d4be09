use async_trait::async_trait;
use log::debug;
use regex::Regex;
use serde::Deserialize;

use super::TranscriptProvider;
use crate::{Error, Result, Segment, Transcript, TranscriptSource, Unavailable, VideoRequest};

const YOUTUBE_BASE_URL: &str = "https://www.youtube.com";

#[derive(Debug, Deserialize)]
struct InnerTubePlayerResponse {
    captions: Option<CaptionsData>,
}

#[derive(Debug, Deserialize)]
struct CaptionsData {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    player_captions_tracklist_renderer: Option<CaptionTracklistRenderer>,
}

#[derive(Debug, Deserialize)]
struct CaptionTracklistRenderer {
    #[serde(rename = "captionTracks")]
    caption_tracks: Option<Vec<CaptionTrack>>,
}

#[derive(Debug, Deserialize)]
struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "languageCode")]
    language_code: String,
}

/// Fetches YouTube's own caption tracks through the InnerTube API.
///
/// The HTTP client is expected to already carry a browser user agent.
pub struct CaptionProvider {
    client: reqwest::Client,
    languages: Vec<String>,
    base_url: String,
}

impl CaptionProvider {
    pub fn new(client: reqwest::Client, languages: Vec<String>) -> Self {
        Self::with_base_url(client, languages, YOUTUBE_BASE_URL)
    }

    pub fn with_base_url(client: reqwest::Client, languages: Vec<String>, base_url: impl Into<String>) -> Self {
        CaptionProvider {
            client,
            languages,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn fetch_tracks(&self, video_id: &str) -> std::result::Result<Option<Vec<CaptionTrack>>, FetchError> {
        // Step 1: Fetch the watch page to get the InnerTube API key
        let watch_url = format!("{}/watch", self.base_url);
        debug!("Fetching watch page: {watch_url}?v={video_id}");

        let page_html = self
            .client
            .get(&watch_url)
            .query(&[("v", video_id)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let api_key = extract_api_key(&page_html)?;
        debug!("Extracted InnerTube API key: {api_key}");

        // Step 2: Call InnerTube player endpoint
        let player_url = format!("{}/youtubei/v1/player?key={api_key}&prettyPrint=false", self.base_url);
        let lang = self.languages.first().map(String::as_str).unwrap_or("en");

        let body = serde_json::json!({
            "context": {
                "client": {
                    "hl": lang,
                    "gl": "US",
                    "clientName": "WEB",
                    "clientVersion": "2.20241126.01.00"
                }
            },
            "videoId": video_id
        });

        let resp: InnerTubePlayerResponse = self
            .client
            .post(&player_url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(resp
            .captions
            .and_then(|c| c.player_captions_tracklist_renderer)
            .and_then(|r| r.caption_tracks))
    }

    async fn fetch_segments(&self, track: &CaptionTrack) -> std::result::Result<Vec<Segment>, FetchError> {
        let caption_xml = self
            .client
            .get(&track.base_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_caption_xml(&caption_xml)
    }
}

#[async_trait]
impl TranscriptProvider for CaptionProvider {
    fn name(&self) -> &'static str {
        "captions"
    }

    async fn fetch_transcript(&self, video: &VideoRequest) -> Result<Transcript> {
        let video_id = video.video_id.as_str();

        let tracks = self
            .fetch_tracks(video_id)
            .await
            .map_err(FetchError::into_upstream)?
            .unwrap_or_default();

        if tracks.is_empty() {
            debug!("No caption tracks for video {video_id}");
            return Err(Error::TranscriptUnavailable(Unavailable::Disabled));
        }

        let track = select_track(&tracks, &self.languages).ok_or_else(|| {
            debug!(
                "No caption track for {video_id} in {:?}, available: {:?}",
                self.languages,
                tracks.iter().map(|t| t.language_code.as_str()).collect::<Vec<_>>()
            );
            Error::TranscriptUnavailable(Unavailable::NotFound)
        })?;
        debug!("Using caption track: lang={}", track.language_code);

        let segments = self.fetch_segments(track).await.map_err(FetchError::into_upstream)?;
        if segments.is_empty() {
            return Err(Error::TranscriptUnavailable(Unavailable::NotFound));
        }

        Ok(Transcript {
            video_id: video.video_id.clone(),
            source: TranscriptSource::Caption,
            segments,
        })
    }
}

/// Internal failure while talking to YouTube; always surfaces as an upstream error
#[derive(Debug, thiserror::Error)]
enum FetchError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Parse(String),
}

impl FetchError {
    fn into_upstream(self) -> Error {
        Error::upstream(format!("Could not retrieve transcript: {self}"))
    }
}

/// Pick the first track matching the preference order
fn select_track<'a>(tracks: &'a [CaptionTrack], languages: &[String]) -> Option<&'a CaptionTrack> {
    languages
        .iter()
        .find_map(|lang| tracks.iter().find(|t| &t.language_code == lang))
}

fn extract_api_key(html: &str) -> std::result::Result<String, FetchError> {
    let re = Regex::new(r#""INNERTUBE_API_KEY"\s*:\s*"([^"]+)""#).map_err(|e| FetchError::Parse(e.to_string()))?;
    if let Some(caps) = re.captures(html) {
        return Ok(caps[1].to_string());
    }

    // Fallback: try the newer pattern
    let re2 = Regex::new(r#"innertubeApiKey\s*[=:]\s*"([^"]+)""#).map_err(|e| FetchError::Parse(e.to_string()))?;
    if let Some(caps) = re2.captures(html) {
        return Ok(caps[1].to_string());
    }

    Err(FetchError::Parse(
        "could not extract InnerTube API key from watch page".to_string(),
    ))
}

fn parse_caption_xml(xml: &str) -> std::result::Result<Vec<Segment>, FetchError> {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    let mut reader = Reader::from_str(xml);
    let mut segments = Vec::new();
    let mut current: Option<(Option<f64>, Option<f64>)> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"text" => {
                let mut start = None;
                let mut dur = None;
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"start" => {
                            start = String::from_utf8_lossy(&attr.value).parse::<f64>().ok();
                        }
                        b"dur" => {
                            dur = String::from_utf8_lossy(&attr.value).parse::<f64>().ok();
                        }
                        _ => {}
                    }
                }
                current = Some((start, dur));
            }
            Ok(Event::Text(ref e)) => {
                if let Some((start, duration)) = current.take() {
                    let raw_text = e.unescape().unwrap_or_default().to_string();
                    let text = html_escape::decode_html_entities(&raw_text).to_string();
                    if !text.trim().is_empty() {
                        segments.push(Segment { text, start, duration });
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(FetchError::Parse(format!("error parsing caption XML: {e}"))),
            _ => {}
        }
    }

    Ok(segments)
}
