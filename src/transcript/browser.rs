use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use serde::Deserialize;
use tokio::time::Instant;

use super::{TranscriptProvider, USER_AGENT};
use crate::{Error, Result, Segment, Transcript, TranscriptSource, VideoRequest};

const MORE_ACTIONS_SELECTOR: &str = "button[aria-label='More actions']";
const SHOW_TRANSCRIPT_SELECTOR: &str = "button[aria-label='Show transcript']";
const SEGMENT_SELECTOR: &str = "ytd-transcript-segment-renderer .segment-text";

const YOUTUBE_BASE_URL: &str = "https://www.youtube.com";

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// W3C key under which WebDriver returns element references
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Starts isolated browser sessions
#[async_trait]
pub trait Browser: Send + Sync {
    async fn launch(&self) -> Result<Arc<dyn BrowserSession>>;
}

/// One live browser session. `quit` must be called exactly once.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Wait until an element matching `selector` accepts a click, then click it
    async fn click(&self, selector: &str, timeout: Duration) -> Result<()>;

    /// Wait for at least one element matching `selector` and return every match's text in document order
    async fn read_all(&self, selector: &str, timeout: Duration) -> Result<Vec<String>>;

    async fn quit(&self) -> Result<()>;
}

/// Scrapes the transcript panel of the rendered watch page.
pub struct BrowserProvider {
    browser: Arc<dyn Browser>,
    timeout: Duration,
    base_url: String,
}

impl BrowserProvider {
    pub fn new(browser: Arc<dyn Browser>, timeout: Duration) -> Self {
        BrowserProvider {
            browser,
            timeout,
            base_url: YOUTUBE_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// The watch page is always rebuilt from the id; the caller's URL is never loaded
    fn watch_url(&self, video_id: &str) -> Result<String> {
        let mut url = url::Url::parse(&format!("{}/watch", self.base_url))
            .map_err(|e| Error::scrape(format!("bad watch page base {}: {e}", self.base_url)))?;
        url.query_pairs_mut().append_pair("v", video_id);
        Ok(url.into())
    }
}

#[async_trait]
impl TranscriptProvider for BrowserProvider {
    fn name(&self) -> &'static str {
        "browser"
    }

    async fn fetch_transcript(&self, video: &VideoRequest) -> Result<Transcript> {
        let url = self.watch_url(video.video_id.as_str())?;
        let browser = self.browser.clone();
        let timeout = self.timeout;

        // Launch, scrape and quit all run in a detached task so that neither a
        // panic in the scrape nor a dropped request future can skip `quit`.
        let handle = tokio::spawn(async move {
            let session = browser.launch().await?;
            let scrape = tokio::spawn(scrape_transcript(session.clone(), url, timeout)).await;
            if let Err(e) = session.quit().await {
                warn!("Failed to close browser session: {e}");
            }
            match scrape {
                Ok(result) => result,
                Err(join_err) => Err(Error::scrape(format!("browser task aborted: {join_err}"))),
            }
        });

        let lines = handle
            .await
            .map_err(|e| Error::scrape(format!("browser task aborted: {e}")))??;

        Ok(Transcript {
            video_id: video.video_id.clone(),
            source: TranscriptSource::Browser,
            segments: lines.into_iter().map(Segment::text).collect(),
        })
    }
}

async fn scrape_transcript(session: Arc<dyn BrowserSession>, url: String, timeout: Duration) -> Result<Vec<String>> {
    debug!("Loading watch page in browser: {url}");
    tokio::time::timeout(timeout, session.navigate(&url))
        .await
        .map_err(|_| Error::scrape(format!("timed out after {timeout:?} loading {url}")))??;
    session.click(MORE_ACTIONS_SELECTOR, timeout).await?;
    session.click(SHOW_TRANSCRIPT_SELECTOR, timeout).await?;

    let lines: Vec<String> = session
        .read_all(SEGMENT_SELECTOR, timeout)
        .await?
        .into_iter()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        return Err(Error::scrape("transcript panel rendered no text"));
    }
    debug!("Scraped {} transcript lines", lines.len());
    Ok(lines)
}

/// Drives a browser through a WebDriver server such as `chromedriver`
pub struct WebDriver {
    client: reqwest::Client,
    endpoint: String,
}

impl WebDriver {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        WebDriver {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        }
    }

    fn capabilities() -> serde_json::Value {
        serde_json::json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": {
                        "args": [
                            "--headless=new",
                            "--incognito",
                            "--disable-gpu",
                            "--no-sandbox",
                            format!("--user-agent={USER_AGENT}"),
                        ]
                    }
                }
            }
        })
    }
}

#[derive(Debug, Deserialize)]
struct NewSession {
    #[serde(rename = "sessionId")]
    session_id: String,
}

#[async_trait]
impl Browser for WebDriver {
    async fn launch(&self) -> Result<Arc<dyn BrowserSession>> {
        let url = format!("{}/session", self.endpoint);
        debug!("Starting WebDriver session at {url}");

        let value = send(self.client.post(&url).json(&Self::capabilities()))
            .await
            .map_err(|e| Error::scrape(format!("could not start browser: {e}")))?;
        let session: NewSession =
            serde_json::from_value(value).map_err(|e| Error::scrape(format!("unexpected new session reply: {e}")))?;

        debug!("WebDriver session {} started", session.session_id);
        Ok(Arc::new(WebDriverSession {
            client: self.client.clone(),
            base: format!("{}/session/{}", self.endpoint, session.session_id),
        }))
    }
}

struct WebDriverSession {
    client: reqwest::Client,
    base: String,
}

impl WebDriverSession {
    async fn find_all(&self, selector: &str) -> std::result::Result<Vec<String>, WebDriverError> {
        let value = send(
            self.client
                .post(format!("{}/elements", self.base))
                .json(&serde_json::json!({"using": "css selector", "value": selector})),
        )
        .await?;

        let elements = value
            .as_array()
            .ok_or_else(|| WebDriverError::protocol("elements reply is not an array"))?;
        Ok(elements
            .iter()
            .filter_map(|e| e.get(ELEMENT_KEY).and_then(|id| id.as_str()).map(str::to_string))
            .collect())
    }

    async fn try_click(&self, selector: &str) -> std::result::Result<(), WebDriverError> {
        let element = self
            .find_all(selector)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| WebDriverError::protocol(format!("no element matches {selector}")))?;

        send(
            self.client
                .post(format!("{}/element/{element}/click", self.base))
                .json(&serde_json::json!({})),
        )
        .await?;
        Ok(())
    }

    async fn try_read_all(&self, selector: &str) -> std::result::Result<Vec<String>, WebDriverError> {
        let elements = self.find_all(selector).await?;
        if elements.is_empty() {
            return Err(WebDriverError::protocol(format!("no element matches {selector}")));
        }

        let mut texts = Vec::with_capacity(elements.len());
        for element in elements {
            let value = send(self.client.get(format!("{}/element/{element}/text", self.base))).await?;
            texts.push(value.as_str().unwrap_or_default().to_string());
        }
        Ok(texts)
    }
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    async fn navigate(&self, url: &str) -> Result<()> {
        send(
            self.client
                .post(format!("{}/url", self.base))
                .json(&serde_json::json!({ "url": url })),
        )
        .await
        .map_err(|e| Error::scrape(format!("navigation to {url} failed: {e}")))?;
        Ok(())
    }

    async fn click(&self, selector: &str, timeout: Duration) -> Result<()> {
        wait_for(selector, timeout, || self.try_click(selector)).await
    }

    async fn read_all(&self, selector: &str, timeout: Duration) -> Result<Vec<String>> {
        wait_for(selector, timeout, || self.try_read_all(selector)).await
    }

    async fn quit(&self) -> Result<()> {
        debug!("Closing WebDriver session {}", self.base);
        send(self.client.delete(&self.base))
            .await
            .map_err(|e| Error::scrape(format!("could not close browser: {e}")))?;
        Ok(())
    }
}

/// Retry `attempt` every poll interval until it succeeds or `timeout` elapses.
/// A single attempt that stalls is cut off at the same deadline.
async fn wait_for<F, Fut, T>(selector: &str, timeout: Duration, attempt: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = std::result::Result<T, WebDriverError>>,
{
    let deadline = Instant::now() + timeout;
    loop {
        let outcome = tokio::time::timeout_at(deadline, attempt()).await.map_err(|_| {
            Error::scrape(format!(
                "timed out after {timeout:?} waiting for {selector}: WebDriver did not respond"
            ))
        })?;
        match outcome {
            Ok(value) => return Ok(value),
            Err(e) if e.is_fatal() => return Err(Error::scrape(format!("{selector}: {e}"))),
            Err(e) => {
                if Instant::now() + POLL_INTERVAL > deadline {
                    return Err(Error::scrape(format!(
                        "timed out after {timeout:?} waiting for {selector}: {e}"
                    )));
                }
                debug!("Waiting for {selector}: {e}");
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum WebDriverError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("{error}: {message}")]
    Command { error: String, message: String },
    #[error("{0}")]
    Protocol(String),
}

impl WebDriverError {
    fn protocol(message: impl Into<String>) -> Self {
        WebDriverError::Protocol(message.into())
    }

    /// Errors that waiting longer will not fix
    fn is_fatal(&self) -> bool {
        match self {
            WebDriverError::Http(_) => true,
            WebDriverError::Command { error, .. } => {
                matches!(error.as_str(), "invalid session id" | "session not created" | "invalid selector")
            }
            WebDriverError::Protocol(_) => false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Reply {
    value: serde_json::Value,
}

/// Send a WebDriver command and unwrap its `value`, turning error replies into `WebDriverError::Command`
async fn send(request: reqwest::RequestBuilder) -> std::result::Result<serde_json::Value, WebDriverError> {
    let resp = request.send().await?;
    let status = resp.status();
    let reply: Reply = resp.json().await?;

    if let Some(error) = reply.value.get("error").and_then(|e| e.as_str()) {
        let message = reply
            .value
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or_default()
            .to_string();
        return Err(WebDriverError::Command {
            error: error.to_string(),
            message,
        });
    }
    if !status.is_success() {
        return Err(WebDriverError::protocol(format!("WebDriver returned {status}")));
    }
    Ok(reply.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    #[derive(Clone, Copy)]
    enum Script {
        Success,
        MissingButton,
        Panic,
        Empty,
        SlowRead,
        HungNavigation,
    }

    #[derive(Clone, Default)]
    struct Recorder {
        quits: Arc<AtomicUsize>,
        navigated: Arc<Mutex<Vec<String>>>,
        reading: Arc<Notify>,
    }

    struct FakeSession {
        script: Script,
        recorder: Recorder,
    }

    #[async_trait]
    impl BrowserSession for FakeSession {
        async fn navigate(&self, url: &str) -> Result<()> {
            self.recorder.navigated.lock().unwrap().push(url.to_string());
            if matches!(self.script, Script::HungNavigation) {
                std::future::pending::<()>().await;
            }
            Ok(())
        }

        async fn click(&self, selector: &str, _timeout: Duration) -> Result<()> {
            if matches!(self.script, Script::MissingButton) && selector == SHOW_TRANSCRIPT_SELECTOR {
                return Err(Error::scrape(format!("timed out waiting for {selector}")));
            }
            Ok(())
        }

        async fn read_all(&self, _selector: &str, _timeout: Duration) -> Result<Vec<String>> {
            match self.script {
                Script::Panic => panic!("renderer crashed"),
                Script::Empty => Ok(vec!["  ".to_string()]),
                Script::SlowRead => {
                    self.recorder.reading.notify_one();
                    tokio::time::sleep(Duration::from_millis(200)).await;
                    Ok(vec!["late line".to_string()])
                }
                _ => Ok(vec!["first line".to_string(), " second line ".to_string()]),
            }
        }

        async fn quit(&self) -> Result<()> {
            self.recorder.quits.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FakeBrowser {
        script: Script,
        recorder: Recorder,
    }

    #[async_trait]
    impl Browser for FakeBrowser {
        async fn launch(&self) -> Result<Arc<dyn BrowserSession>> {
            Ok(Arc::new(FakeSession {
                script: self.script,
                recorder: self.recorder.clone(),
            }))
        }
    }

    fn fake_provider(script: Script, recorder: &Recorder, timeout: Duration) -> BrowserProvider {
        BrowserProvider::new(
            Arc::new(FakeBrowser {
                script,
                recorder: recorder.clone(),
            }),
            timeout,
        )
    }

    async fn run(script: Script) -> (Result<Transcript>, usize) {
        let recorder = Recorder::default();
        let provider = fake_provider(script, &recorder, Duration::from_secs(1));
        let video = VideoRequest::resolve("https://www.youtube.com/watch?v=abc123").unwrap();
        let result = provider.fetch_transcript(&video).await;
        (result, recorder.quits.load(Ordering::SeqCst))
    }

    #[tokio::test]
    async fn test_success_quits_once() {
        let (result, quits) = run(Script::Success).await;
        let transcript = result.unwrap();
        assert_eq!(transcript.source, TranscriptSource::Browser);
        assert_eq!(transcript.text(), "first line\nsecond line");
        assert_eq!(quits, 1);
    }

    #[tokio::test]
    async fn test_missing_element_quits_once() {
        let (result, quits) = run(Script::MissingButton).await;
        assert!(matches!(result, Err(Error::ScrapeFailure { .. })));
        assert_eq!(quits, 1);
    }

    #[tokio::test]
    async fn test_panic_quits_once() {
        let (result, quits) = run(Script::Panic).await;
        assert!(matches!(result, Err(Error::ScrapeFailure { .. })));
        assert_eq!(quits, 1);
    }

    #[tokio::test]
    async fn test_blank_panel_is_scrape_failure() {
        let (result, quits) = run(Script::Empty).await;
        assert!(matches!(result, Err(Error::ScrapeFailure { .. })));
        assert_eq!(quits, 1);
    }

    #[tokio::test]
    async fn test_hung_navigation_times_out_and_quits_once() {
        let (result, quits) = run(Script::HungNavigation).await;
        let err = result.unwrap_err();
        assert!(err.to_string().contains("timed out"), "{err}");
        assert_eq!(quits, 1);
    }

    #[tokio::test]
    async fn test_aborted_caller_still_quits_once() {
        let recorder = Recorder::default();
        let provider = Arc::new(fake_provider(Script::SlowRead, &recorder, Duration::from_secs(1)));
        let video = VideoRequest::resolve("https://www.youtube.com/watch?v=abc123").unwrap();

        let caller = tokio::spawn({
            let provider = provider.clone();
            async move { provider.fetch_transcript(&video).await }
        });
        recorder.reading.notified().await;
        caller.abort();
        assert!(caller.await.unwrap_err().is_cancelled());

        tokio::time::timeout(Duration::from_secs(2), async {
            while recorder.quits.load(Ordering::SeqCst) == 0 {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("session closed after the caller went away");
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(recorder.quits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_navigates_to_watch_page_built_from_id() {
        let recorder = Recorder::default();
        let provider = fake_provider(Script::Success, &recorder, Duration::from_secs(1));

        for reference in [
            "file:///etc/passwd?v=abc",
            "http://169.254.169.254/latest/meta-data?v=abc",
        ] {
            let video = VideoRequest::resolve(reference).unwrap();
            provider.fetch_transcript(&video).await.unwrap();
        }

        assert_eq!(
            *recorder.navigated.lock().unwrap(),
            vec!["https://www.youtube.com/watch?v=abc", "https://www.youtube.com/watch?v=abc"]
        );
    }

    #[test]
    fn test_watch_url_encodes_id() {
        let provider = fake_provider(Script::Success, &Recorder::default(), Duration::from_secs(1));
        assert_eq!(
            provider.watch_url("a&b=c").unwrap(),
            "https://www.youtube.com/watch?v=a%26b%3Dc"
        );
    }

    #[test]
    fn test_capabilities_set_user_agent_and_headless() {
        let caps = WebDriver::capabilities();
        let args = caps["capabilities"]["alwaysMatch"]["goog:chromeOptions"]["args"]
            .as_array()
            .unwrap();
        assert!(args.iter().any(|a| a == "--headless=new"));
        assert!(args.iter().any(|a| a.as_str().unwrap().starts_with("--user-agent=Mozilla/5.0")));
    }

    #[test]
    fn test_command_errors_classified() {
        let stale = WebDriverError::Command {
            error: "no such element".into(),
            message: "".into(),
        };
        let dead = WebDriverError::Command {
            error: "invalid session id".into(),
            message: "".into(),
        };
        assert!(!stale.is_fatal());
        assert!(dead.is_fatal());
    }

    #[tokio::test]
    async fn test_wait_for_times_out() {
        let err = wait_for("div.never", Duration::from_millis(300), || async {
            Err::<(), _>(WebDriverError::protocol("no element matches div.never"))
        })
        .await
        .unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn test_wait_for_cuts_off_stalled_attempt() {
        let outcome = tokio::time::timeout(
            Duration::from_secs(3),
            wait_for("div.x", Duration::from_millis(300), || {
                std::future::pending::<std::result::Result<(), WebDriverError>>()
            }),
        )
        .await
        .expect("wait_for ignored its deadline");
        let err = outcome.unwrap_err();
        assert!(matches!(err, Error::ScrapeFailure { .. }));
        assert!(err.to_string().contains("did not respond"), "{err}");
    }

    mod webdriver {
        use super::*;
        use axum::{
            Json, Router,
            extract::{Path, State},
            http::StatusCode,
            routing::{delete, get, post},
        };
        use serde_json::{Value, json};
        use tokio::net::TcpListener;

        #[derive(Clone, Default)]
        struct Driver {
            calls: Arc<Mutex<Vec<String>>>,
            capabilities: Arc<Mutex<Option<Value>>>,
            deletes: Arc<AtomicUsize>,
            dead_session: bool,
        }

        async fn new_session(State(driver): State<Driver>, Json(body): Json<Value>) -> Json<Value> {
            *driver.capabilities.lock().unwrap() = Some(body);
            Json(json!({"value": {"sessionId": "s1", "capabilities": {}}}))
        }

        async fn navigate(State(driver): State<Driver>, Json(body): Json<Value>) -> Json<Value> {
            let url = body["url"].as_str().unwrap_or_default();
            driver.calls.lock().unwrap().push(format!("url {url}"));
            Json(json!({"value": null}))
        }

        async fn find_elements(State(driver): State<Driver>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
            let selector = body["value"].as_str().unwrap_or_default().to_string();
            driver.calls.lock().unwrap().push(format!("find {selector}"));

            if driver.dead_session && selector == SHOW_TRANSCRIPT_SELECTOR {
                return (
                    StatusCode::NOT_FOUND,
                    Json(json!({"value": {"error": "invalid session id", "message": "session deleted"}})),
                );
            }
            let ids: &[&str] = match selector.as_str() {
                MORE_ACTIONS_SELECTOR => &["more"],
                SHOW_TRANSCRIPT_SELECTOR => &["show"],
                SEGMENT_SELECTOR => &["seg1", "seg2"],
                _ => &[],
            };
            let elements: Vec<Value> = ids.iter().map(|id| json!({ ELEMENT_KEY: id })).collect();
            (StatusCode::OK, Json(json!({ "value": elements })))
        }

        async fn click(State(driver): State<Driver>, Path(id): Path<String>) -> Json<Value> {
            driver.calls.lock().unwrap().push(format!("click {id}"));
            Json(json!({"value": null}))
        }

        async fn text(State(driver): State<Driver>, Path(id): Path<String>) -> Json<Value> {
            driver.calls.lock().unwrap().push(format!("text {id}"));
            let text = match id.as_str() {
                "seg1" => "hello",
                "seg2" => "world",
                _ => "",
            };
            Json(json!({ "value": text }))
        }

        async fn end_session(State(driver): State<Driver>) -> Json<Value> {
            driver.deletes.fetch_add(1, Ordering::SeqCst);
            Json(json!({"value": null}))
        }

        async fn serve(driver: Driver) -> String {
            let app = Router::new()
                .route("/session", post(new_session))
                .route("/session/s1", delete(end_session))
                .route("/session/s1/url", post(navigate))
                .route("/session/s1/elements", post(find_elements))
                .route("/session/s1/element/{id}/click", post(click))
                .route("/session/s1/element/{id}/text", get(text))
                .with_state(driver);

            let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
            let addr = listener.local_addr().expect("local addr");
            tokio::spawn(async move {
                axum::serve(listener, app).await.expect("server run");
            });
            format!("http://{addr}")
        }

        fn provider(endpoint: &str, timeout: Duration) -> BrowserProvider {
            BrowserProvider::new(Arc::new(WebDriver::new(reqwest::Client::new(), endpoint)), timeout)
        }

        #[tokio::test]
        async fn test_scrape_over_webdriver_protocol() {
            let driver = Driver::default();
            let endpoint = serve(driver.clone()).await;

            let video = VideoRequest::resolve("https://www.youtube.com/watch?v=abc123").unwrap();
            let transcript = provider(&endpoint, Duration::from_secs(2))
                .fetch_transcript(&video)
                .await
                .unwrap();
            assert_eq!(transcript.text(), "hello\nworld");

            let caps = driver.capabilities.lock().unwrap().clone().expect("session requested");
            let args = caps["capabilities"]["alwaysMatch"]["goog:chromeOptions"]["args"]
                .as_array()
                .unwrap()
                .clone();
            assert!(args.iter().any(|a| a == "--headless=new"));

            assert_eq!(
                *driver.calls.lock().unwrap(),
                vec![
                    "url https://www.youtube.com/watch?v=abc123".to_string(),
                    format!("find {MORE_ACTIONS_SELECTOR}"),
                    "click more".to_string(),
                    format!("find {SHOW_TRANSCRIPT_SELECTOR}"),
                    "click show".to_string(),
                    format!("find {SEGMENT_SELECTOR}"),
                    "text seg1".to_string(),
                    "text seg2".to_string(),
                ]
            );
            assert_eq!(driver.deletes.load(Ordering::SeqCst), 1);
        }

        #[tokio::test]
        async fn test_error_reply_fails_fast_and_ends_session() {
            let driver = Driver {
                dead_session: true,
                ..Driver::default()
            };
            let endpoint = serve(driver.clone()).await;

            let video = VideoRequest::resolve("https://www.youtube.com/watch?v=abc123").unwrap();
            let result = tokio::time::timeout(
                Duration::from_secs(2),
                provider(&endpoint, Duration::from_secs(10)).fetch_transcript(&video),
            )
            .await
            .expect("fatal WebDriver error was retried until the deadline");

            match result {
                Err(Error::ScrapeFailure { message }) => {
                    assert!(message.contains("invalid session id"), "{message}")
                }
                other => panic!("unexpected result: {other:?}"),
            }
            assert_eq!(driver.deletes.load(Ordering::SeqCst), 1);
        }

        #[tokio::test]
        async fn test_unreachable_driver_is_scrape_failure() {
            let video = VideoRequest::resolve("https://www.youtube.com/watch?v=abc123").unwrap();
            let err = provider("http://127.0.0.1:1", Duration::from_secs(1))
                .fetch_transcript(&video)
                .await
                .unwrap_err();
            assert!(err.to_string().contains("could not start browser"), "{err}");
        }
    }
}
