use std::path::PathBuf;
use std::process::Command;
use std::sync::Arc;

use eyre::{Result, WrapErr};
use log::info;

mod cli;

use cli::Cli;
use ytsum::config::{self, Config, ProviderKind};
use ytsum::llm::LlmClient;
use ytsum::pipeline::Pipeline;
use ytsum::server::{self, AppState, SUMMARIZE_PATH};
use ytsum::transcript::{BrowserProvider, CaptionProvider, TranscriptProvider, USER_AGENT, WebDriver};

fn setup_logging(to_stderr: bool) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    if to_stderr {
        builder.target(env_logger::Target::Stderr).init();
        return Ok(());
    }

    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("ytsum.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    builder.target(env_logger::Target::Pipe(target)).init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytsum")
        .join("logs")
}

fn tool_version(name: &str) -> Option<String> {
    Command::new(name)
        .arg("--version")
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| {
            String::from_utf8_lossy(&o.stdout)
                .trim()
                .lines()
                .next()
                .unwrap_or("")
                .to_string()
        })
}

fn build_after_help() -> String {
    let chromedriver = tool_version("chromedriver");

    let chromedriver_line = match &chromedriver {
        Some(v) => format!("  \x1b[32m✅\x1b[0m chromedriver  {v}"),
        None => "  \x1b[31m❌\x1b[0m chromedriver  (not found — needed for --provider browser)".to_string(),
    };

    let log_path = log_dir().join("ytsum.log");

    format!(
        "\nOPTIONAL TOOLS:\n{chromedriver_line}\n\nENVIRONMENT:\n  OPENAI_API_KEY     credential for gpt-* models (OPENAI_ACCESS also accepted)\n  ANTHROPIC_API_KEY  credential for claude-* models\n  (a .env file in the working directory is loaded first)\n\nLogs are written to: {}",
        log_path.display()
    )
}

fn http_client(config: &Config) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
    if let Some(timeout) = config.request_timeout() {
        builder = builder.timeout(timeout);
    }
    builder.build().wrap_err("building HTTP client")
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let after_help = build_after_help();
    let cmd = <Cli as clap::CommandFactory>::command().after_help(after_help);
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    setup_logging(cli.verbose)?;

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_default(),
    };

    // CLI flags take priority over the config file
    config.bind = cli.bind.or(config.bind);
    config.provider = cli.provider.or(config.provider);
    config.model = cli.model.clone().or(config.model);
    config.webdriver_url = cli.webdriver_url.clone().or(config.webdriver_url);

    let api_key = config::api_key(config.model())?;
    let client = http_client(&config)?;

    let provider: Arc<dyn TranscriptProvider> = match config.provider() {
        ProviderKind::Captions => Arc::new(CaptionProvider::new(client.clone(), config.languages())),
        ProviderKind::Browser => Arc::new(BrowserProvider::new(
            Arc::new(WebDriver::new(client.clone(), config.webdriver_url())),
            config.scrape_timeout(),
        )),
    };
    let llm = Arc::new(LlmClient::new(client, api_key, config.model()));

    info!(
        "Transcript provider: {}, model: {}",
        provider.name(),
        llm.model()
    );

    let state = AppState {
        pipeline: Pipeline::new(provider, llm),
        default_url: config.default_url.as_deref().map(Arc::from),
    };

    let addr = config.bind();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .wrap_err_with(|| format!("binding to {addr}"))?;
    info!("Listening on http://{addr}{SUMMARIZE_PATH}");
    eprintln!("ytsum listening on http://{addr}{SUMMARIZE_PATH}");

    axum::serve(listener, server::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("running HTTP server")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to install Ctrl+C handler: {e}");
    }
}
