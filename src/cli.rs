use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

use ytsum::config::ProviderKind;

#[derive(Parser)]
#[command(
    name = "ytsum",
    about = "Summarize and tag YouTube videos over HTTP",
    version = env!("CARGO_PKG_VERSION"),
)]
pub struct Cli {
    /// Address to listen on
    #[arg(short, long)]
    pub bind: Option<SocketAddr>,

    /// Transcript source: captions (default) or browser
    #[arg(short, long, value_enum)]
    pub provider: Option<ProviderKind>,

    /// LLM model for summaries and tags
    #[arg(short, long)]
    pub model: Option<String>,

    /// WebDriver endpoint used by the browser provider
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Config file (defaults to ~/.config/ytsum/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log to stderr instead of the log file
    #[arg(short, long)]
    pub verbose: bool,
}
