use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use eyre::Result;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::llm::Vendor;

/// Which transcript strategy a deployment uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Captions,
    Browser,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub bind: Option<SocketAddr>,
    pub provider: Option<ProviderKind>,
    pub model: Option<String>,
    pub languages: Option<Vec<String>>,
    pub webdriver_url: Option<String>,
    pub scrape_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub default_url: Option<String>,
}

impl Config {
    /// Load config from ~/.config/ytsum/config.toml if it exists
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }

    pub fn bind(&self) -> SocketAddr {
        self.bind.unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 5000)))
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider.unwrap_or_default()
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or("gpt-3.5-turbo")
    }

    pub fn languages(&self) -> Vec<String> {
        match &self.languages {
            Some(langs) if !langs.is_empty() => langs.clone(),
            _ => vec!["en".to_string()],
        }
    }

    pub fn webdriver_url(&self) -> &str {
        self.webdriver_url.as_deref().unwrap_or("http://localhost:9515")
    }

    pub fn scrape_timeout(&self) -> Duration {
        Duration::from_secs(self.scrape_timeout_secs.unwrap_or(15))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Read the chat API credential for `model` from the environment
pub fn api_key(model: &str) -> Result<String> {
    api_key_from(model, |var| std::env::var(var).ok())
}

fn api_key_from(model: &str, lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
    let vars = Vendor::for_model(model).key_vars();
    vars.iter()
        .find_map(|var| lookup(var).filter(|k| !k.trim().is_empty()))
        .ok_or_else(|| {
            eyre::eyre!(
                "{} environment variable not set (required for model {model})",
                vars.join(" or ")
            )
        })
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("ytsum")
        .join("config.toml")
}
