// src/config.rs
use std::{net::IpAddr, path::PathBuf, str::FromStr, time::Duration};

use crate::error::{AppError, Result};

pub const DEFAULT_PORT: u16 = 10000;
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo-instruct";
pub const DEFAULT_MAX_TOKENS: u32 = 150;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// What `/chat` does with a message that is empty after trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyMessagePolicy {
    /// 400 with `{"error": "No message provided"}`.
    #[default]
    Reject,
    /// 200 with an apologetic reply.
    Apologize,
}

impl FromStr for EmptyMessagePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "apologize" | "apologise" => Ok(Self::Apologize),
            other => Err(format!("expected `reject` or `apologize`, got `{other}`")),
        }
    }
}

/// What `GET /` serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HomePage {
    #[default]
    Widget,
    Banner,
}

impl FromStr for HomePage {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "widget" => Ok(Self::Widget),
            "banner" => Ok(Self::Banner),
            other => Err(format!("expected `widget` or `banner`, got `{other}`")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub openai: OpenAiSettings,
    pub empty_message_policy: EmptyMessagePolicy,
    pub home_page: HomePage,
    pub static_dir: PathBuf,
}

impl Config {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset.
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        // Must be non-zero.
        let timeout_secs = parse_or(&get, "OPENAI_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(AppError::Config(
                "OPENAI_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        let openai = OpenAiSettings {
            api_key: get("OPENAI_API_KEY"),
            base_url: get("OPENAI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens: parse_or(&get, "OPENAI_MAX_TOKENS", DEFAULT_MAX_TOKENS)?,
            timeout: Duration::from_secs(timeout_secs),
        };

        Ok(Self {
            host: parse_or(&get, "HOST", IpAddr::from([0, 0, 0, 0]))?,
            port: parse_or(&get, "PORT", DEFAULT_PORT)?,
            openai,
            empty_message_policy: parse_or(&get, "EMPTY_MESSAGE_POLICY", EmptyMessagePolicy::default())?,
            home_page: parse_or(&get, "HOME_PAGE", HomePage::default())?,
            static_dir: get("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("public")),
        })
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .parse()
            .map_err(|e| AppError::Config(format!("{key}={raw:?}: {e}"))),
        None => Ok(default),
    }
}
