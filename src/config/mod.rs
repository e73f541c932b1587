pub mod keywords;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use anyhow::Result;

pub use keywords::KeywordConfig;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub crawler: CrawlerConfig,
    pub summarizer: SummarizerConfig,
    pub calendar: CalendarConfig,
    pub email: EmailConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CrawlerConfig {
    pub max_results_per_query: usize,
    pub request_delay_ms: u64,
    pub user_agent: String,
}

/// 摘要管道的全部可调参数，显式传入 Summarizer，不走全局状态
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SummarizerConfig {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub chunk_size: usize,
    pub overlap: usize,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CalendarConfig {
    pub enabled: bool,
    pub api_url: String,
    pub calendar_id: String,
    pub access_token: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    pub enabled: bool,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
    pub to: String,
    pub subject_prefix: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    pub digest_dir: String,
    pub readme_path: String,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let config_path = PathBuf::from("config/settings.toml");

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig {
                max_results_per_query: 5,
                request_delay_ms: 1000,
                user_agent: "DigestBot/1.0 (academic research; mailto:user@example.com)"
                    .to_string(),
            },
            summarizer: SummarizerConfig {
                api_key: "your-api-key".to_string(),
                api_url: "https://api.openai.com/v1/chat/completions".to_string(),
                model: "gpt-4o-mini".to_string(),
                chunk_size: 8000,
                overlap: 500,
                request_timeout_secs: 90,
            },
            calendar: CalendarConfig {
                enabled: false,
                api_url: "https://www.googleapis.com/calendar/v3".to_string(),
                calendar_id: "primary".to_string(),
                access_token: String::new(),
            },
            email: EmailConfig {
                enabled: false,
                smtp_host: "smtp.gmail.com".to_string(),
                smtp_port: 587,
                username: String::new(),
                password: String::new(),
                from: String::new(),
                to: String::new(),
                subject_prefix: "[Daily Paper Digest]".to_string(),
            },
            output: OutputConfig {
                digest_dir: ".".to_string(),
                readme_path: "README.md".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrips_through_toml() {
        let config = AppConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.summarizer.chunk_size, 8000);
        assert_eq!(parsed.summarizer.overlap, 500);
        assert_eq!(parsed.summarizer.request_timeout_secs, 90);
    }
}
