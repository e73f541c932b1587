use serde::{Deserialize, Serialize};
use anyhow::Result;
use std::path::PathBuf;

/// 摘要主题：一个主题下挂若干检索关键词
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Topic {
    pub name: String,
    pub keywords: Vec<String>,
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KeywordConfig {
    pub topics: Vec<Topic>,
}

impl KeywordConfig {
    pub fn load() -> Result<Self> {
        let config_path = PathBuf::from("config/keywords.toml");

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)?;
        let config: KeywordConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn get_active_topics(&self) -> Vec<&Topic> {
        self.topics.iter().filter(|t| t.enabled).collect()
    }
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            topics: vec![
                Topic {
                    name: "3D reconstruction".to_string(),
                    keywords: vec![
                        "neural rendering".to_string(),
                        "novel view synthesis".to_string(),
                        "surface reconstruction".to_string(),
                    ],
                    enabled: true,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_topics_are_filtered() {
        let config = KeywordConfig {
            topics: vec![
                Topic {
                    name: "on".to_string(),
                    keywords: vec!["a".to_string()],
                    enabled: true,
                },
                Topic {
                    name: "off".to_string(),
                    keywords: vec!["b".to_string()],
                    enabled: false,
                },
            ],
        };
        let active = config.get_active_topics();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "on");
    }
}
