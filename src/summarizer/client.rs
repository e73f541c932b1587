use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::SummarizerConfig;

/// OpenAI 兼容的 chat completions 请求体
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

/// chat completions 响应体
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

/// 结构化输出的模型客户端。
///
/// temperature 固定为 0 保证可复现；response_format 要求单个JSON对象。
/// 不做重试，失败直接上抛给调用方降级处理。
pub struct ModelClient {
    client: reqwest::Client,
    config: SummarizerConfig,
}

impl ModelClient {
    pub fn new(client: reqwest::Client, config: SummarizerConfig) -> Self {
        Self { client, config }
    }

    /// 检查 API key 是否已配置
    pub fn is_configured(&self) -> bool {
        !self.config.api_key.is_empty() && self.config.api_key != "your-api-key"
    }

    /// 发送单次结构化摘要请求，返回模型的原始文本响应
    pub async fn complete(&self, system_prompt: &str, user_content: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_content.to_string(),
                },
            ],
            temperature: 0.0,
            response_format: ResponseFormat {
                format_type: "json_object".to_string(),
            },
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .context("发送请求失败")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("API 返回错误 {}: {}", status, body);
        }

        let chat_response: ChatResponse = response.json().await.context("解析 API 响应失败")?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        Ok(content)
    }
}
