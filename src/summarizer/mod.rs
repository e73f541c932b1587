pub mod acquire;
pub mod chunk;
pub mod client;
pub mod merge;
pub mod render;
pub mod schema;

use std::time::Duration;

use tracing::{info, warn};

use crate::config::SummarizerConfig;
use crate::utils::AcquireError;
use client::ModelClient;
use schema::{CanonicalSummary, SummaryFragment};

const SYSTEM_PROMPT: &str = "You are a meticulous academic assistant. \
Always output a valid single JSON object with all keys. \
If a field is missing in the text, fill it with 'N/A'.";

/// 发给模型的机器可读结构提示，与 schema 模块的字段一一对应
const SCHEMA_HINT: &str = r#"{
  "paper_title": "string",
  "task": "string",
  "motivation_and_gaps": {
    "overview": "string",
    "related_work_challenges": [{"work": "string", "challenge": "string"}]
  },
  "core_idea": "string",
  "method": {
    "pipeline": "string",
    "architecture_loss_training": "string",
    "complexity_resources": "string"
  },
  "experiments": {
    "datasets_and_metrics": "string",
    "baselines": ["string"],
    "main_results": "string",
    "ablations": "string",
    "limitations_tests": "string"
  },
  "takeaways": {
    "pros_3": ["string", "string", "string"],
    "cons_3": ["string", "string", "string"],
    "future_3": ["string", "string", "string"]
  },
  "resources": {
    "code_links": ["string"],
    "model_or_data_links": ["string"]
  }
}"#;

/// PDF摘要管道：下载/打开 -> 逐页提取 -> 切窗 -> 逐窗摘要 -> 合并。
///
/// 配置为显式传入的值，不依赖全局状态；同一文档内窗口严格按序处理。
pub struct Summarizer {
    http: reqwest::Client,
    model: ModelClient,
    config: SummarizerConfig,
}

impl Summarizer {
    pub fn new(config: SummarizerConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent("Mozilla/5.0")
            .build()
            .expect("Failed to create HTTP client");

        let model = ModelClient::new(http.clone(), config.clone());
        Self { http, model, config }
    }

    /// 检查模型 API key 是否已配置
    pub fn is_configured(&self) -> bool {
        self.model.is_configured()
    }

    /// 对外唯一入口：摘要一篇文档，返回规范摘要。
    ///
    /// 仅获取阶段的失败会上抛；窗口级失败全部降级为占位片段。
    pub async fn summarize_document(
        &self,
        location: &str,
    ) -> Result<CanonicalSummary, AcquireError> {
        let text = acquire::acquire_text(&self.http, location).await?;
        let windows = chunk::chunk_text(&text, self.config.chunk_size, self.config.overlap);
        info!("文档切分为 {} 个窗口", windows.len());

        let mut fragments = Vec::with_capacity(windows.len());
        for (i, window) in windows.iter().enumerate() {
            info!("摘要窗口 {}/{}", i + 1, windows.len());
            fragments.push(self.summarize_window(window).await);
        }

        Ok(merge::merge_fragments(&fragments))
    }

    /// 摘要单个窗口，永不失败：请求或解析失败都降级为全占位片段
    async fn summarize_window(&self, window: &str) -> SummaryFragment {
        let user_content = format!(
            "Return JSON exactly in this shape:\n{}\n\nPaper content chunk:\n{}",
            SCHEMA_HINT, window
        );

        match self.model.complete(SYSTEM_PROMPT, &user_content).await {
            Ok(text) => schema::parse_fragment(&text),
            Err(e) => {
                warn!("模型请求失败，使用占位片段: {}", e);
                SummaryFragment::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_hint_matches_fragment_shape() {
        // 结构提示本身必须能解析成合法片段，防止提示与类型定义脱节
        let fragment = schema::parse_fragment(SCHEMA_HINT);
        assert_eq!(fragment.paper_title, "string");
        assert_eq!(fragment.takeaways.pros_3.len(), 3);
        assert_eq!(fragment.resources.code_links, vec!["string"]);
    }

    #[test]
    fn empty_document_merges_to_placeholder_summary() {
        let windows = chunk::chunk_text("", 8000, 500);
        assert!(windows.is_empty());
        let merged = merge::merge_fragments(&[]);
        assert_eq!(merged, CanonicalSummary::default());
    }
}
