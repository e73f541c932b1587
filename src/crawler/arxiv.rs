use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use std::time::Duration;

use crate::config::CrawlerConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArxivPaper {
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub summary: String,
    pub published: String,
    pub pdf_url: String,
    pub categories: Vec<String>,
}

pub struct ArxivCrawler {
    client: Client,
    base_url: String,
    max_retries: u32,
}

impl ArxivCrawler {
    pub fn new(config: &CrawlerConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .user_agent(config.user_agent.clone())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: "https://export.arxiv.org/api/query".to_string(),
            max_retries: 3,
        }
    }

    /// 按关键词检索最新投稿，按提交日期倒序
    pub async fn search(&self, keyword: &str, max_results: usize) -> Result<Vec<ArxivPaper>> {
        let query = keyword.replace(' ', "+");
        let url = format!(
            "{}?search_query=all:{}&start=0&max_results={}&sortBy=submittedDate&sortOrder=descending",
            self.base_url, query, max_results
        );

        info!("正在搜索 arXiv: {}", url);

        for attempt in 1..=self.max_retries {
            // 请求前延迟，arXiv 要求至少3秒间隔
            let delay = Duration::from_secs(3 * attempt as u64);
            info!("等待 {}s 后发送请求 (第 {}/{} 次)", delay.as_secs(), attempt, self.max_retries);
            tokio::time::sleep(delay).await;

            let response = match self.client.get(&url).send().await {
                Ok(resp) => resp,
                Err(e) => {
                    warn!("请求失败 (第 {}/{} 次): {}", attempt, self.max_retries, e);
                    continue;
                }
            };

            let status = response.status();
            let text = response.text().await?;

            info!("arXiv 响应状态: {}, 内容长度: {} 字节", status, text.len());

            // 429/502/503 或响应体含 "Rate exceeded" 都视为限流/服务不可用
            if status.as_u16() == 429 || status.as_u16() == 502 || status.as_u16() == 503
                || text.contains("Rate exceeded")
            {
                warn!("arXiv 返回 {} (第 {}/{} 次尝试)", status, attempt, self.max_retries);
                if attempt < self.max_retries {
                    let backoff = Duration::from_secs(30 * attempt as u64);
                    info!("等待 {}s 后重试...", backoff.as_secs());
                    tokio::time::sleep(backoff).await;
                }
                continue;
            }

            let papers = parse_arxiv_response(&text);
            info!("找到 {} 篇论文", papers.len());
            return Ok(papers);
        }

        warn!("arXiv API 请求在 {} 次重试后仍然失败", self.max_retries);
        Ok(vec![])
    }
}

fn parse_arxiv_response(xml: &str) -> Vec<ArxivPaper> {
    let mut papers = Vec::new();

    if !xml.contains("<entry>") {
        warn!("XML中没有找到<entry>标签");
        warn!("XML前500字符: {}", &xml.chars().take(500).collect::<String>());
        return papers;
    }

    for entry_text in xml.split("<entry>").skip(1) {
        if let Some(paper) = parse_entry(entry_text) {
            papers.push(paper);
        }
    }

    if papers.is_empty() {
        warn!("未能解析到论文，可能是XML格式问题");
    }

    papers
}

fn parse_entry(entry_text: &str) -> Option<ArxivPaper> {
    let id = extract_tag(entry_text, "id")?;

    let title = extract_tag(entry_text, "title")?
        .trim()
        .replace('\n', " ")
        .replace("  ", " ");

    let summary = extract_tag(entry_text, "summary")?
        .trim()
        .replace('\n', " ")
        .replace("  ", " ");

    let published = extract_tag(entry_text, "published")?;

    let mut authors = Vec::new();
    for author_block in entry_text.split("<author>").skip(1) {
        if let Some(name) = extract_tag(author_block, "name") {
            authors.push(name.trim().to_string());
        }
    }

    // 提取PDF链接
    let pdf_url = if let Some(pdf_id) = id.strip_prefix("http://arxiv.org/abs/") {
        format!("http://arxiv.org/pdf/{}.pdf", pdf_id)
    } else {
        format!("{}.pdf", id.replace("/abs/", "/pdf/"))
    };

    let mut categories = Vec::new();
    for cat_block in entry_text.split("<category term=\"").skip(1) {
        if let Some(end) = cat_block.find('"') {
            categories.push(cat_block[..end].to_string());
        }
    }

    Some(ArxivPaper {
        id,
        title,
        authors,
        summary,
        published,
        pdf_url,
        categories,
    })
}

fn extract_tag(text: &str, tag: &str) -> Option<String> {
    let start_tag = format!("<{}>", tag);
    let end_tag = format!("</{}>", tag);

    let start = text.find(&start_tag)? + start_tag.len();
    let end = text.find(&end_tag)?;

    Some(text[start..end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENTRY: &str = r#"
    <id>http://arxiv.org/abs/2408.01234v1</id>
    <title>Fast Neural
 Rendering</title>
    <summary>We propose a fast renderer.</summary>
    <published>2026-08-27T17:59:59Z</published>
    <author><name>Alice Zhang</name></author>
    <author><name>Bob Li</name></author>
    <category term="cs.CV" scheme="http://arxiv.org/schemas/atom"/>
    <category term="cs.GR" scheme="http://arxiv.org/schemas/atom"/>
    "#;

    #[test]
    fn parses_single_entry() {
        let paper = parse_entry(ENTRY).unwrap();
        assert_eq!(paper.id, "http://arxiv.org/abs/2408.01234v1");
        assert_eq!(paper.title, "Fast Neural Rendering");
        assert_eq!(paper.summary, "We propose a fast renderer.");
        assert_eq!(paper.published, "2026-08-27T17:59:59Z");
        assert_eq!(paper.authors, vec!["Alice Zhang", "Bob Li"]);
        assert_eq!(paper.pdf_url, "http://arxiv.org/pdf/2408.01234v1.pdf");
        assert_eq!(paper.categories, vec!["cs.CV", "cs.GR"]);
    }

    #[test]
    fn response_without_entries_is_empty() {
        let xml = "<feed><totalResults>0</totalResults></feed>";
        assert!(parse_arxiv_response(xml).is_empty());
    }

    #[test]
    fn splits_multiple_entries() {
        let xml = format!("<feed><entry>{e}</entry><entry>{e}</entry></feed>", e = ENTRY);
        let papers = parse_arxiv_response(&xml);
        assert_eq!(papers.len(), 2);
    }

    #[test]
    fn entry_missing_id_is_skipped() {
        assert!(parse_entry("<title>no id</title>").is_none());
    }
}
