use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::config::OutputConfig;

/// 按日期组织的摘要文件写入器。
///
/// 摘要文件路径为 <digest_dir>/YYYY/MM/DD.md，README 维护当日链接。
pub struct DigestWriter {
    digest_dir: PathBuf,
    readme_path: PathBuf,
}

impl DigestWriter {
    pub fn new(output: &OutputConfig) -> Self {
        Self {
            digest_dir: PathBuf::from(&output.digest_dir),
            readme_path: PathBuf::from(&output.readme_path),
        }
    }

    pub fn digest_path(&self, date: NaiveDate) -> PathBuf {
        self.digest_dir.join(digest_rel_path(date))
    }

    /// 创建当日摘要文件（含头部），已存在则不动
    pub async fn ensure_digest(&self, date: NaiveDate, max_results: usize) -> Result<PathBuf> {
        let path = self.digest_path(date);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        if !path.exists() {
            tokio::fs::write(&path, digest_header(date, max_results)).await?;
            info!("创建摘要文件: {}", path.display());
        }
        Ok(path)
    }

    pub async fn read_existing(&self, path: &Path) -> String {
        tokio::fs::read_to_string(path).await.unwrap_or_default()
    }

    pub async fn append(&self, path: &Path, content: &str) -> Result<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        file.write_all(content.as_bytes()).await?;
        Ok(())
    }

    /// 向 README 追加当日摘要链接，已有则跳过；README 缺失时创建
    pub async fn update_readme(&self, date: NaiveDate) -> Result<()> {
        let link_line = readme_link_line(date);

        if self.readme_path.exists() {
            let text = tokio::fs::read_to_string(&self.readme_path).await?;
            if !text.contains(&link_line) {
                self.append(&self.readme_path, &format!("\n{}", link_line))
                    .await?;
            }
        } else {
            tokio::fs::write(
                &self.readme_path,
                format!("# Daily ArXiv Digest\n\n{}", link_line),
            )
            .await?;
        }
        Ok(())
    }
}

fn digest_rel_path(date: NaiveDate) -> PathBuf {
    PathBuf::from(format!(
        "{:04}/{:02}/{:02}.md",
        date.year(),
        date.month(),
        date.day()
    ))
}

fn digest_header(date: NaiveDate, max_results: usize) -> String {
    format!(
        "# Daily Paper Digest · {}\n\
         > Auto-generated: Recent submissions from arXiv are fetched by topic and keyword (up to {} papers per query).\n",
        date.format("%Y-%m-%d"),
        max_results
    )
}

fn readme_link_line(date: NaiveDate) -> String {
    format!(
        "- [{} Digest]({:04}/{:02}/{:02}.md)\n",
        date.format("%Y-%m-%d"),
        date.year(),
        date.month(),
        date.day()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 28).unwrap()
    }

    #[test]
    fn digest_path_is_year_month_day() {
        assert_eq!(digest_rel_path(date()), PathBuf::from("2026/08/28.md"));
    }

    #[test]
    fn header_names_date_and_limit() {
        let header = digest_header(date(), 5);
        assert!(header.starts_with("# Daily Paper Digest · 2026-08-28"));
        assert!(header.contains("up to 5 papers per query"));
    }

    #[test]
    fn readme_link_points_at_digest_file() {
        assert_eq!(
            readme_link_line(date()),
            "- [2026-08-28 Digest](2026/08/28.md)\n"
        );
    }

    #[tokio::test]
    async fn ensure_digest_creates_once() {
        let dir = tempfile::tempdir().unwrap();
        let output = OutputConfig {
            digest_dir: dir.path().to_string_lossy().to_string(),
            readme_path: dir.path().join("README.md").to_string_lossy().to_string(),
        };
        let writer = DigestWriter::new(&output);

        let path = writer.ensure_digest(date(), 3).await.unwrap();
        writer.append(&path, "\n## neural rendering\n").await.unwrap();
        // 第二次调用不覆盖已追加的内容
        let path2 = writer.ensure_digest(date(), 3).await.unwrap();
        assert_eq!(path, path2);
        let text = writer.read_existing(&path).await;
        assert!(text.contains("# Daily Paper Digest"));
        assert!(text.contains("## neural rendering"));
    }

    #[tokio::test]
    async fn readme_link_is_appended_once() {
        let dir = tempfile::tempdir().unwrap();
        let output = OutputConfig {
            digest_dir: dir.path().to_string_lossy().to_string(),
            readme_path: dir.path().join("README.md").to_string_lossy().to_string(),
        };
        let writer = DigestWriter::new(&output);

        writer.update_readme(date()).await.unwrap();
        writer.update_readme(date()).await.unwrap();
        let text = tokio::fs::read_to_string(dir.path().join("README.md"))
            .await
            .unwrap();
        assert_eq!(text.matches("2026-08-28 Digest").count(), 1);
    }
}
