use std::path::Path;

use reqwest::Client;
use tracing::{info, warn};

use crate::utils::AcquireError;

/// 把 PDF 位置（本地路径或远程URL）解析为提取后的纯文本。
///
/// 远程URL先下载到作用域内的临时文件，临时文件随本次调用结束释放。
pub async fn acquire_text(client: &Client, location: &str) -> Result<String, AcquireError> {
    if location.starts_with("http://") || location.starts_with("https://") {
        info!("下载PDF: {}", location);

        let response = client.get(location).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AcquireError::Status(status));
        }

        let bytes = response.bytes().await?;
        let tmp = tempfile::Builder::new().suffix(".pdf").tempfile()?;
        std::fs::write(tmp.path(), &bytes)?;
        info!("PDF下载完成: {} 字节", bytes.len());

        extract_text(tmp.path())
    } else {
        extract_text(Path::new(location))
    }
}

/// 逐页提取PDF文本并拼接。
///
/// 单页提取失败以空字符串代替，不中断整篇提取。
pub fn extract_text(pdf_path: &Path) -> Result<String, AcquireError> {
    let doc = lopdf::Document::load(pdf_path)
        .map_err(|e| AcquireError::Document(format!("{}: {}", pdf_path.display(), e)))?;

    let mut pages = Vec::new();
    for (page_num, _) in doc.get_pages() {
        match doc.extract_text(&[page_num]) {
            Ok(text) => pages.push(text),
            Err(e) => {
                warn!("第 {} 页提取失败: {}", page_num, e);
                pages.push(String::new());
            }
        }
    }

    let text = pages.join("\n");
    info!("提取文本长度: {} 字符", text.chars().count());
    Ok(text)
}
