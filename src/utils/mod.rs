pub mod logger;
pub mod scheduler;

use thiserror::Error;

/// 文档获取阶段的错误。
///
/// 对单篇文档是致命的，但摘要循环逐篇捕获并写入失败标记，
/// 不会中断整轮摘要生成。
#[derive(Error, Debug)]
pub enum AcquireError {
    #[error("网络请求错误: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("下载失败，状态码: {0}")]
    Status(reqwest::StatusCode),

    #[error("PDF处理错误: {0}")]
    Document(String),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),
}
