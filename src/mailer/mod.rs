use std::path::PathBuf;

use anyhow::{Context, Result};
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, Message, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use tracing::{info, warn};

use crate::config::EmailConfig;

/// SMTP 邮件发送器：纯文本/HTML 双格式正文，支持附件
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    config: EmailConfig,
}

impl Mailer {
    pub fn new(config: EmailConfig) -> Result<Self> {
        let creds = Credentials::new(config.username.clone(), config.password.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .context("SMTP 配置无效")?
            .port(config.smtp_port)
            .credentials(creds)
            .build();

        Ok(Self { transport, config })
    }

    pub async fn send(
        &self,
        subject: &str,
        text_body: &str,
        html_body: Option<&str>,
        attachments: &[PathBuf],
    ) -> Result<()> {
        let from: Mailbox = self.config.from.parse().context("发件人地址无效")?;
        let to: Mailbox = self.config.to.parse().context("收件人地址无效")?;

        // 正文：HTML 可选，多数客户端优先展示 HTML 部分
        let alternative = match html_body {
            Some(html) => {
                MultiPart::alternative_plain_html(text_body.to_string(), html.to_string())
            }
            None => MultiPart::alternative().singlepart(SinglePart::plain(text_body.to_string())),
        };

        let mut body = MultiPart::mixed().multipart(alternative);
        for path in attachments {
            if !path.exists() {
                warn!("附件不存在，跳过: {}", path.display());
                continue;
            }
            let data = tokio::fs::read(path).await?;
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "attachment".to_string());
            body = body.singlepart(
                Attachment::new(filename).body(
                    data,
                    ContentType::parse("application/octet-stream").expect("合法的MIME类型"),
                ),
            );
        }

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(full_subject(&self.config.subject_prefix, subject))
            .multipart(body)
            .context("构建邮件失败")?;

        self.transport.send(message).await.context("发送邮件失败")?;
        info!("邮件已发送: {}", subject);
        Ok(())
    }
}

fn full_subject(prefix: &str, subject: &str) -> String {
    if prefix.is_empty() {
        subject.to_string()
    } else {
        format!("{} {}", prefix, subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_prefix_is_optional() {
        assert_eq!(full_subject("", "Digest"), "Digest");
        assert_eq!(
            full_subject("[Daily Paper Digest]", "2026-08-28"),
            "[Daily Paper Digest] 2026-08-28"
        );
    }
}
