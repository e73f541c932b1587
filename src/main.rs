mod calendar;
mod config;
mod crawler;
mod generator;
mod mailer;
mod summarizer;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use calendar::GoogleCalendar;
use config::{AppConfig, KeywordConfig};
use crawler::ArxivCrawler;
use generator::DigestWriter;
use mailer::Mailer;
use summarizer::Summarizer;
use utils::logger;

#[derive(Parser)]
#[command(name = "digestbot")]
#[command(about = "每日论文摘要与日程推送系统", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 初始化配置
    Init,
    /// 运行一次摘要任务
    Digest {
        /// 只处理指定主题
        #[arg(short, long)]
        topic: Option<String>,
    },
    /// 摘要单篇文档并打印 Markdown
    Summarize {
        /// PDF 本地路径或URL
        #[arg(short, long)]
        location: String,
    },
    /// 启动定时任务
    Schedule,
}

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logger::init_logger();
    info!("digestbot 启动");

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            init_command().await?;
        }
        Commands::Digest { topic } => {
            digest_command(topic).await?;
        }
        Commands::Summarize { location } => {
            summarize_command(&location).await?;
        }
        Commands::Schedule => {
            schedule_command().await?;
        }
    }

    Ok(())
}

async fn init_command() -> Result<()> {
    info!("初始化系统...");

    tokio::fs::create_dir_all("config").await?;

    let app_config = AppConfig::default();
    app_config.save("config/settings.toml")?;
    info!("已生成配置文件: config/settings.toml");

    let keyword_config = KeywordConfig::default();
    let keyword_toml = toml::to_string_pretty(&keyword_config)?;
    tokio::fs::write("config/keywords.toml", keyword_toml).await?;
    info!("已生成关键词配置: config/keywords.toml");

    info!("✅ 系统初始化完成！");
    info!("下一步:");
    info!("  1. 编辑 config/settings.toml 配置API密钥");
    info!("  2. 编辑 config/keywords.toml 配置研究方向");
    info!("  3. 运行 'digestbot digest' 生成今日摘要");

    Ok(())
}

async fn digest_command(topic: Option<String>) -> Result<()> {
    let app_config = AppConfig::load()?;
    let keyword_config = KeywordConfig::load()?;
    run_digest(&app_config, &keyword_config, topic.as_deref()).await
}

/// 执行一次完整的摘要任务：检索 -> 摘要 -> 写文件 -> 日程 -> 邮件
async fn run_digest(
    app_config: &AppConfig,
    keyword_config: &KeywordConfig,
    topic_filter: Option<&str>,
) -> Result<()> {
    info!("开始摘要任务...");

    let summarizer = Summarizer::new(app_config.summarizer.clone());
    if !summarizer.is_configured() {
        info!("⚠️ API key 未配置，无法摘要。请在 config/settings.toml 中设置 [summarizer] api_key");
        return Ok(());
    }

    let topics = keyword_config.get_active_topics();
    if topics.is_empty() {
        info!("没有启用的主题，请检查 config/keywords.toml");
        return Ok(());
    }

    let crawler = ArxivCrawler::new(&app_config.crawler);
    let writer = DigestWriter::new(&app_config.output);
    let max_results = app_config.crawler.max_results_per_query;

    let today = chrono::Local::now().date_naive();
    let out_md = writer.ensure_digest(today, max_results).await?;

    // 去重依据：已写入摘要文件的内容（含本轮新增的条目ID）
    let mut existing = writer.read_existing(&out_md).await;

    for topic in topics {
        if let Some(name) = topic_filter {
            if topic.name != name {
                continue;
            }
        }

        info!("处理主题: {}", topic.name);
        info!("关键词: {:?}", topic.keywords);

        for kw in &topic.keywords {
            writer.append(&out_md, &format!("\n## {}\n", kw)).await?;

            let papers = match crawler.search(kw, max_results).await {
                Ok(papers) => papers,
                Err(e) => {
                    info!("arXiv 搜索失败: {}", e);
                    continue;
                }
            };

            if papers.is_empty() {
                writer.append(&out_md, "- (No results)\n").await?;
                continue;
            }

            for paper in &papers {
                // 条目ID已出现在摘要文件中则跳过（简单子串检查）
                if !paper.id.is_empty() && existing.contains(&paper.id) {
                    info!("论文已在摘要中，跳过: {}", paper.id);
                    continue;
                }

                info!("---");
                info!("标题: {}", paper.title);
                info!("作者: {}", paper.authors.join(", "));
                info!("发布日期: {}", paper.published);
                info!("PDF: {}", paper.pdf_url);

                // 单篇失败不影响整轮任务，写入失败标记后继续
                match summarizer.summarize_document(&paper.pdf_url).await {
                    Ok(summary) => {
                        let summary_md = summarizer::render::summary_to_markdown(&summary);
                        let entry = format!(
                            "### [{}]({})\n\n{}\n",
                            paper.title, paper.pdf_url, summary_md
                        );
                        writer.append(&out_md, &entry).await?;
                        existing.push_str(&paper.id);
                    }
                    Err(e) => {
                        info!("摘要失败: {}", e);
                        let entry = format!(
                            "### [{}]({})\n  (summary failed: {})\n\n",
                            paper.title, paper.pdf_url, e
                        );
                        writer.append(&out_md, &entry).await?;
                    }
                }

                // 延迟避免请求过快
                tokio::time::sleep(tokio::time::Duration::from_millis(
                    app_config.crawler.request_delay_ms,
                ))
                .await;
            }
        }
    }

    writer.update_readme(today).await?;

    if app_config.email.enabled {
        send_digest_email(app_config, &writer, &out_md, today).await?;
    }

    info!("✅ 摘要任务完成: {}", out_md.display());
    Ok(())
}

/// 发送当日摘要邮件：正文为摘要Markdown（可选附带日程），摘要文件作为附件
async fn send_digest_email(
    app_config: &AppConfig,
    writer: &DigestWriter,
    out_md: &std::path::Path,
    today: chrono::NaiveDate,
) -> Result<()> {
    let mut text_body = writer.read_existing(out_md).await;
    let mut html_body = None;

    if app_config.calendar.enabled {
        let calendar = GoogleCalendar::new(app_config.calendar.clone());
        match calendar.list_today().await {
            Ok(events) => {
                text_body.push_str("\n\n## 今日行程\n\n");
                text_body.push_str(&calendar::events_to_markdown(&events));
                html_body = Some(calendar::events_to_html(&events));
            }
            Err(e) => {
                info!("日程读取失败，邮件不含行程: {}", e);
            }
        }
    }

    let mailer = Mailer::new(app_config.email.clone())?;
    let subject = format!("Daily Paper Digest · {}", today.format("%Y-%m-%d"));
    mailer
        .send(
            &subject,
            &text_body,
            html_body.as_deref(),
            &[out_md.to_path_buf()],
        )
        .await?;

    Ok(())
}

async fn summarize_command(location: &str) -> Result<()> {
    let app_config = AppConfig::load()?;

    let summarizer = Summarizer::new(app_config.summarizer.clone());
    if !summarizer.is_configured() {
        info!("❌ API key 未配置。请在 config/settings.toml 中设置 [summarizer] api_key");
        return Ok(());
    }

    info!("摘要文档: {}", location);
    let summary = summarizer.summarize_document(location).await?;
    println!("{}", summarizer::render::summary_to_markdown(&summary));

    Ok(())
}

async fn schedule_command() -> Result<()> {
    info!("启动定时任务调度器...");

    let scheduler = utils::scheduler::TaskScheduler::new().await?;

    // 每天早上8点执行一次摘要任务
    scheduler
        .add_daily_job("0 0 8 * * *", || async {
            let app_config = AppConfig::load()?;
            let keyword_config = KeywordConfig::load()?;
            run_digest(&app_config, &keyword_config, None).await
        })
        .await?;

    scheduler.start().await?;

    info!("调度器运行中，按 Ctrl+C 停止");

    tokio::signal::ctrl_c().await?;
    info!("收到停止信号");

    scheduler.shutdown().await?;
    Ok(())
}
