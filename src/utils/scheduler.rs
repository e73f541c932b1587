use std::future::Future;

use anyhow::Result;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{info, warn};

/// 每日摘要的定时调度器，任务失败只记录日志不退出
pub struct TaskScheduler {
    scheduler: JobScheduler,
}

impl TaskScheduler {
    pub async fn new() -> Result<Self> {
        let scheduler = JobScheduler::new().await?;
        Ok(Self { scheduler })
    }

    pub async fn add_daily_job<F, Fut>(&self, cron_expr: &str, job_fn: F) -> Result<()>
    where
        F: Fn() -> Fut + Send + Sync + Clone + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let job = Job::new_async(cron_expr, move |_uuid, _lock| {
            let job_fn = job_fn.clone();
            Box::pin(async move {
                info!("执行定时摘要任务");
                if let Err(e) = job_fn().await {
                    warn!("定时任务失败: {:#}", e);
                }
            })
        })?;

        self.scheduler.add(job).await?;
        Ok(())
    }

    pub async fn start(&self) -> Result<()> {
        self.scheduler.start().await?;
        info!("任务调度器已启动");
        Ok(())
    }

    pub async fn shutdown(mut self) -> Result<()> {
        self.scheduler.shutdown().await?;
        info!("任务调度器已关闭");
        Ok(())
    }
}
