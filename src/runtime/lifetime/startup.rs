use crate::config::AppConfig;
use crate::errors::Result;
use crate::services::{DueDateService, GradeService, GraceCreditService, SubmissionRuleService};
use crate::storage::Storage;
use crate::utils::{Clock, SystemClock};
use std::sync::Arc;
use tracing::{debug, warn};

/// 启动后供各命令使用的服务集合
pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub due_dates: DueDateService,
    pub submission_rules: SubmissionRuleService,
    pub grace_credits: GraceCreditService,
    pub grades: GradeService,
}

impl StartupContext {
    /// 用给定的存储与时钟组装服务
    pub fn assemble(storage: Arc<dyn Storage>, clock: Arc<dyn Clock>, config: &AppConfig) -> Self {
        let settings = config.grading_settings();
        debug!(
            "Grading settings: {} distribution intervals, {} default grace credits",
            settings.distribution_intervals, settings.default_grace_credits
        );

        Self {
            due_dates: DueDateService::new(storage.clone(), clock.clone()),
            submission_rules: SubmissionRuleService::new(storage.clone(), clock.clone()),
            grace_credits: GraceCreditService::new(storage.clone(), settings),
            grades: GradeService::new(storage.clone(), clock, settings),
            storage,
        }
    }
}

/// 准备启动上下文
/// 连接存储并执行迁移
pub async fn prepare_startup() -> Result<StartupContext> {
    let config = AppConfig::get();

    let storage = crate::storage::create_storage(&config.database).await?;
    warn!("Storage backend initialized and migrations completed");

    Ok(StartupContext::assemble(
        storage,
        Arc::new(SystemClock),
        config,
    ))
}
