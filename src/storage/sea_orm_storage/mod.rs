//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod assignments;
mod deductions;
mod groupings;
mod results;
mod sections;
mod stats;
mod students;
mod submission_rules;
mod submissions;

use crate::config::DatabaseConfig;
use crate::errors::{GradingError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async(config: &DatabaseConfig) -> Result<Self> {
        let db_url = Self::build_database_url(&config.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| GradingError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| GradingError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| GradingError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.timeout))
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| GradingError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(GradingError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    assignments::{
        entities::{Assignment, Section, SectionDueDate},
        requests::{CreateAssignmentRequest, SectionDueDateRequest},
    },
    criteria::{entities::Criterion, requests::CreateCriterionRequest},
    deductions::entities::GracePeriodDeduction,
    groupings::entities::{Grouping, Membership, MembershipStatus},
    results::entities::{ExtraMark, ExtraMarkUnit, Mark, MarkingState, ResultDetail, SubmissionResult},
    stats::entities::AssignmentStats,
    students::{entities::Student, requests::CreateStudentRequest},
    submission_rules::{entities::SubmissionRule, requests::SubmissionRuleRequest},
    submissions::entities::Submission,
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 作业模块
    async fn create_assignment(&self, req: CreateAssignmentRequest) -> Result<Assignment> {
        self.create_assignment_impl(req).await
    }

    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(assignment_id).await
    }

    async fn get_assignment_by_short_identifier(
        &self,
        short_identifier: &str,
    ) -> Result<Option<Assignment>> {
        self.get_assignment_by_short_identifier_impl(short_identifier)
            .await
    }

    // 教学班模块
    async fn create_section(&self, name: &str) -> Result<Section> {
        self.create_section_impl(name).await
    }

    async fn get_section_by_id(&self, section_id: i64) -> Result<Option<Section>> {
        self.get_section_by_id_impl(section_id).await
    }

    async fn set_section_due_date(
        &self,
        assignment_id: i64,
        req: SectionDueDateRequest,
    ) -> Result<SectionDueDate> {
        self.set_section_due_date_impl(assignment_id, req).await
    }

    async fn list_section_due_dates(&self, assignment_id: i64) -> Result<Vec<SectionDueDate>> {
        self.list_section_due_dates_impl(assignment_id).await
    }

    // 提交规则模块
    async fn get_submission_rule(&self, assignment_id: i64) -> Result<Option<SubmissionRule>> {
        self.get_submission_rule_impl(assignment_id).await
    }

    async fn replace_submission_rule(
        &self,
        assignment_id: i64,
        req: SubmissionRuleRequest,
    ) -> Result<SubmissionRule> {
        self.replace_submission_rule_impl(assignment_id, req).await
    }

    // 学生模块
    async fn create_student(&self, req: CreateStudentRequest) -> Result<Student> {
        self.create_student_impl(req).await
    }

    async fn get_student_by_id(&self, student_id: i64) -> Result<Option<Student>> {
        self.get_student_by_id_impl(student_id).await
    }

    async fn list_students(&self) -> Result<Vec<Student>> {
        self.list_students_impl().await
    }

    // 小组模块
    async fn create_grouping(&self, assignment_id: i64, group_name: &str) -> Result<Grouping> {
        self.create_grouping_impl(assignment_id, group_name).await
    }

    async fn get_grouping_by_id(&self, grouping_id: i64) -> Result<Option<Grouping>> {
        self.get_grouping_by_id_impl(grouping_id).await
    }

    async fn list_groupings(&self, assignment_id: i64) -> Result<Vec<Grouping>> {
        self.list_groupings_impl(assignment_id).await
    }

    async fn add_membership(
        &self,
        grouping_id: i64,
        user_id: i64,
        status: MembershipStatus,
    ) -> Result<Membership> {
        self.add_membership_impl(grouping_id, user_id, status).await
    }

    async fn list_memberships(&self, grouping_id: i64) -> Result<Vec<Membership>> {
        self.list_memberships_impl(grouping_id).await
    }

    async fn get_student_grouping(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Grouping>> {
        self.get_student_grouping_impl(assignment_id, student_id)
            .await
    }

    // 提交模块
    async fn create_submission(
        &self,
        grouping_id: i64,
        revision_timestamp: chrono::DateTime<chrono::Utc>,
    ) -> Result<Submission> {
        self.create_submission_impl(grouping_id, revision_timestamp)
            .await
    }

    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(submission_id).await
    }

    async fn set_current_submission(
        &self,
        grouping_id: i64,
        submission_id: i64,
    ) -> Result<Grouping> {
        self.set_current_submission_impl(grouping_id, submission_id)
            .await
    }

    // 评分项与批改结果模块
    async fn create_criterion(
        &self,
        assignment_id: i64,
        req: CreateCriterionRequest,
    ) -> Result<Criterion> {
        self.create_criterion_impl(assignment_id, req).await
    }

    async fn list_criteria(&self, assignment_id: i64) -> Result<Vec<Criterion>> {
        self.list_criteria_impl(assignment_id).await
    }

    async fn create_result(
        &self,
        submission_id: i64,
        marking_state: MarkingState,
        released_to_students: bool,
    ) -> Result<SubmissionResult> {
        self.create_result_impl(submission_id, marking_state, released_to_students)
            .await
    }

    async fn update_result_state(
        &self,
        result_id: i64,
        marking_state: MarkingState,
        released_to_students: bool,
    ) -> Result<Option<SubmissionResult>> {
        self.update_result_state_impl(result_id, marking_state, released_to_students)
            .await
    }

    async fn set_mark(&self, result_id: i64, criterion_id: i64, mark: Option<f64>) -> Result<Mark> {
        self.set_mark_impl(result_id, criterion_id, mark).await
    }

    async fn add_extra_mark(
        &self,
        result_id: i64,
        extra_mark: f64,
        unit: ExtraMarkUnit,
    ) -> Result<ExtraMark> {
        self.add_extra_mark_impl(result_id, extra_mark, unit).await
    }

    async fn get_latest_result(&self, submission_id: i64) -> Result<Option<ResultDetail>> {
        self.get_latest_result_impl(submission_id).await
    }

    async fn get_latest_completed_result(
        &self,
        submission_id: i64,
    ) -> Result<Option<ResultDetail>> {
        self.get_latest_completed_result_impl(submission_id).await
    }

    // 宽限期扣除模块
    async fn record_grace_period_deductions(
        &self,
        submission_id: i64,
        membership_ids: &[i64],
        deduction: i32,
    ) -> Result<Vec<GracePeriodDeduction>> {
        self.record_grace_period_deductions_impl(submission_id, membership_ids, deduction)
            .await
    }

    async fn list_deductions_for_submission(
        &self,
        submission_id: i64,
    ) -> Result<Vec<GracePeriodDeduction>> {
        self.list_deductions_for_submission_impl(submission_id)
            .await
    }

    async fn sum_deductions_for_student(&self, student_id: i64) -> Result<i64> {
        self.sum_deductions_for_student_impl(student_id).await
    }

    // 统计模块
    async fn save_assignment_stats(&self, stats: AssignmentStats) -> Result<AssignmentStats> {
        self.save_assignment_stats_impl(stats).await
    }

    async fn get_assignment_stats(&self, assignment_id: i64) -> Result<Option<AssignmentStats>> {
        self.get_assignment_stats_impl(assignment_id).await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::SeaOrmStorage;
    use crate::config::DatabaseConfig;

    /// 单连接内存数据库，已执行迁移
    pub async fn memory_storage() -> SeaOrmStorage {
        let config = DatabaseConfig {
            url: ":memory:".to_string(),
            pool_size: 1,
            timeout: 5,
        };
        SeaOrmStorage::new_async(&config)
            .await
            .expect("in-memory storage should initialize")
    }
}
