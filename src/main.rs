use dotenv::dotenv;
use human_panic::setup_panic;
use serde_json::json;
use tracing::{debug, error, warn};

// 从 lib.rs 导入模块
use rust_grading_rules::config::AppConfig;
use rust_grading_rules::errors::{GradingError, Result};
use rust_grading_rules::runtime::lifetime::startup::{StartupContext, prepare_startup};

/// 重新计算一个作业的统计并输出 JSON
async fn process_assignment(
    context: &StartupContext,
    short_identifier: &str,
) -> Result<serde_json::Value> {
    let assignment = context
        .storage
        .get_assignment_by_short_identifier(short_identifier)
        .await?
        .ok_or_else(|| GradingError::not_found(format!("Assignment {short_identifier} not found")))?;

    let collection_time = context
        .submission_rules
        .calculate_collection_time(assignment.id)
        .await?;
    let past_collection_date = context
        .due_dates
        .past_collection_date(assignment.id)
        .await?;
    let sections_past_due = context
        .due_dates
        .section_names_past_due_date(assignment.id)
        .await?;
    let rule = context.submission_rules.describe_rule(assignment.id).await?;

    let total_mark = context.grades.total_mark(assignment.id).await?;
    let stats = context.grades.update_results_stats(assignment.id).await?;
    let distribution = context.grades.grade_distribution(assignment.id).await?;
    let report: Vec<Vec<String>> = context
        .grades
        .student_report_rows(assignment.id)
        .await?
        .iter()
        .map(|row| row.to_record())
        .collect();

    Ok(json!({
        "assignment": assignment.short_identifier,
        "due_date": assignment.due_date,
        "submission_rule": rule,
        "collection_time": collection_time,
        "past_collection_date": past_collection_date,
        "sections_past_due_date": sections_past_due,
        "total_mark": total_mark,
        "stats": stats,
        "distribution": distribution,
        "report": report,
    }))
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    // 记录程序启动时间
    let start_datetime = chrono::Utc::now();

    // 初始化配置
    setup_panic!();
    AppConfig::init().expect("Failed to initialize configuration");
    let config = AppConfig::get();

    // 初始化日志
    let stdout_log = std::io::stdout();
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(stdout_log);
    let filter = tracing_subscriber::EnvFilter::new(&config.app.log_level);
    let tracing_format = tracing_subscriber::fmt::format()
        .with_level(true)
        .with_ansi(true);

    let tracing_builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking_writer)
        .event_format(tracing_format);

    if config.is_development() {
        tracing_builder
            .with_file(true)
            .with_line_number(true)
            .init();
    } else {
        tracing_builder.json().init();
    }

    warn!(
        "Starting {}...
        Project: {}
        Version: {}
        Authors: {}",
        config.app.system_name,
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_AUTHORS")
    );

    let short_identifiers: Vec<String> = std::env::args().skip(1).collect();
    if short_identifiers.is_empty() {
        warn!("No assignment short identifiers given, nothing to do");
        return;
    }

    let context = match prepare_startup().await {
        Ok(context) => context,
        Err(e) => {
            error!("{}", e);
            drop(guard);
            std::process::exit(e.exit_code());
        }
    };

    debug!(
        "Startup completed in {} ms",
        chrono::Utc::now()
            .signed_duration_since(start_datetime)
            .num_milliseconds()
    );

    // 多个作业失败时取最大的退出码
    let mut exit_code = 0;
    for short_identifier in &short_identifiers {
        match process_assignment(&context, short_identifier)
            .await
            .map_err(|e| e.context(short_identifier))
        {
            Ok(output) => println!("{output}"),
            Err(e) => {
                if e.is_input_error() {
                    warn!("{}", e);
                } else {
                    error!("{}", e);
                }
                exit_code = exit_code.max(e.exit_code());
            }
        }
    }

    // 退出前刷新日志
    drop(guard);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}
