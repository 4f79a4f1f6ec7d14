use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 作业成绩统计，平均分与中位数为满分的百分比
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssignmentStats {
    pub assignment_id: i64,
    pub results_average: f64,
    pub results_median: f64,
    pub results_fails: i64,
    pub results_zeros: i64,
    pub updated_at: DateTime<Utc>,
}
