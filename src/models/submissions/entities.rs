use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 提交版本
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Submission {
    pub id: i64,
    pub grouping_id: i64,
    pub revision_number: i32,
    // 版本提交时间，迟交判断以此为准
    pub revision_timestamp: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
