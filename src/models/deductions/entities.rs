use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 宽限期扣除记录，每个 (成员, 提交) 只生成一次
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GracePeriodDeduction {
    pub id: i64,
    pub membership_id: i64,
    pub submission_id: i64,
    pub deduction: i32,
    pub created_at: DateTime<Utc>,
}
