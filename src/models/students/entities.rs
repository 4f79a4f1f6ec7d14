use serde::{Deserialize, Serialize};

// 学生
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Student {
    pub id: i64,
    pub username: String,
    // 所属教学班
    pub section_id: Option<i64>,
    // 学期内可用的宽限额度总数
    pub grace_credits: i32,
    pub hidden: bool,
}
