use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 成员状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    Inviter,  // 发起人
    Accepted, // 已接受
    Pending,  // 待确认
    Rejected, // 已拒绝
}

impl MembershipStatus {
    /// 发起人和已接受的成员才计入小组
    pub fn is_accepted(&self) -> bool {
        matches!(self, MembershipStatus::Inviter | MembershipStatus::Accepted)
    }
}

impl std::fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MembershipStatus::Inviter => write!(f, "inviter"),
            MembershipStatus::Accepted => write!(f, "accepted"),
            MembershipStatus::Pending => write!(f, "pending"),
            MembershipStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for MembershipStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inviter" => Ok(MembershipStatus::Inviter),
            "accepted" => Ok(MembershipStatus::Accepted),
            "pending" => Ok(MembershipStatus::Pending),
            "rejected" => Ok(MembershipStatus::Rejected),
            _ => Err(format!("Invalid membership status: {s}")),
        }
    }
}

// 小组成员关系
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Membership {
    pub id: i64,
    pub grouping_id: i64,
    pub user_id: i64,
    pub status: MembershipStatus,
}

// 某个作业下的学生小组
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Grouping {
    pub id: i64,
    pub assignment_id: i64,
    pub group_name: String,
    // 用于正式评分的当前提交
    pub current_submission_id: Option<i64>,
    // 负责批改的助教
    pub grader_id: Option<i64>,
    pub admin_approved: bool,
    pub created_at: DateTime<Utc>,
}
