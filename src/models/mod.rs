//! 业务数据模型
//!
//! 与 `entity` 中的数据库实体分离，服务层只使用这里的类型。

pub mod assignments;
pub mod criteria;
pub mod deductions;
pub mod groupings;
pub mod reports;
pub mod results;
pub mod stats;
pub mod students;
pub mod submission_rules;
pub mod submissions;
