use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateStudentRequest {
    pub username: String,
    pub section_id: Option<i64>,
    // 缺省时使用配置中的默认额度
    pub grace_credits: Option<i32>,
    #[serde(default)]
    pub hidden: bool,
}
