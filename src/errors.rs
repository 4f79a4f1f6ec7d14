//! 评分错误
//!
//! 错误代码与退出码由宏统一生成，存储层与服务层都返回 `GradingError`。

use std::fmt;

/// 定义评分错误的宏
///
/// 每个变体携带错误代码、类型名称与 grading-worker 的退出码（sysexits 约定），
/// 生成 code() / error_type() / exit_code() / message() 与 snake_case 构造函数。
macro_rules! define_grading_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal, exit = $exit:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum GradingError {
            $($variant(String),)*
        }

        impl GradingError {
            pub fn code(&self) -> &'static str {
                match self {
                    $(GradingError::$variant(_) => $code,)*
                }
            }

            pub fn error_type(&self) -> &'static str {
                match self {
                    $(GradingError::$variant(_) => $type_name,)*
                }
            }

            /// 进程退出码
            pub fn exit_code(&self) -> i32 {
                match self {
                    $(GradingError::$variant(_) => $exit,)*
                }
            }

            pub fn message(&self) -> &str {
                match self {
                    $(GradingError::$variant(msg) => msg,)*
                }
            }
        }

        paste::paste! {
            impl GradingError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        GradingError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_grading_errors! {
    DatabaseConfig("E001", "Database Configuration Error", exit = 78),
    DatabaseConnection("E002", "Database Connection Error", exit = 69),
    DatabaseOperation("E003", "Database Operation Error", exit = 74),
    Validation("E004", "Validation Error", exit = 65),
    NotFound("E005", "Resource Not Found", exit = 65),
    Serialization("E006", "Serialization Error", exit = 70),
    DateParse("E007", "Date Parse Error", exit = 65),
    Configuration("E008", "Configuration Error", exit = 78),
    ContractViolation("E009", "Rule Contract Violation", exit = 70),
}

impl GradingError {
    /// 输入数据有误（校验失败、对象不存在、日期无法解析）
    pub fn is_input_error(&self) -> bool {
        self.exit_code() == 65
    }

    /// 附加上下文，错误类型不变
    pub fn context(self, context: impl std::fmt::Display) -> Self {
        let message = format!("{context}: {}", self.message());
        match self {
            GradingError::DatabaseConfig(_) => GradingError::DatabaseConfig(message),
            GradingError::DatabaseConnection(_) => GradingError::DatabaseConnection(message),
            GradingError::DatabaseOperation(_) => GradingError::DatabaseOperation(message),
            GradingError::Validation(_) => GradingError::Validation(message),
            GradingError::NotFound(_) => GradingError::NotFound(message),
            GradingError::Serialization(_) => GradingError::Serialization(message),
            GradingError::DateParse(_) => GradingError::DateParse(message),
            GradingError::Configuration(_) => GradingError::Configuration(message),
            GradingError::ContractViolation(_) => GradingError::ContractViolation(message),
        }
    }
}

impl fmt::Display for GradingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code(), self.error_type(), self.message())
    }
}

impl std::error::Error for GradingError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for GradingError {
    fn from(err: sea_orm::DbErr) -> Self {
        GradingError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for GradingError {
    fn from(err: serde_json::Error) -> Self {
        GradingError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for GradingError {
    fn from(err: chrono::ParseError) -> Self {
        GradingError::DateParse(err.to_string())
    }
}

impl From<config::ConfigError> for GradingError {
    fn from(err: config::ConfigError) -> Self {
        GradingError::Configuration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GradingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(GradingError::database_config("test").code(), "E001");
        assert_eq!(GradingError::validation("test").code(), "E004");
        assert_eq!(GradingError::not_found("test").code(), "E005");
        assert_eq!(GradingError::contract_violation("test").code(), "E009");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            GradingError::contract_violation("test").error_type(),
            "Rule Contract Violation"
        );
        assert_eq!(
            GradingError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = GradingError::validation("group_max must not be below group_min");
        assert_eq!(err.message(), "group_max must not be below group_min");
    }

    #[test]
    fn test_display() {
        let err = GradingError::not_found("assignment A1");
        assert_eq!(err.to_string(), "[E005] Resource Not Found: assignment A1");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(GradingError::validation("x").exit_code(), 65);
        assert!(GradingError::not_found("x").is_input_error());
        assert_eq!(GradingError::contract_violation("x").exit_code(), 70);
        assert_eq!(GradingError::database_connection("x").exit_code(), 69);
        assert!(!GradingError::configuration("x").is_input_error());
    }

    #[test]
    fn test_context_keeps_variant() {
        let err = GradingError::validation("mark too high").context("A4");
        assert_eq!(err.code(), "E004");
        assert_eq!(err.message(), "A4: mark too high");
    }

    #[test]
    fn test_db_error_conversion() {
        let err: GradingError = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert_eq!(err.code(), "E003");
        assert!(err.message().contains("boom"));
    }
}
