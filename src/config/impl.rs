use config::{Config, ConfigError, Environment, File};
use std::sync::OnceLock;

use super::AppConfig;
use crate::services::GradingSettings;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

impl AppConfig {
    /// 加载配置
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            // 内置默认值，配置文件可缺省
            .set_default("app.system_name", "Grading Rules")?
            .set_default("app.environment", "development")?
            .set_default("app.log_level", "info")?
            .set_default("database.url", "grading.db")?
            .set_default("database.pool_size", 5)?
            .set_default("database.timeout", 30)?
            .set_default("grading.distribution_intervals", 20)?
            .set_default("grading.default_grace_credits", 0)?
            // 首先加载默认配置文件
            .add_source(File::with_name("config").required(false))
            // 然后根据环境加载特定配置文件
            .add_source(
                File::with_name(&format!(
                    "config.{}",
                    std::env::var("APP_ENV").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // 最后加载环境变量覆盖
            .add_source(
                Environment::with_prefix("GRADING")
                    .separator("__")
                    .try_parsing(true),
            );

        // 支持从环境变量加载
        builder = builder
            .set_override_option("app.environment", std::env::var("APP_ENV").ok())?
            .set_override_option("app.log_level", std::env::var("RUST_LOG").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?;

        let config = builder.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        if app_config.grading.distribution_intervals == 0
            || app_config.grading.distribution_intervals > 100
        {
            return Err(ConfigError::Message(format!(
                "grading.distribution_intervals must be within 1..=100, got {}",
                app_config.grading.distribution_intervals
            )));
        }

        Ok(app_config)
    }

    /// 获取全局配置实例
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// 初始化配置 (在应用启动时调用)
    pub fn init() -> Result<(), ConfigError> {
        let config = Self::load()?;
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))?;
        Ok(())
    }

    /// 检查是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    /// 检查是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    /// 提取传给评分服务的配置
    pub fn grading_settings(&self) -> GradingSettings {
        GradingSettings {
            distribution_intervals: self.grading.distribution_intervals,
            default_grace_credits: self.grading.default_grace_credits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_defaults() {
        let config = AppConfig::load().expect("defaults should load");
        assert_eq!(config.grading.distribution_intervals, 20);
        assert!(config.database.pool_size > 0);
    }

    #[test]
    fn test_grading_settings_copied() {
        let config = AppConfig::load().expect("defaults should load");
        let settings = config.grading_settings();
        assert_eq!(
            settings.distribution_intervals,
            config.grading.distribution_intervals
        );
        assert_eq!(
            settings.default_grace_credits,
            config.grading.default_grace_credits
        );
    }
}
