use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};

use super::AppConfig;

impl AppConfig {
    /// 加载配置
    ///
    /// 默认值 -> config.toml -> config.{APP_ENV}.toml -> TRACKER_* 环境变量 -> 常用环境变量
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Self::defaults()?
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
                Environment::with_prefix("TRACKER")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            );

        // 支持从环境变量加载
        builder = builder
            .set_override_option("app.environment", std::env::var("APP_ENV").ok())?
            .set_override_option("app.log_level", std::env::var("RUST_LOG").ok())?
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("server.workers", std::env::var("CPU_COUNT").ok())?
            .set_override_option("jwt.secret", std::env::var("JWT_SECRET").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("upload.dir", std::env::var("UPLOAD_DIR").ok())?
            .set_override_option(
                "seed.admin_password",
                std::env::var("ADMIN_PASSWORD").ok(),
            )?;

        if let Ok(origin) = std::env::var("FRONTEND_URL") {
            builder = builder.set_override("cors.allowed_origins", vec![origin])?;
        }

        Self::finish(builder.build()?)
    }

    /// 仅使用内置默认值（测试与无配置文件时的基线）
    pub fn from_defaults() -> Result<Self, ConfigError> {
        Self::finish(Self::defaults()?.build()?)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("app.system_name", "Report Tracker")?
            .set_default("app.environment", "development")?
            .set_default("app.log_level", "info")?
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("server.workers", 0)?
            .set_default("server.max_workers", 8)?
            .set_default("server.timeouts.client_request", 5000)?
            .set_default("server.timeouts.client_disconnect", 1000)?
            .set_default("server.timeouts.keep_alive", 30)?
            .set_default("server.limits.max_payload_size", 11 * 1024 * 1024)?
            .set_default("server.limits.max_json_size", 64 * 1024)?
            .set_default("jwt.secret", "")?
            .set_default("jwt.access_token_expiry", 24 * 60)?
            .set_default("database.url", "sqlite://tracker.db?mode=rwc")?
            .set_default("database.pool_size", 10)?
            .set_default("database.timeout", 30)?
            .set_default(
                "cors.allowed_origins",
                vec!["http://localhost:5173".to_string()],
            )?
            .set_default("cors.max_age", 3600)?
            .set_default("upload.dir", "uploads")?
            .set_default("upload.max_size", 10 * 1024 * 1024)?
            .set_default("argon2.memory_cost", 19 * 1024)?
            .set_default("argon2.time_cost", 2)?
            .set_default("argon2.parallelism", 1)?
            .set_default("rate_limit.enabled", true)?
            .set_default("rate_limit.window_secs", 15 * 60)?
            .set_default("rate_limit.auth_max_requests", 5)?
            .set_default("rate_limit.api_max_requests", 100)?
            .set_default("seed.admin_name", "Administrator")?
            .set_default("seed.admin_email", "admin@example.com")?
            .set_default("seed.admin_password", "")
    }

    fn finish(config: Config) -> Result<Self, ConfigError> {
        let mut app_config: AppConfig = config.try_deserialize()?;

        // 处理工作线程数
        if app_config.server.workers == 0 {
            app_config.server.workers = num_cpus::get().min(app_config.server.max_workers);
        }

        if app_config.jwt.access_token_expiry <= 0 {
            return Err(ConfigError::Message(
                "jwt.access_token_expiry must be positive".to_string(),
            ));
        }

        Ok(app_config)
    }

    /// 检查是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    /// 检查是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    /// 获取服务器绑定地址
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_complete() {
        let config = AppConfig::from_defaults().expect("defaults should deserialize");
        assert_eq!(config.jwt.access_token_expiry, 1440);
        assert_eq!(config.upload.max_size, 10 * 1024 * 1024);
        assert_eq!(config.rate_limit.auth_max_requests, 5);
        assert_eq!(config.rate_limit.api_max_requests, 100);
        assert!(config.server.workers >= 1);
        assert!(config.is_development());
        assert!(!config.is_production());
    }

    #[test]
    fn test_bind_address() {
        let config = AppConfig::from_defaults().unwrap();
        assert_eq!(config.server_bind_address(), "127.0.0.1:5000");
    }
}
