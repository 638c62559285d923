use crate::config::AppConfig;
use crate::errors::{Result, TrackerError};
use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateUserRequest;
use crate::storage::Storage;
use crate::utils::password::hash_password_blocking;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
}

/// 生成随机字符串（密码 / 开发环境临时密钥）
fn generate_random_string(length: usize) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// 生产环境必须显式配置 JWT 密钥；其他环境缺省时生成临时密钥
fn ensure_jwt_secret(config: &mut AppConfig) -> Result<()> {
    if !config.jwt.secret.trim().is_empty() {
        return Ok(());
    }
    if config.is_production() {
        return Err(TrackerError::internal(
            "JWT_SECRET must be set in production",
        ));
    }
    warn!("JWT_SECRET not set, using an ephemeral secret (tokens expire on restart)");
    config.jwt.secret = generate_random_string(48);
    Ok(())
}

/// 确保上传目录存在
fn ensure_upload_dir(config: &AppConfig) -> Result<()> {
    std::fs::create_dir_all(&config.upload.dir).map_err(|e| {
        TrackerError::file_operation(format!(
            "Failed to create upload directory {}: {e}",
            config.upload.dir
        ))
    })
}

/// 初始化默认管理员账号
/// 如果数据库中没有任何用户，则创建一个管理员
async fn seed_admin(storage: &Arc<dyn Storage>, config: &AppConfig) {
    // 检查是否已有用户
    match storage.count_users().await {
        Ok(count) if count > 0 => {
            debug!(
                "Database already has {} user(s), skipping admin seed",
                count
            );
            return;
        }
        Ok(_) => {
            info!("No users found in database, creating default admin account...");
        }
        Err(e) => {
            warn!("Failed to count users: {}, skipping admin seed", e);
            return;
        }
    }

    // 获取密码：优先从配置 / 环境变量，否则生成随机密码
    let password = if config.seed.admin_password.is_empty() {
        let pwd = generate_random_string(16);
        warn!("==========================================================");
        warn!("  ADMIN PASSWORD NOT SET - USING GENERATED PASSWORD");
        warn!("  Generated admin password: {}", pwd);
        warn!("  Please save this password or set ADMIN_PASSWORD env var");
        warn!("==========================================================");
        pwd
    } else {
        config.seed.admin_password.clone()
    };

    let password_hash = match hash_password_blocking(password, config.argon2.clone()).await {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash admin password: {}, skipping admin seed", e);
            return;
        }
    };

    let admin_request = CreateUserRequest {
        name: config.seed.admin_name.clone(),
        email: config.seed.admin_email.trim().to_lowercase(),
        password_hash,
        role: UserRole::Admin,
        dept: String::new(),
        year: String::new(),
    };

    match storage.create_user(admin_request).await {
        Ok(user) => {
            info!(
                "Default admin account created successfully (ID: {}, email: {})",
                user.id, user.email
            );
        }
        Err(e) => {
            warn!("Failed to create admin account: {}", e);
        }
    }
}

/// 准备服务器启动的上下文
/// 包括密钥检查、上传目录、存储与初始管理员
pub async fn prepare_server_startup(config: &mut AppConfig) -> Result<StartupContext> {
    ensure_jwt_secret(config)?;
    ensure_upload_dir(config)?;

    let storage = crate::storage::create_storage(&config.database).await?;
    warn!("Storage backend initialized and migrations completed");

    // 初始化默认管理员账号（如果需要）
    seed_admin(&storage, config).await;

    Ok(StartupContext { storage })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SeaOrmStorage;

    #[test]
    fn test_production_requires_secret() {
        let mut config = AppConfig::from_defaults().unwrap();
        config.app.environment = "production".to_string();
        assert!(ensure_jwt_secret(&mut config).is_err());

        config.app.environment = "development".to_string();
        ensure_jwt_secret(&mut config).unwrap();
        assert_eq!(config.jwt.secret.len(), 48);
    }

    #[tokio::test]
    async fn test_seed_admin_only_on_empty_database() {
        let mut config = AppConfig::from_defaults().unwrap();
        config.seed.admin_password = "AdminPass123".to_string();
        config.argon2.memory_cost = 1024;
        config.argon2.time_cost = 1;
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await.unwrap());

        seed_admin(&storage, &config).await;
        seed_admin(&storage, &config).await;

        assert_eq!(storage.count_users().await.unwrap(), 1);
        let admin = storage
            .get_user_by_email("admin@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.role, UserRole::Admin);
    }
}
