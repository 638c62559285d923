use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use once_cell::sync::OnceCell;

use crate::config::Argon2Config;
use crate::errors::{Result, TrackerError};

/// 哈希密码（argon2id）
pub fn hash_password(password: &str, config: &Argon2Config) -> Result<String> {
    let params = Params::new(
        config.memory_cost,
        config.time_cost,
        config.parallelism,
        None,
    )
    .map_err(|e| TrackerError::internal(format!("Argon2 参数错误: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| TrackerError::internal(format!("密码哈希失败: {e}")))?;
    Ok(hash.to_string())
}

/// 验证密码，参数从哈希串中读取
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed_hash) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok(),
        Err(_) => false,
    }
}

static DUMMY_HASH: OnceCell<String> = OnceCell::new();

/// 未知账户使用的占位哈希，与真实账户同样的参数
pub fn dummy_hash(config: &Argon2Config) -> Result<&'static str> {
    DUMMY_HASH
        .get_or_try_init(|| hash_password("tracker-placeholder-password", config))
        .map(String::as_str)
}

/// 在阻塞线程池中哈希
pub async fn hash_password_blocking(password: String, config: Argon2Config) -> Result<String> {
    actix_web::web::block(move || hash_password(&password, &config))
        .await
        .map_err(|e| TrackerError::internal(format!("密码哈希任务失败: {e}")))?
}

/// 在阻塞线程池中验证
pub async fn verify_password_blocking(password: String, hash: String) -> Result<bool> {
    actix_web::web::block(move || verify_password(&password, &hash))
        .await
        .map_err(|e| TrackerError::internal(format!("密码验证任务失败: {e}")))
}

/// 对占位哈希执行一次验证，结果丢弃
pub async fn verify_dummy_blocking(password: String, config: Argon2Config) -> Result<()> {
    actix_web::web::block(move || {
        dummy_hash(&config).map(|hash| {
            verify_password(&password, hash);
        })
    })
    .await
    .map_err(|e| TrackerError::internal(format!("密码验证任务失败: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> Argon2Config {
        Argon2Config {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
        }
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("SecurePass123", &cheap()).unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("SecurePass123", &hash));
        assert!(!verify_password("WrongPass123", &hash));
    }

    #[test]
    fn test_verify_garbage_hash() {
        assert!(!verify_password("SecurePass123", "not-a-hash"));
    }

    #[actix_web::test]
    async fn test_dummy_hash_is_real_argon2() {
        let hash = dummy_hash(&cheap()).unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(PasswordHash::new(hash).is_ok());
        assert!(!verify_password("SecurePass123", hash));
        assert!(verify_dummy_blocking("SecurePass123".to_string(), cheap()).await.is_ok());
    }
}
