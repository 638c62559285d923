use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::JwtConfig;

pub const ACCESS_TOKEN_TYPE: &str = "access";

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // Subject (user ID)
    pub role: String,       // 用户角色
    pub name: String,       // 显示名
    pub token_type: String, // token类型
    pub exp: usize,         // Expiration time (时间戳)
    pub iat: usize,         // Issued at (签发时间)
}

/// 签发与校验访问令牌（HS256）
pub struct JwtUtils<'a> {
    config: &'a JwtConfig,
}

impl<'a> JwtUtils<'a> {
    pub fn new(config: &'a JwtConfig) -> Self {
        Self { config }
    }

    /// 令牌有效期（秒）
    pub fn expires_in(&self) -> i64 {
        self.config.access_token_expiry * 60
    }

    // 生成 Access Token
    pub fn generate_access_token(
        &self,
        user_id: i64,
        role: &str,
        name: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        self.generate_token_with_expiry(
            user_id,
            role,
            name,
            ACCESS_TOKEN_TYPE,
            chrono::Duration::minutes(self.config.access_token_expiry),
        )
    }

    // 生成带自定义过期时间的 Token
    pub fn generate_token_with_expiry(
        &self,
        user_id: i64,
        role: &str,
        name: &str,
        token_type: &str,
        expiry_duration: chrono::Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let expiration = now + expiry_duration;

        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            name: name.to_string(),
            token_type: token_type.to_string(),
            exp: expiration.timestamp().max(0) as usize,
            iat: now.timestamp() as usize,
        };

        let encoding_key = EncodingKey::from_secret(self.config.secret.as_bytes());
        encode(&Header::default(), &claims, &encoding_key)
    }

    // 验证 JWT token（签名 + 过期）
    pub fn verify_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let decoding_key = DecodingKey::from_secret(self.config.secret.as_bytes());
        let validation = Validation::default();

        decode::<Claims>(token, &decoding_key, &validation).map(|token_data| token_data.claims)
    }

    // 验证 Access Token
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let claims = self.verify_token(token)?;
        if claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidToken,
            ));
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            access_token_expiry: 60,
        }
    }

    #[test]
    fn test_round_trip_claims() {
        let cfg = config("unit-test-secret");
        let jwt = JwtUtils::new(&cfg);
        let token = jwt.generate_access_token(42, "faculty", "Dr. Lee").unwrap();
        let claims = jwt.verify_access_token(&token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.role, "faculty");
        assert_eq!(claims.name, "Dr. Lee");
        assert_eq!(jwt.expires_in(), 3600);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let signer = config("secret-a");
        let verifier = config("secret-b");
        let token = JwtUtils::new(&signer)
            .generate_access_token(1, "student", "A")
            .unwrap();
        assert!(JwtUtils::new(&verifier).verify_access_token(&token).is_err());
    }

    #[test]
    fn test_expired_rejected() {
        let cfg = config("unit-test-secret");
        let jwt = JwtUtils::new(&cfg);
        let token = jwt
            .generate_token_with_expiry(
                1,
                "student",
                "A",
                ACCESS_TOKEN_TYPE,
                chrono::Duration::minutes(-10),
            )
            .unwrap();
        assert!(jwt.verify_access_token(&token).is_err());
    }

    #[test]
    fn test_token_type_checked() {
        let cfg = config("unit-test-secret");
        let jwt = JwtUtils::new(&cfg);
        let token = jwt
            .generate_token_with_expiry(
                1,
                "student",
                "A",
                "refresh",
                chrono::Duration::minutes(10),
            )
            .unwrap();
        assert!(jwt.verify_token(&token).is_ok());
        assert!(jwt.verify_access_token(&token).is_err());
    }
}
