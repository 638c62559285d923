use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{Result, TrackerError};
use crate::models::FieldError;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

/// 字段错误收集器，按字段聚合后一次性返回
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// 检查结果为 Err 时记录
    pub fn check(&mut self, field: &str, result: std::result::Result<(), &'static str>) {
        if let Err(message) = result {
            self.push(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(TrackerError::validation(self.errors))
        }
    }
}

/// 按字符数校验长度（闭区间）
pub fn validate_length(
    value: &str,
    min: usize,
    max: usize,
    message: &'static str,
) -> std::result::Result<(), &'static str> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(message);
    }
    Ok(())
}

pub fn validate_email(email: &str) -> std::result::Result<(), &'static str> {
    if email.is_empty() {
        return Err("Email is required");
    }
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 验证密码是否符合安全策略
///
/// 策略要求：
/// - 最小长度：8 字符
/// - 必须包含：大写字母 + 小写字母 + 数字
pub fn validate_password(password: &str) -> std::result::Result<(), &'static str> {
    if password.chars().count() < 8 {
        return Err("Password must be at least 8 characters long");
    }
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !(has_upper && has_lower && has_digit) {
        return Err("Password must contain uppercase, lowercase, and number");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_password() {
        assert!(validate_password("SecurePass123").is_ok());
        assert!(validate_password("MyP@ssw0rd").is_ok());
    }

    #[test]
    fn test_short_password() {
        assert_eq!(
            validate_password("Ab1"),
            Err("Password must be at least 8 characters long")
        );
    }

    #[test]
    fn test_password_classes() {
        let msg = Err("Password must contain uppercase, lowercase, and number");
        assert_eq!(validate_password("abcd1234"), msg);
        assert_eq!(validate_password("ABCD1234"), msg);
        assert_eq!(validate_password("AbcdEfgh"), msg);
    }

    #[test]
    fn test_email() {
        assert!(validate_email("alice@uni.edu").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert_eq!(validate_email(""), Err("Email is required"));
    }

    #[test]
    fn test_length_counts_chars() {
        assert!(validate_length("李雷", 2, 50, "bad").is_ok());
        assert!(validate_length("a", 2, 50, "bad").is_err());
    }

    #[test]
    fn test_field_errors_aggregate() {
        let mut errors = FieldErrors::new();
        errors.check("name", validate_length("a", 2, 50, "Name must be 2-50 characters"));
        errors.check("email", validate_email("x"));
        errors.check("password", validate_password("Password1"));
        match errors.into_result() {
            Err(TrackerError::Validation(fields)) => {
                assert_eq!(fields.len(), 2);
                assert_eq!(fields[0].field, "name");
                assert_eq!(fields[1].field, "email");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
