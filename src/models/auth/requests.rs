use serde::Deserialize;
use ts_rs::TS;

use crate::errors::Result;
use crate::models::users::entities::UserRole;
use crate::utils::validate::{FieldErrors, validate_email, validate_length, validate_password};

// 注册请求（字段缺失时按空串处理，交由校验统一报错）
#[derive(Debug, Default, Deserialize, TS)]
#[serde(default)]
#[ts(export, export_to = "auth.ts")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<String>,
    pub dept: Option<String>,
    pub year: Option<String>,
}

/// 校验通过的注册信息
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub dept: String,
    pub year: String,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<Registration> {
        let name = self.name.trim().to_string();
        let email = self.email.trim().to_lowercase();
        let dept = self.dept.unwrap_or_default().trim().to_string();
        let year = self.year.unwrap_or_default().trim().to_string();

        let mut errors = FieldErrors::new();
        errors.check(
            "name",
            validate_length(&name, 2, 50, "Name must be 2-50 characters"),
        );
        errors.check("email", validate_email(&email));
        errors.check("password", validate_password(&self.password));

        let role = match self.role.as_deref().map(str::trim) {
            None | Some("") => UserRole::Student,
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                errors.push("role", "Role must be student, faculty, or admin");
                UserRole::Student
            }),
        };

        errors.check(
            "dept",
            validate_length(&dept, 0, 50, "Department must be at most 50 characters"),
        );
        errors.check(
            "year",
            validate_length(&year, 0, 20, "Year must be at most 20 characters"),
        );
        errors.into_result()?;

        Ok(Registration {
            name,
            email,
            password: self.password,
            role,
            dept,
            year,
        })
    }
}

// 用户登录请求（来自HTTP请求）
#[derive(Debug, Default, Deserialize, TS)]
#[serde(default)]
#[ts(export, export_to = "auth.ts")]
pub struct LoginRequest {
    /// 邮箱（不区分大小写）
    pub email: String,
    /// 密码
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.check("email", validate_email(self.email.trim()));
        if self.password.is_empty() {
            errors.push("password", "Password is required");
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TrackerError;

    fn request() -> RegisterRequest {
        RegisterRequest {
            name: "Alice".into(),
            email: " Alice@Uni.EDU ".into(),
            password: "SecurePass123".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_to_student_and_lowercases_email() {
        let reg = request().validate().unwrap();
        assert_eq!(reg.role, UserRole::Student);
        assert_eq!(reg.email, "alice@uni.edu");
        assert_eq!(reg.dept, "");
    }

    #[test]
    fn test_explicit_role() {
        let reg = RegisterRequest {
            role: Some("faculty".into()),
            ..request()
        }
        .validate()
        .unwrap();
        assert_eq!(reg.role, UserRole::Faculty);
    }

    #[test]
    fn test_errors_are_collected_per_field() {
        let err = RegisterRequest {
            name: "A".into(),
            email: "nope".into(),
            password: "short".into(),
            role: Some("root".into()),
            dept: None,
            year: Some("x".repeat(21)),
        }
        .validate()
        .unwrap_err();
        match err {
            TrackerError::Validation(fields) => {
                let names: Vec<_> = fields.iter().map(|f| f.field.as_str()).collect();
                assert_eq!(names, ["name", "email", "password", "role", "year"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_fields_deserialize() {
        let req: RegisterRequest = serde_json::from_str("{}").unwrap();
        assert!(req.validate().is_err());
    }
}
