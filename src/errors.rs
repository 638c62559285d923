//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码、类型名称和 HTTP 状态码。
//! 所有错误都实现了 `ResponseError`，统一渲染为 `{success:false, message}` 信封。

use std::fmt;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};

use crate::models::{ApiResponse, FieldError};

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义（另含固定的 `Validation` 变体，携带字段级错误）
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - status() 方法 - 返回 HTTP 状态码
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_tracker_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal, $status:ident)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum TrackerError {
            $($variant(String),)*
            Validation(Vec<FieldError>),
        }

        impl TrackerError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(TrackerError::$variant(_) => $code,)*
                    TrackerError::Validation(_) => "E006",
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(TrackerError::$variant(_) => $type_name,)*
                    TrackerError::Validation(_) => "Validation Error",
                }
            }

            /// 获取 HTTP 状态码
            pub fn status(&self) -> StatusCode {
                match self {
                    $(TrackerError::$variant(_) => StatusCode::$status,)*
                    TrackerError::Validation(_) => StatusCode::BAD_REQUEST,
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> String {
                match self {
                    $(TrackerError::$variant(msg) => msg.clone(),)*
                    TrackerError::Validation(fields) => fields
                        .iter()
                        .map(|f| f.message.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl TrackerError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        TrackerError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_tracker_errors! {
    Unauthenticated("E001", "Unauthenticated", UNAUTHORIZED),
    Forbidden("E002", "Forbidden", FORBIDDEN),
    NotFound("E003", "Resource Not Found", NOT_FOUND),
    Conflict("E004", "Conflict", CONFLICT),
    InvalidInput("E005", "Invalid Input", BAD_REQUEST),
    RateLimited("E007", "Rate Limit Exceeded", TOO_MANY_REQUESTS),
    DatabaseConfig("E101", "Database Configuration Error", INTERNAL_SERVER_ERROR),
    DatabaseConnection("E102", "Database Connection Error", INTERNAL_SERVER_ERROR),
    DatabaseOperation("E103", "Database Operation Error", INTERNAL_SERVER_ERROR),
    FileOperation("E104", "File Operation Error", INTERNAL_SERVER_ERROR),
    Serialization("E105", "Serialization Error", INTERNAL_SERVER_ERROR),
    Token("E106", "Token Error", INTERNAL_SERVER_ERROR),
    Internal("E199", "Internal Error", INTERNAL_SERVER_ERROR),
}

impl TrackerError {
    /// 字段级校验错误
    pub fn validation(fields: Vec<FieldError>) -> Self {
        TrackerError::Validation(fields)
    }

    /// 是否为服务端内部错误（详情不对外暴露）
    pub fn is_internal(&self) -> bool {
        self.status().is_server_error()
    }

    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for TrackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for TrackerError {}

impl ResponseError for TrackerError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        if self.is_internal() {
            tracing::error!("{}", self.format_simple());
            return HttpResponse::build(self.status()).json(ApiResponse::<()>::failure(
                self.code(),
                "Internal server error",
                None,
            ));
        }

        let fields = match self {
            TrackerError::Validation(fields) => Some(fields.clone()),
            _ => None,
        };

        HttpResponse::build(self.status()).json(ApiResponse::<()>::failure(
            self.code(),
            self.message(),
            fields,
        ))
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for TrackerError {
    fn from(err: sea_orm::DbErr) -> Self {
        TrackerError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for TrackerError {
    fn from(err: std::io::Error) -> Self {
        TrackerError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        TrackerError::Serialization(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for TrackerError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        TrackerError::Token(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
