use actix_web::{HttpRequest, error};

use crate::errors::TrackerError;

/// JSON 请求体解析失败 -> InvalidInput
pub fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> error::Error {
    tracing::debug!("JSON payload rejected: {}", err);
    let message = match &err {
        error::JsonPayloadError::ContentType => "Content-Type must be application/json".to_string(),
        error::JsonPayloadError::Overflow { .. } | error::JsonPayloadError::OverflowKnownLength { .. } => {
            "Request body too large".to_string()
        }
        _ => format!("Invalid JSON body: {err}"),
    };
    TrackerError::invalid_input(message).into()
}

/// 查询参数解析失败 -> InvalidInput
pub fn query_error_handler(err: error::QueryPayloadError, _req: &HttpRequest) -> error::Error {
    tracing::debug!("Query string rejected: {}", err);
    TrackerError::invalid_input(format!("Invalid query parameters: {err}")).into()
}

/// 路径参数解析失败 -> InvalidInput
pub fn path_error_handler(err: error::PathError, _req: &HttpRequest) -> error::Error {
    tracing::debug!("Path parameter rejected: {}", err);
    TrackerError::invalid_input(format!("Invalid path parameter: {err}")).into()
}
