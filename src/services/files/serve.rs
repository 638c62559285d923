use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header, web};
use std::path::Path;

use crate::errors::TrackerError;
use crate::utils::is_safe_file_name;

use super::FileService;

pub async fn handle_serve(
    service: &FileService,
    request: &HttpRequest,
    file_name: String,
) -> ActixResult<HttpResponse> {
    let config = service.get_config(request)?;

    // 拒绝路径穿越
    if !is_safe_file_name(&file_name) {
        return Err(TrackerError::not_found("File not found").into());
    }

    let path = Path::new(&config.upload.dir).join(&file_name);
    let read = web::block(move || std::fs::read(path))
        .await
        .map_err(|e| TrackerError::internal(format!("File read task failed: {e}")))?;
    let bytes = match read {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(TrackerError::not_found("File not found").into());
        }
        Err(e) => return Err(TrackerError::from(e).into()),
    };

    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{file_name}\""),
        ))
        .body(bytes))
}
