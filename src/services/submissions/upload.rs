use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::errors::TrackerError;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, submissions::responses::SubmissionResponse};
use crate::services::files::receive_submission_form;

pub async fn handle_upload(
    service: &SubmissionService,
    request: &HttpRequest,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let claim = RequireJWT::current_claim(request)?;
    let config = service.get_config(request)?;
    let lifecycle = service.lifecycle(request)?;

    let uploaded = receive_submission_form(payload, &config.upload).await?;
    let Some(report) = uploaded.report else {
        return Err(TrackerError::invalid_input("Report file is required").into());
    };

    let draft = match uploaded.form.validate() {
        Ok(draft) => draft,
        Err(e) => {
            report.discard();
            return Err(e.into());
        }
    };

    // 记录写入失败时删除孤立文件
    match lifecycle.upload(&claim, draft, report.public_path()).await {
        Ok(submission) => {
            tracing::debug!(
                "Stored report {} ({} bytes) for submission {}",
                report.stored_name,
                report.size,
                submission.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                SubmissionResponse { submission },
                "Uploaded",
            )))
        }
        Err(e) => {
            report.discard();
            Err(e.into())
        }
    }
}
