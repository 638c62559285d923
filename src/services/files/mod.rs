pub mod serve;
pub mod upload;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use crate::config::AppConfig;
use crate::errors::Result;

pub use upload::{ReceivedReport, UploadedForm, receive_submission_form};

pub struct FileService;

impl FileService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub(crate) fn get_config(&self, request: &HttpRequest) -> Result<web::Data<AppConfig>> {
        super::config_from(request)
    }

    // 读取已上传的报告
    pub async fn handle_serve(
        &self,
        request: &HttpRequest,
        file_name: String,
    ) -> ActixResult<HttpResponse> {
        serve::handle_serve(self, request, file_name).await
    }
}
