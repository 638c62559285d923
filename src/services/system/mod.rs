pub mod health;

use actix_web::{HttpResponse, Result as ActixResult};

pub struct SystemService;

impl SystemService {
    pub fn new_lazy() -> Self {
        Self
    }

    // 存活探测
    pub async fn health(&self) -> ActixResult<HttpResponse> {
        health::handle_health().await
    }
}
