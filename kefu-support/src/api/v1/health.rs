use actix_web::http::StatusCode;
use actix_web::{web, Responder};
use kefu::http::respond_any;

use crate::service::SupportService;

// 路由注册入口（GET）/ Route registration (GET)
pub fn register(cfg: &mut web::ServiceConfig, path: &str) {
    cfg.service(web::resource(path).route(web::get().to(health_handle)));
}

// 存活与存储健康探针 / Liveness plus storage health probe
pub async fn health_handle(svc: web::Data<SupportService>) -> impl Responder {
    let status = svc.store().health().await;
    let code = if status.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    respond_any(code, status)
}
