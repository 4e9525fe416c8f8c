use actix_web::{web, HttpResponse};
use kefu::http::json_ok;
use utoipa::OpenApi;

use crate::api::v1::chat_log::reply::ReplyRequest;
use crate::api::v1::chat_log::send::SendRequest;
use crate::api::v1::group::status::StatusRequest;
use crate::domain::{ChatLog, GroupStatus, SenderRole, SupportGroup};

/// OpenAPI 文档（JSON）/ OpenAPI document (JSON)
#[derive(OpenApi)]
#[openapi(
    info(
        title = "kefu-support",
        description = "客服会话后端 API / Customer-support chat backend API"
    ),
    components(schemas(
        SupportGroup,
        ChatLog,
        GroupStatus,
        SenderRole,
        ReplyRequest,
        SendRequest,
        StatusRequest
    ))
)]
pub struct ApiDoc;

// 路由注册入口（GET）/ Route registration (GET)
pub fn register(cfg: &mut web::ServiceConfig, path: &str) {
    cfg.service(web::resource(path).route(web::get().to(openapi_handle)));
}

pub async fn openapi_handle() -> HttpResponse {
    json_ok(ApiDoc::openapi())
}
