use actix_web::{web, HttpResponse};
use kefu::http::{json_created, HttpError};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::identity::Identity;
use crate::service::SupportService;

use super::reply::validation_to_http;

/// 客户消息请求；groupId 缺省时写入调用方最近的 open 会话组
/// Customer message request; without groupId the caller's latest open group
#[derive(serde::Deserialize, Validate, ToSchema)]
pub struct SendRequest {
    #[validate(length(min = 1, message = "内容不能为空"))]
    pub content: String,
    #[serde(rename = "groupId")]
    pub group_id: Option<i64>,
}

// 路由注册入口（POST）/ Route registration (POST)
pub fn register(cfg: &mut web::ServiceConfig, path: &str) {
    cfg.service(web::resource(path).route(web::post().to(send_handle)));
}

// 客户发送客服消息 / Customer sends a support message
pub async fn send_handle(
    svc: web::Data<SupportService>,
    identity: Identity,
    req: web::Json<SendRequest>,
) -> Result<HttpResponse, HttpError> {
    req.validate().map_err(validation_to_http)?;
    let log = svc
        .send_message(identity.user_id, req.group_id, &req.content)
        .await?;
    Ok(json_created(log))
}
