use actix_web::{web, HttpResponse};
use kefu::http::{json_ok, HttpError};
use utoipa::ToSchema;

use crate::api::identity::Identity;
use crate::domain::GroupStatus;
use crate::service::SupportService;

/// 状态更新请求；groupId 缺省时解析为调用方最近的 open 会话组
/// Status update request; without groupId the caller's latest open group
#[derive(serde::Deserialize, ToSchema)]
pub struct StatusRequest {
    pub status: String,
    #[serde(rename = "groupId")]
    pub group_id: Option<i64>,
}

// 路由注册入口（POST）/ Route registration (POST)
pub fn register(cfg: &mut web::ServiceConfig, path: &str) {
    cfg.service(web::resource(path).route(web::post().to(status_handle)));
}

// 设置会话状态（幂等）/ Set group status (idempotent)
pub async fn status_handle(
    svc: web::Data<SupportService>,
    identity: Identity,
    req: web::Json<StatusRequest>,
) -> Result<HttpResponse, HttpError> {
    let status = GroupStatus::parse(&req.status).ok_or_else(|| {
        HttpError::validation("status", "未知状态值，只允许 open/closed")
    })?;
    let group = svc
        .update_status(identity.user_id, req.group_id, status)
        .await?;
    Ok(json_ok(group))
}
