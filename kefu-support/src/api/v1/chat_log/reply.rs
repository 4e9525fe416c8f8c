use actix_web::{web, HttpResponse};
use kefu::http::{json_created, FieldError, HttpError};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::identity::Identity;
use crate::domain::GroupStatus;
use crate::service::SupportService;

/// 客服回复请求；status 给定时与消息追加原子生效
/// Agent reply request; a given status takes effect atomically with the append
#[derive(serde::Deserialize, Validate, ToSchema)]
pub struct ReplyRequest {
    #[serde(rename = "groupId")]
    pub group_id: i64,
    #[validate(length(min = 1, message = "内容不能为空"))]
    pub content: String,
    pub status: Option<String>,
}

// 路由注册入口（POST）/ Route registration (POST)
pub fn register(cfg: &mut web::ServiceConfig, path: &str) {
    cfg.service(web::resource(path).route(web::post().to(reply_handle)));
}

// 客服回复并按需更新状态 / Agent reply with optional status update
pub async fn reply_handle(
    svc: web::Data<SupportService>,
    _identity: Identity,
    req: web::Json<ReplyRequest>,
) -> Result<HttpResponse, HttpError> {
    req.validate().map_err(validation_to_http)?;
    let status = match req.status.as_deref() {
        Some(tag) => Some(GroupStatus::parse(tag).ok_or_else(|| {
            HttpError::validation("status", "未知状态值，只允许 open/closed")
        })?),
        None => None,
    };
    let log = svc.reply_support(req.group_id, &req.content, status).await?;
    Ok(json_created(log))
}

/// validator 错误转统一错误体 / Convert validator errors to the error body
pub fn validation_to_http(errors: validator::ValidationErrors) -> HttpError {
    let fields = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| FieldError {
                field: field.to_string(),
                code: e.code.to_string(),
                message: e.message.as_ref().map(|m| m.to_string()),
            })
        })
        .collect();
    HttpError::Validation(fields)
}
