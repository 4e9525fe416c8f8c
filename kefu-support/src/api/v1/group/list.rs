use actix_web::{web, HttpResponse};
use kefu::http::{json_ok, HttpError, PageQuery};

use crate::api::identity::Identity;
use crate::domain::GroupStatus;
use crate::service::SupportService;
use crate::storage::GroupFilter;

#[derive(serde::Deserialize)]
pub struct GroupListQuery {
    pub status: Option<String>,
    #[serde(rename = "appId")]
    pub app_id: Option<i64>,
    #[serde(rename = "userId")]
    pub user_id: Option<i64>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

// 路由注册入口（GET）/ Route registration (GET)
pub fn register(cfg: &mut web::ServiceConfig, path: &str) {
    cfg.service(web::resource(path).route(web::get().to(list_handle)));
}

// 管理端会话组列表，支持状态/应用/用户过滤
// Admin group listing with status/app/user filters
pub async fn list_handle(
    svc: web::Data<SupportService>,
    _identity: Identity,
    query: web::Query<GroupListQuery>,
) -> Result<HttpResponse, HttpError> {
    let status = match query.status.as_deref() {
        Some(tag) => Some(GroupStatus::parse(tag).ok_or_else(|| {
            HttpError::validation("status", "未知状态值，只允许 open/closed")
        })?),
        None => None,
    };
    let filter = GroupFilter {
        status,
        app_id: query.app_id,
        user_id: query.user_id,
    };
    let page = PageQuery {
        page: query.page,
        size: query.size,
    }
    .normalize();
    let data = svc.list_support_groups(filter, page).await?;
    Ok(json_ok(data))
}
