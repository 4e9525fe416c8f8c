use actix_web::{web, HttpResponse};
use kefu::http::{json_ok, HttpError, PageQuery};

use crate::api::identity::Identity;
use crate::service::SupportService;

#[derive(serde::Deserialize)]
pub struct QueryMessagesQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    #[serde(rename = "groupId")]
    pub group_id: Option<i64>,
}

// 路由注册入口（GET）/ Route registration (GET)
pub fn register(cfg: &mut web::ServiceConfig, path: &str) {
    cfg.service(web::resource(path).route(web::get().to(query_handle)));
}

// 客户查询消息历史；groupId 缺省时取最近 open 会话组
// Customer message history; defaults to the latest open group
pub async fn query_handle(
    svc: web::Data<SupportService>,
    identity: Identity,
    query: web::Query<QueryMessagesQuery>,
) -> Result<HttpResponse, HttpError> {
    let page = PageQuery {
        page: query.page,
        size: query.size,
    }
    .normalize();
    let data = svc
        .query_my_messages(identity.user_id, query.group_id, page)
        .await?;
    Ok(json_ok(data))
}
