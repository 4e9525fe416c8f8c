use actix_web::{web, HttpResponse};
use kefu::http::{json_ok, HttpError, PageQuery};

use crate::api::identity::Identity;
use crate::service::SupportService;

#[derive(serde::Deserialize)]
pub struct MessagesQuery {
    #[serde(rename = "groupId")]
    pub group_id: i64,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

// 路由注册入口（GET）/ Route registration (GET)
pub fn register(cfg: &mut web::ServiceConfig, path: &str) {
    cfg.service(web::resource(path).route(web::get().to(messages_handle)));
}

// 管理端按组读取消息，时间升序 / Admin message listing, chronological ascending
pub async fn messages_handle(
    svc: web::Data<SupportService>,
    _identity: Identity,
    query: web::Query<MessagesQuery>,
) -> Result<HttpResponse, HttpError> {
    let page = PageQuery {
        page: query.page,
        size: query.size,
    }
    .normalize();
    let data = svc.query_messages(query.group_id, page).await?;
    Ok(json_ok(data))
}
