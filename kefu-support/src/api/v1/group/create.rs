use actix_web::{web, HttpResponse};
use kefu::http::{json_created, HttpError};

use crate::api::identity::Identity;
use crate::service::SupportService;

// 路由注册入口（POST）/ Route registration (POST)
pub fn register(cfg: &mut web::ServiceConfig, path: &str) {
    cfg.service(web::resource(path).route(web::post().to(create_handle)));
}

// 为当前客户创建客服会话组 / Create a support group for the caller
pub async fn create_handle(
    svc: web::Data<SupportService>,
    identity: Identity,
) -> Result<HttpResponse, HttpError> {
    let group = svc
        .create_support_group(identity.app_id, identity.user_id)
        .await?;
    Ok(json_created(group))
}
