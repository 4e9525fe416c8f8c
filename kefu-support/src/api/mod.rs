//! HTTP 接口层 / HTTP API layer
//!
//! 每个路由一个文件，文件内提供 `register(cfg, path)` 与处理函数；
//! 路由在此显式注册，不经过任何全局注册表。
//! One file per route, each exposing `register(cfg, path)` and its
//! handler; routes are wired here explicitly, no global registry.

pub mod identity;
pub mod openapi;
pub mod v1;

use actix_web::web;

/// 路由表：路径与各端客户端约定保持一致
/// Route table: paths match what the clients produce
pub fn configure(cfg: &mut web::ServiceConfig) {
    // 管理端 / Admin console
    v1::group::list::register(cfg, "/group/support/list");
    v1::chat_log::messages::register(cfg, "/chatLog/support/messages");
    v1::chat_log::reply::register(cfg, "/chatLog/support/reply");
    // 用户端 / End-user chat
    v1::group::create::register(cfg, "/group/createSupportGroup");
    v1::chat_log::send::register(cfg, "/chatgpt/sendSupportMessage");
    v1::chat_log::query::register(cfg, "/chatLog/querySupportMessages");
    v1::group::status::register(cfg, "/group/support/status");
    // 运维 / Operational
    v1::health::register(cfg, "/health");
    openapi::register(cfg, "/openapi.json");
}
