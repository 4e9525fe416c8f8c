//! 客服会话后端 / Customer-support chat backend
//!
//! 控制器（api）-> 服务（service）-> 存储（storage）-> 领域实体（domain），
//! 基础设施（配置/日志/HTTP/数据库）来自 kefu 公共库。
//! Controller (api) -> service -> storage -> domain entities; the
//! infrastructure (config/tracing/HTTP/database) comes from the kefu
//! common library.

pub mod api;
pub mod config;
pub mod domain;
pub mod service;
pub mod storage;
