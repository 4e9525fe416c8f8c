//! 领域模型 / Domain model
//!
//! 客服会话组与消息记录的纯数据定义，无业务行为
//! Pure data definitions for support groups and chat logs, no behavior

pub mod group;
pub mod message;

pub use group::{GroupStatus, SupportGroup};
pub use message::{ChatLog, SenderRole};

/// 所属分库组 / Database group the tables live in
pub const DB_GROUP: &str = "default";
