use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 会话状态标签 / Group status tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportStatus {
    Open,
    Closed,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SupportGroup {
    pub id: i64,
    pub app_id: i64,
    pub user_id: i64,
    pub status: SupportStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub group_id: i64,
    pub role: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// 分页响应信封，与服务端保持一致 / Paged envelope, mirrors the server
#[derive(Debug, Clone, Deserialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total: u64,
}
