use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::DB_GROUP;

pub const TABLE_CHAT_LOG: &str = "chat_log";

/// 消息发送方角色，由写入的端点决定
/// Sender role, implied by which endpoint wrote the message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SenderRole {
    Customer,
    Agent,
}

impl SenderRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            SenderRole::Customer => "customer",
            SenderRole::Agent => "agent",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "customer" => Some(SenderRole::Customer),
            "agent" => Some(SenderRole::Agent),
            _ => None,
        }
    }
}

/// 会话消息记录 / Chat log record
///
/// 只追加，不修改不删除；同组内 id 严格递增，追加顺序即时间顺序。
/// Append-only, never updated or deleted; ids are strictly increasing
/// within a group, append order equals chronological order.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatLog {
    pub id: i64,
    pub group_id: i64,
    pub role: SenderRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

kefu::impl_table_meta!(ChatLog, TABLE_CHAT_LOG, DB_GROUP);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_tags() {
        assert_eq!(SenderRole::parse("agent"), Some(SenderRole::Agent));
        assert_eq!(SenderRole::parse("customer"), Some(SenderRole::Customer));
        assert_eq!(SenderRole::parse("bot"), None);
    }
}
