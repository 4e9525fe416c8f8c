use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::DB_GROUP;

pub const TABLE_SUPPORT_GROUP: &str = "support_group";

/// 会话组状态，只允许 open / closed 两种取值
/// Group status, the only two legal tags are open / closed
///
/// 状态图是双向的：open -> closed（解决）且 closed -> open（重新打开）
/// The transition graph is bidirectional: open -> closed (resolve) and
/// closed -> open (reopen)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum GroupStatus {
    Open,
    Closed,
}

impl GroupStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupStatus::Open => "open",
            GroupStatus::Closed => "closed",
        }
    }

    /// 解析状态标签，未知标签返回 None（不落库非法值）
    /// Parse a status tag, unknown tags yield None (never persisted)
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "open" => Some(GroupStatus::Open),
            "closed" => Some(GroupStatus::Closed),
            _ => None,
        }
    }
}

impl std::fmt::Display for GroupStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 客服会话组 / Support chat group
///
/// 一个客户与客服人员之间的会话线程，关联来源应用与客户用户。
/// A conversation thread between one customer and support staff,
/// associated with a source app and the customer user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SupportGroup {
    /// 主键，创建后不可变 / Primary key, immutable after creation
    pub id: i64,
    /// 来源应用 / Source app association
    pub app_id: i64,
    /// 客户用户（只读关联）/ Customer user (read-only association)
    pub user_id: i64,
    pub status: GroupStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

kefu::impl_table_meta!(SupportGroup, TABLE_SUPPORT_GROUP, DB_GROUP);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        assert_eq!(GroupStatus::parse("open"), Some(GroupStatus::Open));
        assert_eq!(GroupStatus::parse("closed"), Some(GroupStatus::Closed));
        assert_eq!(GroupStatus::parse("resolved"), None);
        assert_eq!(GroupStatus::Open.as_str(), "open");
    }

    #[test]
    fn test_status_serde_lowercase() {
        let json = serde_json::to_string(&GroupStatus::Closed).unwrap();
        assert_eq!(json, "\"closed\"");
        let back: GroupStatus = serde_json::from_str("\"open\"").unwrap();
        assert_eq!(back, GroupStatus::Open);
        assert!(serde_json::from_str::<GroupStatus>("\"pending\"").is_err());
    }
}
