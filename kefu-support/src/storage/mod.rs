//! 存储层 / Storage layer
//!
//! `SupportStore` 以 trait 形式抽象，便于测试替换与后端切换
//! `SupportStore` is a trait so backends can be swapped and tests can
//! run against the in-memory implementation
//!
//! 后端由配置项 `storage.backend` 在启动时选择（memory | postgres）
//! Backend selected at bootstrap via `storage.backend` (memory | postgres)

pub mod memory;
pub mod postgres;

pub use memory::MemStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use kefu::http::Page;
use kefu::HealthStatus;
use thiserror::Error;

use crate::domain::{ChatLog, GroupStatus, SenderRole, SupportGroup};

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("会话组不存在: {0}")]
    GroupNotFound(i64),
    #[error("数据库错误: {0}")]
    Db(#[from] kefu::DbError),
}

/// 会话组列表过滤条件 / Group listing filter
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupFilter {
    pub status: Option<GroupStatus>,
    pub app_id: Option<i64>,
    pub user_id: Option<i64>,
}

/// 客服存储接口 / Support storage interface
///
/// 约定 / Contract:
/// - 消息只追加，永不删除 / messages are append-only, never deleted
/// - 列表排序 `created_at DESC, id DESC`，消息排序 `id ASC`
///   / groups ordered `created_at DESC, id DESC`, messages `id ASC`
/// - `reply_and_update` 的两个写入必须是一个原子单元
///   / both writes of `reply_and_update` form one atomic unit
#[async_trait]
pub trait SupportStore: Send + Sync {
    /// 创建会话组，初始状态 open / Create a group with initial status open
    async fn create_group(&self, app_id: i64, user_id: i64) -> Result<SupportGroup>;

    async fn get_group(&self, group_id: i64) -> Result<Option<SupportGroup>>;

    /// 分页列出会话组，返回 (本页, 总数) / Page of groups plus total count
    async fn list_groups(&self, filter: GroupFilter, page: Page)
        -> Result<(Vec<SupportGroup>, u64)>;

    /// 用户最近一个 open 状态的会话组 / The user's most recent open group
    async fn latest_open_group(&self, user_id: i64) -> Result<Option<SupportGroup>>;

    /// 追加一条消息，组不存在时返回 GroupNotFound
    /// Append one message, GroupNotFound when the group is absent
    async fn append_message(
        &self,
        group_id: i64,
        role: SenderRole,
        content: &str,
    ) -> Result<ChatLog>;

    /// 按时间升序分页读取消息 / Messages in chronological ascending order
    async fn list_messages(&self, group_id: i64, page: Page) -> Result<(Vec<ChatLog>, u64)>;

    /// 客服回复并按需原子更新状态 / Agent reply with optional atomic status update
    async fn reply_and_update(
        &self,
        group_id: i64,
        content: &str,
        status: Option<GroupStatus>,
    ) -> Result<ChatLog>;

    /// 设置状态（幂等，后写覆盖）/ Set status (idempotent, last writer wins)
    async fn update_status(&self, group_id: i64, status: GroupStatus) -> Result<SupportGroup>;

    async fn health(&self) -> HealthStatus;
}
