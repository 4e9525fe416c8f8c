//! 客服业务逻辑 / Support business logic
//!
//! 服务持有 `Arc<dyn SupportStore>`，由组装 HTTP 层的一方显式注入
//! The service owns an `Arc<dyn SupportStore>`, explicitly injected by
//! whoever composes the HTTP layer

use std::sync::Arc;

use kefu::http::{HttpError, Page, PageData};
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::{ChatLog, GroupStatus, SenderRole, SupportGroup};
use crate::storage::{GroupFilter, StoreError, SupportStore};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("参数校验失败: {field}: {message}")]
    Validation { field: String, message: String },
    #[error("会话组不存在")]
    GroupNotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    fn validation(field: &str, message: &str) -> Self {
        ServiceError::Validation {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

impl From<ServiceError> for HttpError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation { field, message } => HttpError::validation(&field, &message),
            ServiceError::GroupNotFound => {
                HttpError::NotFound("会话组不存在 / support group not found".to_string())
            }
            ServiceError::Store(StoreError::GroupNotFound(id)) => {
                HttpError::NotFound(format!("会话组不存在 / support group not found: {}", id))
            }
            ServiceError::Store(StoreError::Db(e)) => {
                HttpError::Internal(kefu::describe_error(&e))
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;

pub struct SupportService {
    store: Arc<dyn SupportStore>,
}

impl SupportService {
    pub fn new(store: Arc<dyn SupportStore>) -> Self {
        SupportService { store }
    }

    pub fn store(&self) -> &Arc<dyn SupportStore> {
        &self.store
    }

    /// 为当前客户创建会话组，初始状态 open
    /// Create a group for the calling customer, initial status open
    pub async fn create_support_group(&self, app_id: i64, user_id: i64) -> Result<SupportGroup> {
        let group = self.store.create_group(app_id, user_id).await?;
        info!(group_id = group.id, user_id, app_id, "support group created");
        Ok(group)
    }

    /// 管理端会话组列表 / Admin group listing
    pub async fn list_support_groups(
        &self,
        filter: GroupFilter,
        page: Page,
    ) -> Result<PageData<SupportGroup>> {
        let (items, total) = self.store.list_groups(filter, page).await?;
        debug!(total, page = page.page, "support groups listed");
        Ok(PageData::new(items, page, total))
    }

    /// 管理端按组读取消息 / Admin message query for an explicit group
    pub async fn query_messages(&self, group_id: i64, page: Page) -> Result<PageData<ChatLog>> {
        let (items, total) = self.store.list_messages(group_id, page).await?;
        Ok(PageData::new(items, page, total))
    }

    /// 用户端按组读取消息；groupId 缺省时取最近 open 会话组
    /// Customer message query; defaults to the latest open group
    pub async fn query_my_messages(
        &self,
        user_id: i64,
        group_id: Option<i64>,
        page: Page,
    ) -> Result<PageData<ChatLog>> {
        let group = self.resolve_group(user_id, group_id).await?;
        self.query_messages(group.id, page).await
    }

    /// 客户发送消息 / Customer sends a message
    ///
    /// groupId 缺省解析为该客户最近的 open 会话组；没有则返回未找到，
    /// 不做隐式创建（创建始终是显式的客户端动作）。
    /// Without groupId the caller's latest open group is used; none means
    /// not-found, never implicit creation (creation stays an explicit
    /// client action).
    pub async fn send_message(
        &self,
        user_id: i64,
        group_id: Option<i64>,
        content: &str,
    ) -> Result<ChatLog> {
        let content = validated_content(content)?;
        let group = self.resolve_group(user_id, group_id).await?;
        let log = self
            .store
            .append_message(group.id, SenderRole::Customer, content)
            .await?;
        info!(group_id = group.id, message_id = log.id, "customer message appended");
        Ok(log)
    }

    /// 客服回复，可同时原子更新状态 / Agent reply with optional atomic status update
    pub async fn reply_support(
        &self,
        group_id: i64,
        content: &str,
        status: Option<GroupStatus>,
    ) -> Result<ChatLog> {
        let content = validated_content(content)?;
        let log = self.store.reply_and_update(group_id, content, status).await?;
        info!(
            group_id,
            message_id = log.id,
            status = status.map(|s| s.as_str()),
            "support reply appended"
        );
        Ok(log)
    }

    /// 设置会话状态；幂等 / Set group status; idempotent
    pub async fn update_status(
        &self,
        user_id: i64,
        group_id: Option<i64>,
        status: GroupStatus,
    ) -> Result<SupportGroup> {
        let group = self.resolve_group(user_id, group_id).await?;
        let updated = self.store.update_status(group.id, status).await?;
        info!(group_id = updated.id, status = status.as_str(), "group status set");
        Ok(updated)
    }

    /// 解析客户操作的目标会话组 / Resolve the target group of a customer call
    ///
    /// 显式 groupId 必须属于该客户，否则按未找到处理（不向其他租户
    /// 确认组号的存在性）。
    /// An explicit groupId must belong to the caller, anything else is
    /// not-found (group ids of other tenants are not confirmable).
    async fn resolve_group(&self, user_id: i64, group_id: Option<i64>) -> Result<SupportGroup> {
        match group_id {
            Some(id) => match self.store.get_group(id).await? {
                Some(g) if g.user_id == user_id => Ok(g),
                _ => Err(ServiceError::GroupNotFound),
            },
            None => self
                .store
                .latest_open_group(user_id)
                .await?
                .ok_or(ServiceError::GroupNotFound),
        }
    }
}

fn validated_content(content: &str) -> Result<&str> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::validation("content", "消息内容不能为空"));
    }
    Ok(trimmed)
}
