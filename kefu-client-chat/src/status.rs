use serde::Serialize;

use crate::error::Result;
use crate::types::{SupportGroup, SupportStatus};
use crate::{read_json, ChatSupportClient};

#[derive(Debug, Serialize)]
struct StatusBody {
    status: SupportStatus,
    #[serde(rename = "groupId", skip_serializing_if = "Option::is_none")]
    group_id: Option<i64>,
}

impl ChatSupportClient {
    /// 更新会话状态（open/closed，双向允许）
    /// Update group status (open/closed, both directions allowed)
    #[tracing::instrument(skip(self))]
    pub async fn update_support_status(
        &self,
        status: SupportStatus,
        group_id: Option<i64>,
    ) -> Result<SupportGroup> {
        let res = self
            .client
            .post(format!("{}/group/support/status", self.base_url))
            .json(&StatusBody { status, group_id })
            .send()
            .await?;
        read_json(res).await
    }
}
