use serde::Serialize;

use crate::error::Result;
use crate::types::{ChatMessage, Paged};
use crate::{read_json, AdminSupportClient};

#[derive(Debug, Serialize)]
struct MessagesQuery {
    #[serde(rename = "groupId")]
    group_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<u32>,
}

impl AdminSupportClient {
    /// 按组查询消息历史（时间升序）/ Message history for a group (ascending)
    #[tracing::instrument(skip(self))]
    pub async fn query_support_messages(
        &self,
        group_id: i64,
        page: Option<u32>,
        size: Option<u32>,
    ) -> Result<Paged<ChatMessage>> {
        let res = self
            .client
            .get(format!("{}/chatLog/support/messages", self.base_url))
            .query(&MessagesQuery {
                group_id,
                page,
                size,
            })
            .send()
            .await?;
        read_json(res).await
    }
}
