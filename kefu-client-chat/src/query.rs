use serde::Serialize;

use crate::error::Result;
use crate::types::{ChatMessage, Paged};
use crate::{read_json, ChatSupportClient};

#[derive(Debug, Default, Serialize)]
struct QueryParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<u32>,
    #[serde(rename = "groupId", skip_serializing_if = "Option::is_none")]
    group_id: Option<i64>,
}

impl ChatSupportClient {
    /// 查询客服消息历史 / Query support message history
    #[tracing::instrument(skip(self))]
    pub async fn query_support_messages(
        &self,
        page: Option<u32>,
        size: Option<u32>,
        group_id: Option<i64>,
    ) -> Result<Paged<ChatMessage>> {
        let res = self
            .client
            .get(format!("{}/chatLog/querySupportMessages", self.base_url))
            .query(&QueryParams {
                page,
                size,
                group_id,
            })
            .send()
            .await?;
        read_json(res).await
    }
}
