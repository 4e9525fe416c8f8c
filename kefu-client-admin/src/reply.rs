use serde::Serialize;

use crate::error::Result;
use crate::types::{ChatMessage, SupportStatus};
use crate::{read_json, AdminSupportClient};

#[derive(Debug, Serialize)]
struct ReplyBody<'a> {
    #[serde(rename = "groupId")]
    group_id: i64,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<SupportStatus>,
}

impl AdminSupportClient {
    /// 客服回复；status 给定时服务端与消息追加原子更新
    /// Agent reply; a given status is applied atomically with the append
    #[tracing::instrument(skip(self, content))]
    pub async fn reply_support(
        &self,
        group_id: i64,
        content: &str,
        status: Option<SupportStatus>,
    ) -> Result<ChatMessage> {
        let res = self
            .client
            .post(format!("{}/chatLog/support/reply", self.base_url))
            .json(&ReplyBody {
                group_id,
                content,
                status,
            })
            .send()
            .await?;
        read_json(res).await
    }
}
