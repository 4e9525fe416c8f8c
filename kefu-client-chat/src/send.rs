use serde::Serialize;

use crate::error::Result;
use crate::types::ChatMessage;
use crate::{read_json, ChatSupportClient};

#[derive(Debug, Serialize)]
struct SendBody<'a> {
    content: &'a str,
    #[serde(rename = "groupId", skip_serializing_if = "Option::is_none")]
    group_id: Option<i64>,
}

impl ChatSupportClient {
    /// 发送客服消息；groupId 缺省时服务端取最近的 open 会话组
    /// Send a support message; without groupId the server resolves the
    /// latest open group
    #[tracing::instrument(skip(self, content))]
    pub async fn send_support_message(
        &self,
        content: &str,
        group_id: Option<i64>,
    ) -> Result<ChatMessage> {
        let res = self
            .client
            .post(format!("{}/chatgpt/sendSupportMessage", self.base_url))
            .json(&SendBody { content, group_id })
            .send()
            .await?;
        read_json(res).await
    }
}
