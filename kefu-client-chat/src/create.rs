use crate::error::Result;
use crate::types::SupportGroup;
use crate::{read_json, ChatSupportClient};

impl ChatSupportClient {
    /// 创建客服会话组（首次联系时显式调用，无请求体）
    /// Create a support group (explicit first-contact call, no body)
    #[tracing::instrument(skip(self))]
    pub async fn create_support_group(&self) -> Result<SupportGroup> {
        let res = self
            .client
            .post(format!("{}/group/createSupportGroup", self.base_url))
            .send()
            .await?;
        read_json(res).await
    }
}
