use serde::Serialize;

use crate::error::Result;
use crate::types::{Paged, SupportGroup, SupportStatus};
use crate::{read_json, AdminSupportClient};

/// 会话组列表过滤参数 / Group listing filter params
#[derive(Debug, Default, Serialize)]
pub struct GroupListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SupportStatus>,
    #[serde(rename = "appId", skip_serializing_if = "Option::is_none")]
    pub app_id: Option<i64>,
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

impl AdminSupportClient {
    /// 查询客服会话组列表 / List support groups
    #[tracing::instrument(skip(self))]
    pub async fn query_support_groups(
        &self,
        query: &GroupListQuery,
    ) -> Result<Paged<SupportGroup>> {
        let res = self
            .client
            .get(format!("{}/group/support/list", self.base_url))
            .query(query)
            .send()
            .await?;
        read_json(res).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_serialization_skips_empty() {
        let q = GroupListQuery {
            status: Some(SupportStatus::Open),
            ..Default::default()
        };
        let encoded = serde_json::to_value(&q).unwrap();
        assert_eq!(encoded, serde_json::json!({ "status": "open" }));
    }
}
