//! 用户端客服 API 客户端 / End-user chat support API client
//!
//! 与管理端客户端同构：纯请求构造，无重试与缓存；
//! 服务端错误原样向上抛出。
//! Same shape as the admin client: pure request builders, no retry or
//! caching; server errors surface unmodified.

pub mod create;
pub mod error;
pub mod query;
pub mod send;
pub mod status;
pub mod types;

use error::{ClientError, Result};
use serde::de::DeserializeOwned;

pub const HEADER_USER_ID: &str = "x-user-id";
pub const HEADER_APP_ID: &str = "x-app-id";

#[derive(Clone)]
pub struct ChatSupportClient {
    base_url: String,
    client: reqwest::Client,
}

impl ChatSupportClient {
    /// 创建客户端；身份与应用上下文由网关身份头传递
    /// Create the client; identity and app context travel in the
    /// gateway identity headers
    pub fn new(base_url: impl Into<String>, user_id: i64, app_id: i64) -> Self {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(HEADER_USER_ID, user_id.to_string().parse().unwrap());
        headers.insert(HEADER_APP_ID, app_id.to_string().parse().unwrap());

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .unwrap();

        Self {
            base_url: base_url.into(),
            client,
        }
    }
}

pub(crate) async fn read_json<T: DeserializeOwned>(res: reqwest::Response) -> Result<T> {
    let status = res.status();
    if !status.is_success() {
        let body: String = res.text().await.unwrap_or_default();
        tracing::error!(
            status = %status,
            body = %body,
            "unexpected response from kefu-support"
        );
        return Err(ClientError::Http {
            status: status.as_u16(),
            body,
        });
    }
    Ok(res.json::<T>().await?)
}
