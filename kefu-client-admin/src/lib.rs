//! 管理端客服 API 客户端 / Admin console support API client
//!
//! 纯请求构造：一个操作对应一个 HTTP 动词+路径+载荷，不做重试、
//! 缓存或业务转换；HTTP 错误原样向调用方抛出。
//! Pure request builders: one operation maps to one HTTP
//! verb+path+payload, no retry, caching or transformation; HTTP errors
//! surface to the caller unmodified.

pub mod error;
pub mod groups;
pub mod messages;
pub mod reply;
pub mod types;

use error::{ClientError, Result};
use serde::de::DeserializeOwned;

pub const HEADER_USER_ID: &str = "x-user-id";

#[derive(Clone)]
pub struct AdminSupportClient {
    base_url: String,
    client: reqwest::Client,
}

impl AdminSupportClient {
    /// 创建客户端；agent_id 由网关身份头传递
    /// Create the client; agent_id travels in the gateway identity header
    pub fn new(base_url: impl Into<String>, agent_id: i64) -> Self {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(HEADER_USER_ID, agent_id.to_string().parse().unwrap());

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
