//! 调用方身份 / Caller identity
//!
//! 认证本身由上游网关完成，这里只读取网关写入的身份头；
//! 缺失即视为身份无法确认（401）。
//! Authentication happens in the upstream gateway; this extractor only
//! reads the identity headers the gateway injected. Missing headers mean
//! the caller identity cannot be established (401).

use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpRequest};
use kefu::http::HttpError;

pub const HEADER_USER_ID: &str = "x-user-id";
pub const HEADER_APP_ID: &str = "x-app-id";

#[derive(Debug, Clone, Copy)]
pub struct Identity {
    pub user_id: i64,
    /// 来源应用上下文，网关未注入时为 0 / Source app context, 0 when absent
    pub app_id: i64,
}

fn header_i64(req: &HttpRequest, name: &str) -> Option<i64> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<i64>().ok())
}

impl FromRequest for Identity {
    type Error = HttpError;
    type Future = Ready<Result<Identity, HttpError>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let identity = header_i64(req, HEADER_USER_ID)
            .map(|user_id| Identity {
                user_id,
                app_id: header_i64(req, HEADER_APP_ID).unwrap_or(0),
            })
            .ok_or_else(|| {
                HttpError::Unauthorized(
                    "无法确认调用方身份 / caller identity not established".to_string(),
                )
            });
        ready(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_rt::test]
    async fn test_identity_from_headers() {
        let req = TestRequest::default()
            .insert_header((HEADER_USER_ID, "42"))
            .insert_header((HEADER_APP_ID, "7"))
            .to_http_request();
        let id = Identity::extract(&req).await.unwrap();
        assert_eq!(id.user_id, 42);
        assert_eq!(id.app_id, 7);
    }

    #[actix_rt::test]
    async fn test_missing_user_header_is_unauthorized() {
        let req = TestRequest::default().to_http_request();
        let err = Identity::extract(&req).await.unwrap_err();
        assert_eq!(err.status_code(), 401);
    }

    #[actix_rt::test]
    async fn test_garbage_user_header_is_unauthorized() {
        let req = TestRequest::default()
            .insert_header((HEADER_USER_ID, "not-a-number"))
            .to_http_request();
        assert!(Identity::extract(&req).await.is_err());
    }
}
