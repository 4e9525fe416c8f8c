use actix_web::{http::StatusCode, HttpResponse, ResponseError};

use super::error::HttpError;

// 让 HttpError 可以直接作为 actix 处理函数的错误返回
// Let HttpError be returned directly from actix handlers

impl ResponseError for HttpError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(HttpError::status_code(self))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(ResponseError::status_code(self)).json(self.to_body())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_status() {
        let e = HttpError::NotFound("会话组不存在".into());
        let resp = e.error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_validation_maps_to_400() {
        let e = HttpError::validation("status", "未知状态值");
        assert_eq!(ResponseError::status_code(&e), StatusCode::BAD_REQUEST);
    }
}
