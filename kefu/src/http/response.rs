use actix_web::{http::StatusCode, HttpResponse};

// 通用 HTTP 响应封装 / Generic HTTP response helpers

/// 通用响应（结构体自动转 JSON，失败则原样文本）
/// Generic response: auto JSON from struct, fallback to text
pub fn respond_any<T: serde::Serialize + std::fmt::Debug>(
    code: StatusCode,
    data: T,
) -> HttpResponse {
    match serde_json::to_value(&data) {
        Ok(v) => HttpResponse::build(code).json(v),
        Err(_) => HttpResponse::build(code)
            .content_type("text/plain; charset=utf-8")
            .body(format!("{:?}", data)),
    }
}

pub fn json_ok<T: serde::Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(data)
}

pub fn json_created<T: serde::Serialize>(data: T) -> HttpResponse {
    HttpResponse::Created().json(data)
}

pub fn no_content() -> HttpResponse {
    HttpResponse::NoContent().finish()
}
