use serde::{Deserialize, Serialize};

/// 字段级校验错误 / Field-level validation error
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FieldError {
    pub field: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// 统一错误响应体 / Unified error response body
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldError>>,
}

/// HTTP 层错误分类，由服务层错误映射而来
/// HTTP-layer error taxonomy, mapped from service-layer errors
#[derive(Debug, Clone)]
pub enum HttpError {
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Validation(Vec<FieldError>),
    Conflict(String),
    Internal(String),
}

impl HttpError {
    /// 单字段校验错误的便捷构造 / Shorthand for a single-field validation error
    pub fn validation(field: &str, message: &str) -> Self {
        HttpError::Validation(vec![FieldError {
            field: field.to_string(),
            code: "invalid".to_string(),
            message: Some(message.to_string()),
        }])
    }

    pub fn status_code(&self) -> u16 {
        match self {
            HttpError::Unauthorized(_) => 401,
            HttpError::Forbidden(_) => 403,
            HttpError::NotFound(_) => 404,
            HttpError::Validation(_) => 400,
            HttpError::Conflict(_) => 409,
            HttpError::Internal(_) => 500,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            HttpError::Unauthorized(_) => "unauthorized",
            HttpError::Forbidden(_) => "forbidden",
            HttpError::NotFound(_) => "not_found",
            HttpError::Validation(_) => "validation_failed",
            HttpError::Conflict(_) => "conflict",
            HttpError::Internal(_) => "internal_error",
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        match self {
            HttpError::Unauthorized(msg)
            | HttpError::Forbidden(msg)
            | HttpError::NotFound(msg)
            | HttpError::Conflict(msg)
            | HttpError::Internal(msg) => ErrorBody {
                code: self.error_code().to_string(),
                message: msg.clone(),
                fields: None,
            },
            HttpError::Validation(errors) => ErrorBody {
                code: self.error_code().to_string(),
                message: "参数校验失败 / Validation failed".to_string(),
                fields: Some(errors.clone()),
            },
        }
    }
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            HttpError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            HttpError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            HttpError::Validation(_) => write!(f, "Validation Failed"),
            HttpError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            HttpError::Internal(msg) => write!(f, "Internal Error: {}", msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_body_serialization() {
        let e = HttpError::validation("content", "内容不能为空");
        let body = e.to_body();
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("validation_failed"));
        assert!(json.contains("content"));
        assert_eq!(e.status_code(), 400);
        assert_eq!(body.fields.unwrap().len(), 1);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(HttpError::Unauthorized("x".into()).status_code(), 401);
        assert_eq!(HttpError::NotFound("x".into()).status_code(), 404);
        assert_eq!(HttpError::Conflict("x".into()).status_code(), 409);
        assert_eq!(HttpError::Internal("x".into()).status_code(), 500);
    }

    #[test]
    fn test_plain_body_has_no_fields() {
        let body = HttpError::NotFound("group 42".into()).to_body();
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("fields"));
        assert!(json.contains("group 42"));
    }
}
