use thiserror::Error;

pub type Result<T> = std::result::Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("配置错误: {0}")]
    Config(String),
    #[error("连接池错误: {0}")]
    Pool(String),
    #[error("SQLx 错误: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("未找到记录")]
    NotFound,
    #[error("事务错误: {0}")]
    Tx(String),
}

/// 获取详细错误描述（中英文） / Get detailed error description (CN/EN)
pub fn describe_error(e: &DbError) -> String {
    match e {
        DbError::Config(msg) => format!("配置错误 / Config error: {}", msg),
        DbError::Pool(msg) => format!("连接池错误 / Pool error: {}", msg),
        DbError::Sqlx(err) => format!("SQLx 错误 / SQLx error: {}", err),
        DbError::NotFound => "未找到记录 / Record not found".to_string(),
        DbError::Tx(msg) => format!("事务错误 / Transaction error: {}", msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_not_found() {
        let s = describe_error(&DbError::NotFound);
        assert!(s.contains("Record not found"));
    }
}
