use serde::{Deserialize, Serialize};

/// 分页请求参数，未提供时使用默认值
/// Pagination request params, defaults apply when absent
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

/// 规范化后的分页（page 从 1 起，size 限制在 1..=100）
/// Normalized pagination (page starts at 1, size clamped to 1..=100)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub size: u32,
}

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

impl PageQuery {
    pub fn normalize(&self) -> Page {
        let page = self.page.unwrap_or(1).max(1);
        let size = self
            .size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        Page { page, size }
    }
}

impl Default for Page {
    fn default() -> Self {
        Page {
            page: 1,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Page {
    /// SQL OFFSET 值 / SQL OFFSET value
    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.size as i64
    }

    pub fn limit(&self) -> i64 {
        self.size as i64
    }
}

/// 分页响应信封 / Paged response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageData<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total: u64,
}

impl<T> PageData<T> {
    pub fn new(items: Vec<T>, page: Page, total: u64) -> Self {
        PageData {
            items,
            page: page.page,
            size: page.size,
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_defaults() {
        let q = PageQuery {
            page: None,
            size: None,
        };
        assert_eq!(q.normalize(), Page { page: 1, size: 20 });
    }

    #[test]
    fn test_normalize_clamps() {
        let q = PageQuery {
            page: Some(0),
            size: Some(1000),
        };
        let p = q.normalize();
        assert_eq!(p.page, 1);
        assert_eq!(p.size, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_offset() {
        let p = Page { page: 3, size: 20 };
        assert_eq!(p.offset(), 40);
        assert_eq!(p.limit(), 20);
    }
}
