use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::{Result, TrackerError};

pub const DEFAULT_PAGE_LIMIT: i64 = 10;
pub const MAX_PAGE_LIMIT: i64 = 100;

// 分页查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "pagination.ts")]
pub struct PaginationQuery {
    #[serde(
        default = "default_page",
        deserialize_with = "deserialize_string_to_i64"
    )]
    pub page: i64,
    #[serde(
        default = "default_limit",
        deserialize_with = "deserialize_string_to_i64"
    )]
    pub limit: i64,
}

/// 已校验的分页请求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PaginationQuery {
    /// 校验并规范化：page >= 1，limit >= 1，limit 超过上限时截断
    pub fn resolve(&self) -> Result<PageRequest> {
        if self.page < 1 {
            return Err(TrackerError::invalid_input("page must be at least 1"));
        }
        if self.limit < 1 {
            return Err(TrackerError::invalid_input("limit must be at least 1"));
        }
        Ok(PageRequest {
            page: self.page as u64,
            limit: self.limit.min(MAX_PAGE_LIMIT) as u64,
        })
    }
}

impl PageRequest {
    /// 从 0 开始的页下标；偏移量超出 i64 范围时返回 None（必然越过末页）
    pub fn page_index(&self) -> Option<u64> {
        let index = self.page.checked_sub(1)?;
        let offset = index.checked_mul(self.limit)?;
        (offset <= i64::MAX as u64).then_some(index)
    }

    pub fn info(&self, total: u64) -> PaginationInfo {
        PaginationInfo {
            page: self.page as i64,
            limit: self.limit as i64,
            total: total as i64,
            pages: total.div_ceil(self.limit) as i64,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT as u64,
        }
    }
}

// 分页响应信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "pagination.ts")]
pub struct PaginationInfo {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

// 自定义反序列化函数，支持字符串到i64的转换
fn deserialize_string_to_i64<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{Error, Unexpected, Visitor};
    use std::fmt;

    struct I64Visitor;

    impl<'de> Visitor<'de> for I64Visitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an integer or a string containing an integer")
        }

        fn visit_i64<E>(self, value: i64) -> std::result::Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(value)
        }

        fn visit_u64<E>(self, value: u64) -> std::result::Result<Self::Value, E>
        where
            E: Error,
        {
            i64::try_from(value).map_err(|_| Error::invalid_value(Unexpected::Unsigned(value), &self))
        }

        fn visit_str<E>(self, value: &str) -> std::result::Result<Self::Value, E>
        where
            E: Error,
        {
            value
                .trim()
                .parse()
                .map_err(|_| Error::invalid_value(Unexpected::Str(value), &self))
        }
    }

    deserializer.deserialize_any(I64Visitor)
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_LIMIT
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}
