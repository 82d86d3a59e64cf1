use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiFailure};

pub const SUCCESS_CODE: u16 = 200;

/// 统一响应信封：成功时 code = 200，失败时 data 为 null
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: SUCCESS_CODE,
            message: "success".to_owned(),
            data: Some(data),
        }
    }

    pub fn error(err: ApiError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// 非 200 信封还原为 `ApiFailure`
    pub fn into_result(self) -> Result<Option<T>, ApiFailure> {
        if self.is_success() {
            Ok(self.data)
        } else {
            Err(ApiFailure {
                code: self.code,
                message: self.message,
            })
        }
    }
}

impl<T> From<Result<T, ApiError>> for ApiResponse<T> {
    fn from(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(e) => Self::error(e),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    10
}

fn default_sort_by() -> String {
    "createdAt".to_owned()
}

/// 列表查询参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    #[serde(default)]
    pub sort_order: SortOrder,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
            search: None,
            sort_by: default_sort_by(),
            sort_order: SortOrder::default(),
        }
    }
}

impl PaginationParams {
    pub fn page(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            ..Self::default()
        }
    }

    pub fn search(mut self, keyword: &str) -> Self {
        self.search = Some(keyword.to_owned());
        self
    }

    /// 小写化的搜索关键字，按原样匹配（不去除空白），空串视为未搜索
    pub fn keyword(&self) -> Option<String> {
        self.search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub list: Vec<T>,
    pub total: usize,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

/// 截取 `[(page-1)*size, page*size)`，page 与 size 至少为 1
pub fn paginate<T>(items: Vec<T>, page: u32, page_size: u32) -> Paginated<T> {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let total = items.len();
    let total_pages = total.div_ceil(page_size as usize) as u32;
    let start = (page as usize - 1).saturating_mul(page_size as usize);

    let list = items
        .into_iter()
        .skip(start)
        .take(page_size as usize)
        .collect();

    Paginated {
        list,
        total,
        page,
        page_size,
        total_pages,
    }
}
