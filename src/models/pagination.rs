//! 分页相关的数据结构

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::DrawRecord;

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, ToSchema)]
pub struct PaginationParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl PaginationParams {
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self { page, per_page }
    }

    pub fn get_page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn get_per_page(&self) -> u32 {
        self.per_page.unwrap_or(20).clamp(1, 100)
    }

    pub fn get_offset(&self) -> usize {
        (self.get_page() as usize - 1) * self.get_per_page() as usize
    }

    pub fn get_limit(&self) -> usize {
        self.get_per_page() as usize
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[aliases(DrawRecordPage = PaginatedResponse<DrawRecord>)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: usize,
    pub total_pages: u32,
}

impl<T> PaginatedResponse<T> {
    /// 对已在内存中过滤好的完整列表切页
    pub fn paginate(all: Vec<T>, params: &PaginationParams) -> Self {
        let total = all.len();
        let per_page = params.get_per_page();
        let total_pages = if total == 0 {
            1
        } else {
            total.div_ceil(per_page as usize) as u32
        };
        let items = all
            .into_iter()
            .skip(params.get_offset())
            .take(params.get_limit())
            .collect();

        Self {
            items,
            page: params.get_page(),
            per_page,
            total,
            total_pages,
        }
    }
}
