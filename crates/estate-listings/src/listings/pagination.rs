use serde::Serialize;

pub const MAX_PER_PAGE: u32 = 100;

/// 1-based page selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    /// Normalize raw query values: a missing or zero page becomes 1, a missing or zero page
    /// size falls back to `default_per_page`, and sizes are capped at [`MAX_PER_PAGE`].
    pub fn new(page: Option<u32>, per_page: Option<u32>, default_per_page: u32) -> Self {
        let page = page.filter(|page| *page > 0).unwrap_or(1);
        let per_page = per_page
            .filter(|size| *size > 0)
            .unwrap_or(default_per_page)
            .clamp(1, MAX_PER_PAGE);
        Self { page, per_page }
    }

    fn offset(&self) -> usize {
        (self.page as usize)
            .saturating_sub(1)
            .saturating_mul(self.per_page as usize)
    }
}

/// One page of results plus the totals a client needs to render pagination controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    #[serde(rename = "properties")]
    pub items: Vec<T>,
    pub total: usize,
    pub pages: usize,
    pub current_page: u32,
}

pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let total = items.len();
    let per_page = request.per_page.max(1) as usize;
    let pages = total.div_ceil(per_page);
    let items = items
        .into_iter()
        .skip(request.offset())
        .take(per_page)
        .collect();

    Page {
        items,
        total,
        pages,
        current_page: request.page,
    }
}
