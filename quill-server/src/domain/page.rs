use serde::Serialize;

/// One page of a feed. Page numbers are 1-based; out-of-range requests
/// clamp to the nearest valid page and malformed ones fall back to the
/// first, so feed URLs never 404 on the page parameter alone.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, number: u32, per_page: u32, total_items: u64) -> Self {
        let total_pages = total_pages(total_items, per_page);
        Self {
            items,
            number,
            per_page,
            total_items,
            total_pages,
            has_next: number < total_pages,
            has_previous: number > 1,
        }
    }
}

pub fn total_pages(total_items: u64, per_page: u32) -> u32 {
    let per_page = u64::from(per_page.max(1));
    let pages = total_items.div_ceil(per_page);
    pages.clamp(1, u64::from(u32::MAX)) as u32
}

/// Resolves the raw `?page=` value: absent or non-numeric means page 1,
/// anything past the end means the last page.
pub fn resolve_page(raw: Option<&str>, total_items: u64, per_page: u32) -> u32 {
    let requested = raw.and_then(|s| s.trim().parse::<u32>().ok()).unwrap_or(1).max(1);
    requested.min(total_pages(total_items, per_page))
}

pub fn offset(number: u32, per_page: u32) -> u64 {
    u64::from(number - 1) * u64::from(per_page)
}
