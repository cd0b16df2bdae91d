//! # Pagination
//! Fixed-size pages over an in-memory result list.
//!
//! Pages are 1-based. `current_page` always stays within
//! `1..=max(1, ceil(len / page_size))`.

/// Number of pages for `len` items; an empty list still has one (empty) page.
pub fn page_count(len: usize, page_size: usize) -> usize {
    let size = page_size.max(1);
    len.div_ceil(size).max(1)
}

/// Items visible on `page` (1-based). Out-of-range pages are empty; page 0 reads as page 1.
pub fn slice<T>(items: &[T], page_size: usize, page: usize) -> &[T] {
    let size = page_size.max(1);
    let start = page.max(1).saturating_sub(1).saturating_mul(size);
    if start >= items.len() {
        return &[];
    }
    let end = (start + size).min(items.len());
    &items[start..end]
}

#[derive(Debug, Clone)]
pub struct Paginator<T> {
    items: Vec<T>,
    page_size: usize,
    current_page: usize,
}

impl<T> Paginator<T> {
    /// `page_size` of 0 is treated as 1.
    pub fn new(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            page_size: page_size.max(1),
            current_page: 1,
        }
    }

    /// Swap in a new result list and go back to page 1.
    pub fn replace(&mut self, items: Vec<T>) {
        self.items = items;
        self.current_page = 1;
    }

    pub fn clear(&mut self) {
        self.replace(Vec::new());
    }

    pub fn reset_page(&mut self) {
        self.current_page = 1;
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_count(&self) -> usize {
        page_count(self.items.len(), self.page_size)
    }

    pub fn visible(&self) -> &[T] {
        slice(&self.items, self.page_size, self.current_page)
    }

    /// Advance one page. Returns `false` (no-op) on the last page.
    pub fn next_page(&mut self) -> bool {
        if self.current_page >= self.page_count() {
            return false;
        }
        self.current_page += 1;
        true
    }

    /// Go back one page. Returns `false` (no-op) on page 1.
    pub fn prev_page(&mut self) -> bool {
        if self.current_page <= 1 {
            return false;
        }
        self.current_page -= 1;
        true
    }

    /// Jump to `page`, clamped into the valid range. Returns the page landed on.
    pub fn go_to(&mut self, page: usize) -> usize {
        self.current_page = page.clamp(1, self.page_count());
        self.current_page
    }
}
