//! Page-number pagination that never rejects its input.
//!
//! A missing page token selects the first page. A token that is not a
//! positive integer, or that points past the end, selects the last page.

use serde::{Deserialize, Serialize};

/// How a raw page token was turned into a page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageResolution {
    /// No token given; first page.
    Default,
    /// Token named a valid page.
    Requested,
    /// Token was not a positive integer; last page.
    Malformed,
    /// Token was past the last page; last page.
    OutOfRange,
}

/// Splits `count` items into pages of `per_page`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    count: u64,
    per_page: u64,
}

impl Paginator {
    /// A page size of zero is treated as one.
    pub fn new(count: u64, per_page: u64) -> Self {
        Self {
            count,
            per_page: per_page.max(1),
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    /// Number of pages; an empty collection still has one (empty) page.
    pub fn num_pages(&self) -> u64 {
        self.count.div_ceil(self.per_page).max(1)
    }

    /// Resolve a raw page token to a 1-based page number. Only an absent
    /// token means page 1; a present but empty token is malformed.
    pub fn resolve(&self, token: Option<&str>) -> (u64, PageResolution) {
        let last = self.num_pages();
        let Some(raw) = token else {
            return (1, PageResolution::Default);
        };
        match raw.trim().parse::<u64>() {
            Ok(0) | Err(_) => (last, PageResolution::Malformed),
            Ok(n) if n > last => (last, PageResolution::OutOfRange),
            Ok(n) => (n, PageResolution::Requested),
        }
    }

    /// Zero-based offset and limit of page `number` (1-based).
    pub fn window(&self, number: u64) -> (u64, u64) {
        let number = number.clamp(1, self.num_pages());
        ((number - 1) * self.per_page, self.per_page)
    }

    /// Wrap the items of page `number` with its metadata.
    pub fn page<T>(&self, number: u64, items: Vec<T>) -> Page<T> {
        let number = number.clamp(1, self.num_pages());
        let num_pages = self.num_pages();
        let (offset, _) = self.window(number);
        let (start_index, end_index) = if self.count == 0 {
            (0, 0)
        } else {
            (offset + 1, offset + items.len() as u64)
        };
        Page {
            items,
            number,
            num_pages,
            count: self.count,
            page_size: self.per_page,
            has_next: number < num_pages,
            has_previous: number > 1,
            next_page_number: (number < num_pages).then_some(number + 1),
            previous_page_number: (number > 1).then_some(number - 1),
            start_index,
            end_index,
        }
    }

    /// Resolve `token` and cut the matching page out of an in-memory slice.
    pub fn paginate<T: Clone>(&self, all: &[T], token: Option<&str>) -> Page<T> {
        let (number, _) = self.resolve(token);
        let (offset, limit) = self.window(number);
        let items = all
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();
        self.page(number, items)
    }
}

/// One page of results plus what a caller needs to render pager controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Current page, 1-based.
    pub number: u64,
    pub num_pages: u64,
    /// Total number of items across all pages.
    pub count: u64,
    pub page_size: u64,
    pub has_next: bool,
    pub has_previous: bool,
    pub next_page_number: Option<u64>,
    pub previous_page_number: Option<u64>,
    /// 1-based index of the first item on this page, 0 when empty.
    pub start_index: u64,
    pub end_index: u64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            count: self.count,
            page_size: self.page_size,
            has_next: self.has_next,
            has_previous: self.has_previous,
            next_page_number: self.next_page_number,
            previous_page_number: self.previous_page_number,
            start_index: self.start_index,
            end_index: self.end_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_is_ceiling() {
        assert_eq!(Paginator::new(10, 3).num_pages(), 4);
        assert_eq!(Paginator::new(9, 3).num_pages(), 3);
        assert_eq!(Paginator::new(1, 3).num_pages(), 1);
        assert_eq!(Paginator::new(0, 3).num_pages(), 1);
    }

    #[test]
    fn zero_page_size_is_clamped() {
        let p = Paginator::new(5, 0);
        assert_eq!(p.per_page(), 1);
        assert_eq!(p.num_pages(), 5);
    }

    #[test]
    fn resolve_tokens() {
        let p = Paginator::new(10, 3);
        assert_eq!(p.resolve(None), (1, PageResolution::Default));
        assert_eq!(p.resolve(Some("")), (4, PageResolution::Malformed));
        assert_eq!(p.resolve(Some("  ")), (4, PageResolution::Malformed));
        assert_eq!(p.resolve(Some("2")), (2, PageResolution::Requested));
        assert_eq!(p.resolve(Some(" 3 ")), (3, PageResolution::Requested));
        assert_eq!(p.resolve(Some("abc")), (4, PageResolution::Malformed));
        assert_eq!(p.resolve(Some("0")), (4, PageResolution::Malformed));
        assert_eq!(p.resolve(Some("-1")), (4, PageResolution::Malformed));
        assert_eq!(p.resolve(Some("2.5")), (4, PageResolution::Malformed));
        assert_eq!(p.resolve(Some("9999")), (4, PageResolution::OutOfRange));
    }

    #[test]
    fn malformed_and_out_of_range_equal_last_page() {
        let items: Vec<u32> = (1..=7).collect();
        let p = Paginator::new(items.len() as u64, 3);
        let last = p.paginate(&items, Some("3"));
        assert_eq!(p.paginate(&items, Some("abc")), last);
        assert_eq!(p.paginate(&items, Some("9999")), last);
        assert_eq!(last.items, vec![7]);
        assert!(!last.has_next);
        assert_eq!(last.previous_page_number, Some(2));
    }

    #[test]
    fn pages_concatenate_to_the_whole() {
        let items: Vec<u32> = (1..=10).collect();
        let p = Paginator::new(items.len() as u64, 4);
        let mut seen = Vec::new();
        for n in 1..=p.num_pages() {
            let page = p.paginate(&items, Some(&n.to_string()));
            assert!(page.items.len() as u64 <= p.per_page());
            seen.extend(page.items);
        }
        assert_eq!(seen, items);
    }

    #[test]
    fn first_page_metadata() {
        let items: Vec<u32> = (1..=5).collect();
        let page = Paginator::new(5, 2).paginate(&items, None);
        assert_eq!(page.items, vec![1, 2]);
        assert_eq!(page.number, 1);
        assert_eq!(page.num_pages, 3);
        assert_eq!(page.count, 5);
        assert!(page.has_next);
        assert!(!page.has_previous);
        assert_eq!(page.next_page_number, Some(2));
        assert_eq!((page.start_index, page.end_index), (1, 2));
    }

    #[test]
    fn empty_collection_has_one_empty_page() {
        let items: Vec<u32> = Vec::new();
        let page = Paginator::new(0, 3).paginate(&items, Some("abc"));
        assert!(page.items.is_empty());
        assert_eq!(page.number, 1);
        assert_eq!(page.num_pages, 1);
        assert_eq!((page.start_index, page.end_index), (0, 0));
    }

    #[test]
    fn map_keeps_metadata() {
        let page = Paginator::new(3, 2).paginate(&[1, 2, 3], Some("2"));
        let mapped = page.clone().map(|n| n * 10);
        assert_eq!(mapped.items, vec![30]);
        assert_eq!(mapped.number, page.number);
        assert_eq!(mapped.num_pages, page.num_pages);
    }
}
