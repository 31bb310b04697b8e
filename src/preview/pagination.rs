/// Page cursor over a rendered document.
///
/// The page count stays `None` until the document has rendered; a pending
/// document is never treated as an empty one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page_count: Option<usize>,
    page: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page_count: None,
            page: 1,
        }
    }
}

impl Pagination {
    pub fn page_count(&self) -> Option<usize> {
        self.page_count
    }

    /// 1-based current page.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn is_known(&self) -> bool {
        self.page_count.is_some()
    }

    pub(crate) fn rendered(page_count: usize) -> Self {
        Self {
            page_count: Some(page_count),
            page: 1,
        }
    }

    pub fn has_next(&self) -> bool {
        matches!(self.page_count, Some(count) if self.page < count)
    }

    pub fn has_previous(&self) -> bool {
        self.page_count.is_some() && self.page > 1
    }

    pub fn next_page(&mut self) -> bool {
        if self.has_next() {
            self.page += 1;
            true
        } else {
            false
        }
    }

    pub fn previous_page(&mut self) -> bool {
        if self.has_previous() {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Jumps to `page`, clamped to the document. No-op while the count is unknown.
    pub fn go_to(&mut self, page: usize) -> usize {
        if let Some(count) = self.page_count {
            self.page = page.clamp(1, count.max(1));
        }
        self.page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_count_blocks_navigation() {
        let mut pages = Pagination::default();
        assert_eq!(pages.page_count(), None);
        assert!(!pages.next_page());
        assert_eq!(pages.go_to(5), 1);
    }

    #[test]
    fn navigation_is_clamped() {
        let mut pages = Pagination::rendered(3);
        assert!(!pages.previous_page());
        assert!(pages.next_page());
        assert!(pages.next_page());
        assert!(!pages.next_page());
        assert_eq!(pages.page(), 3);
        assert_eq!(pages.go_to(0), 1);
        assert_eq!(pages.go_to(99), 3);
    }
}
