/// Attribute a page of users is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Id,
    BirthDate,
    Email,
    LastName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

/// Offset/limit page request. A `None` limit falls back to the configured default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageRequest {
    pub offset: u64,
    pub limit: Option<u32>,
    pub sort: Sort,
}

impl PageRequest {
    pub fn new(offset: u64, limit: u32) -> Self {
        Self {
            offset,
            limit: Some(limit),
            sort: Sort::default(),
        }
    }

    pub fn sorted_by(mut self, field: SortField, direction: SortDirection) -> Self {
        self.sort = Sort { field, direction };
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageInfo {
    pub offset: u64,
    pub limit: u32,
    pub total_elements: u64,
    pub total_pages: u64,
    pub number_of_elements: usize,
    pub first: bool,
    pub last: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_info: PageInfo,
}

impl<T> Page<T> {
    /// Build a page from one window of results and the size of the full result set.
    pub fn new(items: Vec<T>, offset: u64, limit: u32, total_elements: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total_elements.div_ceil(u64::from(limit))
        };
        let number_of_elements = items.len();
        Self {
            page_info: PageInfo {
                offset,
                limit,
                total_elements,
                total_pages,
                number_of_elements,
                first: offset == 0,
                last: offset.saturating_add(number_of_elements as u64) >= total_elements,
            },
            items,
        }
    }

    /// Map items while preserving page_info (Domain->DTO mapping convenience)
    pub fn map_items<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page_info: self.page_info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_info_for_middle_page() {
        let page = Page::new(vec![4, 5, 6], 3, 3, 10);
        assert_eq!(page.page_info.total_pages, 4);
        assert_eq!(page.page_info.number_of_elements, 3);
        assert!(!page.page_info.first);
        assert!(!page.page_info.last);
    }

    #[test]
    fn page_info_for_last_page() {
        let page = Page::new(vec![10], 9, 3, 10);
        assert!(page.page_info.last);
        assert_eq!(page.map_items(|n| n * 2).items, vec![20]);
    }

    #[test]
    fn empty_page_is_first_and_last() {
        let page: Page<u8> = Page::new(Vec::new(), 0, 3, 0);
        assert!(page.page_info.first);
        assert!(page.page_info.last);
        assert_eq!(page.page_info.total_pages, 0);
    }
}
