use serde::Serialize;

/// Envelope for paginated listings.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total_items: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub page_size: i64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total_items: i64, page: i64, page_size: i64) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            (total_items + page_size - 1) / page_size
        };

        Self {
            data,
            total_items,
            total_pages,
            current_page: page,
            page_size,
        }
    }

    /// Paginates an already-merged in-memory result set, as used by the
    /// archived view where two tables are combined before slicing.
    pub fn slice(items: Vec<T>, page: i64, page_size: i64) -> Self {
        let total_items = items.len() as i64;
        let start = ((page - 1) * page_size).max(0) as usize;

        let data: Vec<T> = items
            .into_iter()
            .skip(start)
            .take(page_size.max(0) as usize)
            .collect();

        Self::new(data, total_items, page, page_size)
    }
}

/// Normalizes a requested page number; anything below 1 becomes 1.
pub fn requested_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_returns_the_requested_window() {
        let page = PaginatedResponse::slice((1..=14).collect::<Vec<i32>>(), 2, 6);

        assert_eq!(page.data, vec![7, 8, 9, 10, 11, 12]);
        assert_eq!(page.total_items, 14);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.current_page, 2);
    }

    #[test]
    fn slice_past_the_end_is_empty() {
        let page = PaginatedResponse::slice(vec![1, 2, 3], 5, 10);

        assert!(page.data.is_empty());
        assert_eq!(page.total_items, 3);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = PaginatedResponse::<i32>::new(vec![], 21, 1, 20);
        assert_eq!(page.total_pages, 2);

        let page = PaginatedResponse::<i32>::new(vec![], 20, 1, 20);
        assert_eq!(page.total_pages, 1);

        let page = PaginatedResponse::<i32>::new(vec![], 0, 1, 20);
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn page_numbers_below_one_are_clamped() {
        assert_eq!(requested_page(None), 1);
        assert_eq!(requested_page(Some(0)), 1);
        assert_eq!(requested_page(Some(-3)), 1);
        assert_eq!(requested_page(Some(4)), 4);
    }
}
