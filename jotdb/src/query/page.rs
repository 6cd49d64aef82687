use crate::collection::Document;

/// One page of query results.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Documents of this page.
    pub data: Vec<Document>,
    /// Number of matching documents across all pages.
    pub total: usize,
    pub per_page: usize,
    pub current_page: usize,
    /// At least 1, even when nothing matches.
    pub last_page: usize,
    /// 1-based position of the first item on this page, `None` when empty.
    pub from: Option<usize>,
    /// 1-based position of the last item on this page, `None` when empty.
    pub to: Option<usize>,
    pub has_more_pages: bool,
    pub next_page: Option<usize>,
    pub prev_page: Option<usize>,
}

impl Page {
    pub(crate) fn new(data: Vec<Document>, total: usize, page: usize, per_page: usize) -> Self {
        let last_page = total.div_ceil(per_page).max(1);
        let offset = (page - 1) * per_page;
        let (from, to) = if data.is_empty() {
            (None, None)
        } else {
            (Some(offset + 1), Some(offset + data.len()))
        };
        let has_more_pages = page < last_page;

        Page {
            data,
            total,
            per_page,
            current_page: page,
            last_page,
            from,
            to,
            has_more_pages,
            next_page: has_more_pages.then_some(page + 1),
            prev_page: (page > 1).then(|| page - 1),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
