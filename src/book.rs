use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("page {index} not found, the book has {page_count} pages")]
pub struct PageNotFound {
    pub index: i64,
    pub page_count: usize,
}

/// Ordered page texts of one document, indexed from zero.
///
/// Pages are stored contiguously, so the page count is always the number of
/// entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagedBook {
    pages: Vec<String>,
}

impl PagedBook {
    pub fn new(pages: Vec<String>) -> Self {
        Self { pages }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Looks up a page by a possibly out-of-range cursor.
    pub fn page(&self, index: i64) -> Result<&str, PageNotFound> {
        usize::try_from(index)
            .ok()
            .and_then(|idx| self.pages.get(idx))
            .map(String::as_str)
            .ok_or(PageNotFound {
                index,
                page_count: self.pages.len(),
            })
    }

    pub fn pages(&self) -> impl Iterator<Item = (usize, &str)> {
        self.pages
            .iter()
            .enumerate()
            .map(|(idx, text)| (idx, text.as_str()))
    }
}
