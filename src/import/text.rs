use std::{fs, path::Path};

use crate::book::PagedBook;

use super::ImportError;

/// Characters per page of a plain-text document.
pub const PAGE_CHARS: usize = 2000;

/// Cuts `text` into consecutive pages of [`PAGE_CHARS`] characters; the last
/// page may be shorter and an empty text has no pages.
pub fn paginate_text(text: &str) -> PagedBook {
    let starts: Vec<usize> = text
        .char_indices()
        .step_by(PAGE_CHARS)
        .map(|(offset, _)| offset)
        .collect();

    let pages = starts
        .iter()
        .enumerate()
        .map(|(page, &start)| {
            let end = starts.get(page + 1).copied().unwrap_or(text.len());
            text[start..end].to_string()
        })
        .collect();

    PagedBook::new(pages)
}

pub fn paginate_file(path: &Path) -> Result<PagedBook, ImportError> {
    let bytes = fs::read(path).map_err(|err| ImportError::Io(path.to_path_buf(), err))?;
    let text = String::from_utf8_lossy(&bytes).replace("\r\n", "\n");
    Ok(paginate_text(&text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_lengths(book: &PagedBook) -> Vec<usize> {
        book.pages().map(|(_, text)| text.chars().count()).collect()
    }

    #[test]
    fn empty_text_has_no_pages() {
        assert!(paginate_text("").is_empty());
    }

    #[test]
    fn page_count_is_ceiling_of_length() {
        for length in [1, 1999, 2000, 2001, 4000, 6001] {
            let book = paginate_text(&"x".repeat(length));
            assert_eq!(book.page_count(), length.div_ceil(PAGE_CHARS), "length {length}");
        }
    }

    #[test]
    fn only_the_last_page_is_short() {
        let book = paginate_text(&"x".repeat(4500));
        assert_eq!(page_lengths(&book), vec![2000, 2000, 500]);
    }

    #[test]
    fn pages_concatenate_back_to_the_text() {
        let text: String = "Once upon a café, naïve señor. ".repeat(300);
        let book = paginate_text(&text);
        let joined: String = book.pages().map(|(_, page)| page).collect();
        assert_eq!(joined, text);
    }

    #[test]
    fn counts_characters_not_bytes() {
        let text = "é".repeat(2001);
        let book = paginate_text(&text);
        assert_eq!(page_lengths(&book), vec![2000, 1]);
    }

    #[test]
    fn normalises_windows_line_endings() {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), "one\r\ntwo\r\n").unwrap();
        let book = paginate_file(file.path()).unwrap();
        assert_eq!(book.page(0).unwrap(), "one\ntwo\n");
    }
}
