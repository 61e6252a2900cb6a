//! Paginated preview-image state for the selected device.
//!
//! Holds the ordered URL sequence for the detail view: a fixed-size page
//! window over the thumbnails plus one independently selectable "main"
//! image. Comparison is always on the bare URL — cache-bust tokens are a
//! rendering concern, appended on the way out and stripped on the way in.

use tracing::trace;

/// Thumbnails shown per gallery page.
pub const PAGE_SIZE: usize = 4;

/// Append a cache-bust query parameter to an image URL.
///
/// Registries serve preview images under stable paths, so without the
/// token a browser-style cache would keep showing the previous capture.
pub fn bust(url: &str, token: u64) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}v={token}")
}

/// Remove a `v=` cache-bust parameter added by [`bust`].
pub fn strip_bust(url: &str) -> &str {
    let Some((base, query)) = url.split_once('?') else {
        return url;
    };
    // Only the lone token we append is stripped; URLs with real query
    // strings keep them.
    if query.starts_with("v=") && !query.contains('&') {
        base
    } else {
        url
    }
}

/// Pagination and main-image state over one device's preview URLs.
#[derive(Debug, Clone, Default)]
pub struct Gallery {
    urls: Vec<String>,
    page: usize,
    main: Option<String>,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the URL sequence from a freshly fetched record.
    ///
    /// The page resets to the first. The main image is kept if its URL is
    /// still in the new sequence, otherwise it falls back to the first
    /// URL, or to none when the sequence is empty.
    pub fn load(&mut self, urls: Vec<String>) {
        self.page = 0;
        self.main = match self.main.take() {
            Some(prev) if urls.iter().any(|u| strip_bust(u) == prev) => Some(prev),
            _ => urls.first().map(|u| strip_bust(u).to_owned()),
        };
        trace!(count = urls.len(), "gallery loaded");
        self.urls = urls;
    }

    /// Forget all state (device deselected).
    pub fn clear(&mut self) {
        self.urls.clear();
        self.page = 0;
        self.main = None;
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// Current zero-based page index.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Total pages; never zero, so page arithmetic stays simple even for
    /// an empty gallery (which renders as one empty page).
    pub fn page_count(&self) -> usize {
        self.urls.len().div_ceil(PAGE_SIZE).max(1)
    }

    /// The `current / total` pager label; `0 / 0` when there is nothing
    /// to page through.
    pub fn page_label(&self) -> String {
        if self.urls.is_empty() {
            "0 / 0".into()
        } else {
            format!("{} / {}", self.page + 1, self.page_count())
        }
    }

    /// Advance one page; returns whether the page changed.
    pub fn next_page(&mut self) -> bool {
        if self.page + 1 < self.page_count() {
            self.page += 1;
            true
        } else {
            false
        }
    }

    /// Go back one page; returns whether the page changed.
    pub fn prev_page(&mut self) -> bool {
        if self.page > 0 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// The URLs visible on the current page, in sequence order.
    pub fn window(&self) -> &[String] {
        let start = self.page * PAGE_SIZE;
        let end = (start + PAGE_SIZE).min(self.urls.len());
        if start >= self.urls.len() {
            &[]
        } else {
            &self.urls[start..end]
        }
    }

    /// Promote a thumbnail to the main image. Bust tokens on the incoming
    /// URL are ignored; URLs not in the sequence are too.
    pub fn select_main(&mut self, url: &str) {
        let bare = strip_bust(url);
        if self.urls.iter().any(|u| strip_bust(u) == bare) {
            self.main = Some(bare.to_owned());
        }
    }

    /// The main image URL, if any.
    pub fn main(&self) -> Option<&str> {
        self.main.as_deref()
    }

    /// Whether `url` is the current main image, ignoring bust tokens on
    /// either side.
    pub fn is_main(&self, url: &str) -> bool {
        self.main.as_deref() == Some(strip_bust(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn urls(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("/img/{i}.jpg")).collect()
    }

    #[test]
    fn bust_appends_with_correct_separator() {
        assert_eq!(bust("/img/a.jpg", 7), "/img/a.jpg?v=7");
        assert_eq!(bust("/img/a.jpg?w=64", 7), "/img/a.jpg?w=64&v=7");
    }

    #[test]
    fn strip_bust_only_removes_our_token() {
        assert_eq!(strip_bust("/img/a.jpg?v=123"), "/img/a.jpg");
        assert_eq!(strip_bust("/img/a.jpg"), "/img/a.jpg");
        assert_eq!(strip_bust("/img/a.jpg?w=64&v=1"), "/img/a.jpg?w=64&v=1");
    }

    #[test]
    fn page_counts() {
        let mut g = Gallery::new();
        for (n, pages) in [(0, 1), (1, 1), (4, 1), (5, 2), (9, 3)] {
            g.load(urls(n));
            assert_eq!(g.page_count(), pages, "n = {n}");
        }
    }

    #[test]
    fn empty_gallery_label_and_navigation() {
        let mut g = Gallery::new();
        assert_eq!(g.page_label(), "0 / 0");
        assert!(!g.next_page());
        assert!(!g.prev_page());
        assert!(g.window().is_empty());
        assert_eq!(g.main(), None);
    }

    #[test]
    fn navigation_clamps_at_both_ends() {
        let mut g = Gallery::new();
        g.load(urls(9));

        assert!(!g.prev_page());
        assert!(g.next_page());
        assert!(g.next_page());
        assert!(!g.next_page());
        assert_eq!(g.page(), 2);
        assert_eq!(g.page_label(), "3 / 3");
        // Last page holds the remainder.
        assert_eq!(g.window(), &["/img/8.jpg".to_owned()]);
    }

    #[test]
    fn window_covers_full_pages() {
        let mut g = Gallery::new();
        g.load(urls(5));
        assert_eq!(g.window().len(), 4);
        g.next_page();
        assert_eq!(g.window().len(), 1);
    }

    #[test]
    fn load_defaults_main_to_first_url() {
        let mut g = Gallery::new();
        g.load(urls(3));
        assert_eq!(g.main(), Some("/img/0.jpg"));
    }

    #[test]
    fn load_keeps_main_when_still_present() {
        let mut g = Gallery::new();
        g.load(urls(3));
        g.select_main("/img/2.jpg?v=555");
        assert_eq!(g.main(), Some("/img/2.jpg"));

        // New sequence still contains it — kept.
        g.load(vec!["/img/9.jpg".into(), "/img/2.jpg".into()]);
        assert_eq!(g.main(), Some("/img/2.jpg"));
        assert_eq!(g.page(), 0);

        // Gone from the sequence — falls back to first.
        g.load(urls(2));
        assert_eq!(g.main(), Some("/img/0.jpg"));
    }

    #[test]
    fn select_main_rejects_non_members() {
        let mut g = Gallery::new();
        g.load(urls(2));
        g.select_main("/img/elsewhere.jpg");
        assert_eq!(g.main(), Some("/img/0.jpg"));
    }

    #[test]
    fn is_main_ignores_bust_tokens() {
        let mut g = Gallery::new();
        g.load(urls(2));
        g.select_main("/img/1.jpg");
        assert!(g.is_main("/img/1.jpg?v=42"));
        assert!(!g.is_main("/img/0.jpg?v=42"));
    }

    #[test]
    fn clear_resets_everything() {
        let mut g = Gallery::new();
        g.load(urls(6));
        g.next_page();
        g.clear();
        assert!(g.is_empty());
        assert_eq!(g.page(), 0);
        assert_eq!(g.main(), None);
        assert_eq!(g.page_label(), "0 / 0");
    }
}
