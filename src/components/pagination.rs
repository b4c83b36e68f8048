//! Pagination component for the post list.
//!
//! Renders previous/next links and a window of page numbers, preserving the
//! active keyword search in every link.

use maud::{html, Markup, Render};
use urlencoding::encode;

/// Pagination controls.
///
/// Displays: Prev, 1, ..., current-2 ..= current+2, ..., last, Next.
/// Pages are 1-based, matching the API. Renders nothing for a single page.
#[derive(Debug, Clone)]
pub struct Pagination {
    /// Current page number (1-based)
    pub current_page: i64,
    pub total_pages: i64,
    /// Base URL for page links (query params will be appended)
    pub base_url: String,
    /// Keyword filter to preserve in links
    pub keyword: Option<String>,
}

impl Pagination {
    #[must_use]
    pub fn new(current_page: i64, total_pages: i64, base_url: &str) -> Self {
        Self {
            current_page,
            total_pages,
            base_url: base_url.to_string(),
            keyword: None,
        }
    }

    /// Keep a keyword search active across page links.
    #[must_use]
    pub fn with_keyword(mut self, keyword: Option<&str>) -> Self {
        self.keyword = keyword.map(String::from);
        self
    }

    /// URL for `page`; page 1 carries no `page` parameter.
    fn build_url(&self, page: i64) -> String {
        let mut params = Vec::new();

        if page > 1 {
            params.push(format!("page={page}"));
        }

        if let Some(ref keyword) = self.keyword {
            params.push(format!("keyword={}", encode(keyword)));
        }

        if params.is_empty() {
            self.base_url.clone()
        } else {
            format!("{}?{}", self.base_url, params.join("&"))
        }
    }

    #[must_use]
    pub fn should_display(&self) -> bool {
        self.total_pages > 1
    }
}

impl Render for Pagination {
    fn render(&self) -> Markup {
        if !self.should_display() {
            return html! {};
        }

        let total = self.total_pages;
        // A page past the end still links back into range.
        let current = self.current_page.clamp(1, total + 1);
        let start = (current - 2).max(1);
        let end = (current + 2).min(total);

        html! {
            nav class="pagination" {
                @if current > 1 {
                    a href=(self.build_url((current - 1).min(total))) { "\u{00ab} Previous" }
                } @else {
                    span class="disabled" { "\u{00ab} Previous" }
                }

                @if start > 1 {
                    a href=(self.build_url(1)) { "1" }
                    @if start > 2 {
                        span { "..." }
                    }
                }

                @for page in start..=end {
                    @if page == current {
                        span class="current" { (page) }
                    } @else {
                        a href=(self.build_url(page)) { (page) }
                    }
                }

                @if end < total {
                    @if end < total - 1 {
                        span { "..." }
                    }
                    a href=(self.build_url(total)) { (total) }
                }

                @if current < total {
                    a href=(self.build_url(current + 1)) { "Next \u{00bb}" }
                } @else {
                    span class="disabled" { "Next \u{00bb}" }
                }
            }
        }
    }
}
