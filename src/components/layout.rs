//! Base layout components for the web UI.
//!
//! This module provides the main page layout structure including
//! the HTML skeleton, navigation, and footer.

use maud::{html, Markup, PreEscaped, DOCTYPE};

/// Critical theme initialization script that runs in <head> to prevent flash of wrong theme.
/// Must be inline (not external) to execute before body renders.
const THEME_INIT_SCRIPT: &str = r#"(function() {
    var theme = localStorage.getItem('theme');
    if (theme) {
        document.documentElement.setAttribute('data-theme', theme);
    } else if (window.matchMedia('(prefers-color-scheme: dark)').matches) {
        document.documentElement.setAttribute('data-theme', 'dark');
    }
})();"#;

/// Site stylesheet. The frontend serves no static files, so it is inlined.
const BASE_STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; line-height: 1.5; }
.container { max-width: 960px; margin: 0 auto; padding: 0 1rem; }
header nav, header nav ul { display: flex; justify-content: space-between; align-items: center; list-style: none; padding: 0; gap: 1rem; }
table { width: 100%; border-collapse: collapse; }
th, td { border-bottom: 1px solid #ddd; padding: .4rem .6rem; text-align: left; }
.sheet-preview td { font-family: ui-monospace, monospace; white-space: pre; }
.btn { display: inline-block; padding: .35rem .9rem; border-radius: 4px; border: 1px solid #888; text-decoration: none; cursor: pointer; background: none; }
.btn-primary { background: #2563eb; border-color: #2563eb; color: #fff; }
.btn-danger { background: #dc2626; border-color: #dc2626; color: #fff; }
.form-group { display: flex; flex-direction: column; margin-bottom: 1rem; }
article.error { border-left: 4px solid #dc2626; padding: .5rem 1rem; }
article.success { border-left: 4px solid #16a34a; padding: .5rem 1rem; }
article.info { border-left: 4px solid #2563eb; padding: .5rem 1rem; }
.pagination { display: flex; gap: .5rem; margin: 1rem 0; }
.pagination .current { font-weight: bold; }
.pagination .disabled { color: #999; }
#sheet-host { height: 420px; border: 1px solid #ccc; }
"#;

/// Base page layout builder.
///
/// # Example
///
/// ```ignore
/// use maud::html;
/// use crate::components::layout::BaseLayout;
///
/// let content = html! { h1 { "Hello World" } };
/// let page = BaseLayout::new("My Page").render(content);
/// ```
#[derive(Debug, Clone)]
pub struct BaseLayout<'a> {
    title: &'a str,
    scripts: Vec<&'a str>,
}

impl<'a> BaseLayout<'a> {
    /// Create a new base layout with the given page title.
    #[must_use]
    pub fn new(title: &'a str) -> Self {
        Self {
            title,
            scripts: Vec::new(),
        }
    }

    /// Load an external script at the end of the body, in call order.
    #[must_use]
    pub fn with_script(mut self, src: &'a str) -> Self {
        self.scripts.push(src);
        self
    }

    /// Render the complete HTML page with the given content.
    ///
    /// The content will be placed inside the `<main class="container">` element.
    #[must_use]
    pub fn render(self, content: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html lang="en" data-theme="light" {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    meta name="color-scheme" content="light dark";
                    title { (self.title) " - Spread Board" }
                    style { (PreEscaped(BASE_STYLE)) }
                    // Inline critical script to prevent theme flicker
                    script { (PreEscaped(THEME_INIT_SCRIPT)) }
                    @for src in &self.scripts {
                        script src=(src) {}
                    }
                }
                body {
                    (Self::render_header())
                    main class="container" {
                        (content)
                    }
                    (Self::render_footer())
                }
            }
        }
    }

    fn render_header() -> Markup {
        html! {
            header class="container" {
                nav {
                    ul {
                        li {
                            a href="/" {
                                strong class="site-logo" { "Spread Board" }
                            }
                        }
                    }
                    ul {
                        li { a href="/" { "Posts" } }
                        li { a href="/create" { "New Post" } }
                    }
                }
            }
        }
    }

    fn render_footer() -> Markup {
        html! {
            footer class="container" {
                small { "Spread Board" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_layout_basic_structure() {
        let content = html! { h1 { "Test Content" } };
        let html = BaseLayout::new("Test Page").render(content).into_string();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<html lang="en" data-theme="light">"#));
        assert!(html.contains(r#"<meta charset="UTF-8">"#));
        assert!(html.contains("<title>Test Page - Spread Board</title>"));
        assert!(html.contains(r#"<main class="container"><h1>Test Content</h1></main>"#));
        assert!(html.contains("localStorage.getItem('theme')"));
    }

    #[test]
    fn test_base_layout_navigation() {
        let html = BaseLayout::new("Nav").render(html! {}).into_string();
        assert!(html.contains(r#"<a href="/">Posts</a>"#));
        assert!(html.contains(r#"<a href="/create">New Post</a>"#));
    }

    #[test]
    fn test_base_layout_scripts_in_order() {
        let html = BaseLayout::new("Scripts")
            .with_script("https://cdn.example.com/sheets.js")
            .with_script("https://cdn.example.com/sheets-io.js")
            .render(html! {})
            .into_string();

        let first = html.find("sheets.js").unwrap();
        let second = html.find("sheets-io.js").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_base_layout_title_is_escaped() {
        let html = BaseLayout::new("<script>").render(html! {}).into_string();
        assert!(html.contains("<title>&lt;script&gt; - Spread Board</title>"));
    }
}
