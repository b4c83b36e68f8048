//! Alert components for form errors, notices and empty lists.

use maud::{html, Markup, Render};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertVariant {
    Success,
    Error,
    Info,
}

impl AlertVariant {
    /// Get the CSS class for the alert article element.
    #[must_use]
    pub const fn article_class(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

/// An alert message component.
///
/// Renders as a styled article element. Error alerts carry `role="alert"` so
/// screen readers announce a rejected form submission.
///
/// # Example
///
/// ```ignore
/// use crate::components::alert::Alert;
///
/// let alert = Alert::error("Title and content are required.")
///     .with_title("Could not save post");
/// ```
#[derive(Debug, Clone)]
pub struct Alert<'a> {
    pub variant: AlertVariant,
    pub title: Option<&'a str>,
    pub message: &'a str,
}

impl<'a> Alert<'a> {
    #[must_use]
    pub const fn new(variant: AlertVariant, message: &'a str) -> Self {
        Self {
            variant,
            title: None,
            message,
        }
    }

    #[must_use]
    pub const fn success(message: &'a str) -> Self {
        Self::new(AlertVariant::Success, message)
    }

    #[must_use]
    pub const fn error(message: &'a str) -> Self {
        Self::new(AlertVariant::Error, message)
    }

    #[must_use]
    pub const fn info(message: &'a str) -> Self {
        Self::new(AlertVariant::Info, message)
    }

    /// Add a bold title before the message.
    #[must_use]
    pub const fn with_title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }
}

impl Render for Alert<'_> {
    fn render(&self) -> Markup {
        let class = self.variant.article_class();
        let role = (self.variant == AlertVariant::Error).then_some("alert");

        html! {
            article class=(class) role=[role] {
                @if let Some(title) = self.title {
                    strong { (title) }
                    " "
                }
                (self.message)
            }
        }
    }
}

/// Placeholder shown when a list has nothing to display.
#[derive(Debug, Clone, Copy)]
pub struct EmptyState<'a> {
    pub message: &'a str,
}

impl<'a> EmptyState<'a> {
    #[must_use]
    pub const fn new(message: &'a str) -> Self {
        Self { message }
    }

    /// The board has no posts at all.
    #[must_use]
    pub const fn no_posts() -> Self {
        Self::new("No posts yet.")
    }

    /// A keyword search matched nothing.
    #[must_use]
    pub const fn no_results() -> Self {
        Self::new("No posts match your search.")
    }
}

impl Render for EmptyState<'_> {
    fn render(&self) -> Markup {
        html! {
            p class="empty-state" { (self.message) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_success() {
        let html = Alert::success("Post created successfully.").render().into_string();
        assert_eq!(html, r#"<article class="success">Post created successfully.</article>"#);
    }

    #[test]
    fn test_alert_error_with_title() {
        let html = Alert::error("Title and content are required.")
            .with_title("Could not save post")
            .render()
            .into_string();
        assert!(html.contains(r#"class="error""#));
        assert!(html.contains(r#"role="alert""#));
        assert!(html.contains("<strong>Could not save post</strong>"));
        assert!(html.contains("Title and content are required."));
    }

    #[test]
    fn test_alert_info_has_no_role() {
        let html = Alert::info("FYI").render().into_string();
        assert!(html.contains(r#"class="info""#));
        assert!(!html.contains("role="));
    }

    #[test]
    fn test_empty_states() {
        assert!(EmptyState::no_posts().render().into_string().contains("No posts yet."));
        assert!(EmptyState::no_results()
            .render()
            .into_string()
            .contains("No posts match your search."));
    }
}
