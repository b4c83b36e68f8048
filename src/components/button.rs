//! Button component for the web UI.
//!
//! Provides a configurable button component that renders as either
//! a `<button>` or `<a>` element based on whether an href is provided.

use maud::{html, Markup, Render};

/// Button style variants matching CSS classes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ButtonVariant {
    /// Primary button (default) - `.btn-primary`
    #[default]
    Primary,
    /// Outline button - `.btn.outline`
    Outline,
    /// Danger button - `.btn-danger`
    Danger,
    /// Secondary button - `.btn-secondary`
    Secondary,
}

impl ButtonVariant {
    /// Returns the CSS class(es) for this variant.
    #[must_use]
    pub fn class(&self) -> &'static str {
        match self {
            Self::Primary => "btn btn-primary",
            Self::Outline => "btn outline",
            Self::Danger => "btn btn-danger",
            Self::Secondary => "btn btn-secondary",
        }
    }
}

/// A configurable button component.
///
/// # Example
///
/// ```ignore
/// use crate::components::button::Button;
///
/// let edit = Button::outline("Edit").href("/edit/7");
/// let export = Button::secondary("Download CSV")
///     .href("/board/7/sheet.csv")
///     .download("post-7.csv");
/// let delete = Button::danger("Delete")
///     .r#type("submit")
///     .onclick("return confirm('Delete this post?')");
/// ```
#[derive(Debug, Clone)]
pub struct Button<'a> {
    pub label: &'a str,
    pub variant: ButtonVariant,
    /// Optional href (renders as `<a>` if present)
    pub href: Option<&'a str>,
    /// Button type attribute (for `<button>` elements)
    pub r#type: Option<&'a str>,
    pub id: Option<&'a str>,
    /// JavaScript onclick handler
    pub onclick: Option<&'a str>,
    /// Download attribute (for download links)
    pub download: Option<&'a str>,
}

impl<'a> Button<'a> {
    /// Creates a new button with the given label and variant.
    #[must_use]
    pub fn new(label: &'a str, variant: ButtonVariant) -> Self {
        Self {
            label,
            variant,
            href: None,
            r#type: None,
            id: None,
            onclick: None,
            download: None,
        }
    }

    #[must_use]
    pub fn primary(label: &'a str) -> Self {
        Self::new(label, ButtonVariant::Primary)
    }

    #[must_use]
    pub fn outline(label: &'a str) -> Self {
        Self::new(label, ButtonVariant::Outline)
    }

    #[must_use]
    pub fn danger(label: &'a str) -> Self {
        Self::new(label, ButtonVariant::Danger)
    }

    #[must_use]
    pub fn secondary(label: &'a str) -> Self {
        Self::new(label, ButtonVariant::Secondary)
    }

    /// Sets the href, rendering the button as an `<a>` element.
    #[must_use]
    pub fn href(mut self, href: &'a str) -> Self {
        self.href = Some(href);
        self
    }

    #[must_use]
    pub fn r#type(mut self, r#type: &'a str) -> Self {
        self.r#type = Some(r#type);
        self
    }

    #[must_use]
    pub fn id(mut self, id: &'a str) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn onclick(mut self, onclick: &'a str) -> Self {
        self.onclick = Some(onclick);
        self
    }

    /// Sets the download attribute (suggested filename for download).
    #[must_use]
    pub fn download(mut self, filename: &'a str) -> Self {
        self.download = Some(filename);
        self
    }
}

impl Render for Button<'_> {
    fn render(&self) -> Markup {
        let classes = self.variant.class();

        if let Some(href) = self.href {
            html! {
                a
                    class=(classes)
                    href=(href)
                    id=[self.id]
                    onclick=[self.onclick]
                    download=[self.download]
                {
                    (self.label)
                }
            }
        } else {
            html! {
                button
                    class=(classes)
                    type=(self.r#type.unwrap_or("button"))
                    id=[self.id]
                    onclick=[self.onclick]
                {
                    (self.label)
                }
            }
        }
    }
}
