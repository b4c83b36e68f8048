//! Table components for maud templates.
//!
//! Used for the post list, the post metadata block and the spreadsheet
//! preview on the detail page.

use maud::{html, Markup, Render};

/// Table variant determines the CSS class applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TableVariant {
    #[default]
    Default,
    /// Post listing (`.posts-table`)
    Posts,
    /// Spreadsheet cell preview (`.sheet-preview`)
    Sheet,
}

impl TableVariant {
    #[must_use]
    pub fn class(&self) -> Option<&'static str> {
        match self {
            TableVariant::Default => None,
            TableVariant::Posts => Some("posts-table"),
            TableVariant::Sheet => Some("sheet-preview"),
        }
    }
}

/// A table element with headers and rows.
#[derive(Debug)]
pub struct Table<'a> {
    pub variant: TableVariant,
    /// Column headers
    pub headers: Vec<&'a str>,
    /// Pre-rendered row content
    pub rows: Vec<Markup>,
    pub id: Option<&'a str>,
}

impl<'a> Table<'a> {
    #[must_use]
    pub fn new(headers: Vec<&'a str>) -> Self {
        Self {
            variant: TableVariant::Default,
            headers,
            rows: Vec::new(),
            id: None,
        }
    }

    #[must_use]
    pub fn variant(mut self, variant: TableVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Add multiple pre-rendered rows.
    #[must_use]
    pub fn rows(mut self, rows: Vec<Markup>) -> Self {
        self.rows = rows;
        self
    }

    #[must_use]
    pub fn id(mut self, id: &'a str) -> Self {
        self.id = Some(id);
        self
    }
}

impl Render for Table<'_> {
    fn render(&self) -> Markup {
        html! {
            table class=[self.variant.class()] id=[self.id] {
                @if !self.headers.is_empty() {
                    thead {
                        tr {
                            @for header in &self.headers {
                                th { (header) }
                            }
                        }
                    }
                }
                tbody {
                    @for row in &self.rows {
                        (row)
                    }
                }
            }
        }
    }
}

/// A table row from plain text cells.
#[must_use]
pub fn simple_row<S: AsRef<str>>(cells: &[S]) -> Markup {
    html! {
        tr {
            @for cell in cells {
                td { (cell.as_ref()) }
            }
        }
    }
}

/// A table row from pre-rendered cells.
#[must_use]
pub fn markup_row(cells: Vec<Markup>) -> Markup {
    html! {
        tr {
            @for cell in cells {
                td { (cell) }
            }
        }
    }
}

/// A key-value table (two columns: label and value).
#[derive(Debug, Default)]
pub struct KeyValueTable<'a> {
    pub items: Vec<(&'a str, Markup)>,
}

impl<'a> KeyValueTable<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn item(mut self, key: &'a str, value: &str) -> Self {
        self.items.push((key, html! { (value) }));
        self
    }
}

impl Render for KeyValueTable<'_> {
    fn render(&self) -> Markup {
        html! {
            table {
                tbody {
                    @for (key, value) in &self.items {
                        tr {
                            th { (*key) }
                            td { (value) }
                        }
                    }
                }
            }
        }
    }
}

/// A responsive wrapper for tables that enables horizontal scrolling on small screens.
#[derive(Debug)]
pub struct ResponsiveTable {
    pub table: Markup,
}

impl ResponsiveTable {
    #[must_use]
    pub fn new(table: Markup) -> Self {
        Self { table }
    }
}

impl Render for ResponsiveTable {
    fn render(&self) -> Markup {
        html! {
            div style="overflow-x: auto;" {
                (self.table)
            }
        }
    }
}
