//! Form components for maud templates.
//!
//! The post editor and the list search box are built from these.

use maud::{html, Markup, Render};

/// A form container element.
#[derive(Debug)]
pub struct Form<'a> {
    /// Form action URL
    pub action: &'a str,
    /// HTTP method ("get" or "post")
    pub method: &'a str,
    /// Form content (inputs, buttons, etc.)
    pub content: Markup,
    /// Optional CSS class
    pub class: Option<&'a str>,
    /// Optional form ID
    pub id: Option<&'a str>,
    /// Enable multipart/form-data encoding
    pub multipart: bool,
}

impl<'a> Form<'a> {
    /// Create a new form with the given action and method.
    #[must_use]
    pub fn new(action: &'a str, method: &'a str, content: Markup) -> Self {
        Self {
            action,
            method,
            content,
            class: None,
            id: None,
            multipart: false,
        }
    }

    /// Create a POST form.
    #[must_use]
    pub fn post(action: &'a str, content: Markup) -> Self {
        Self::new(action, "post", content)
    }

    /// Create a GET form.
    #[must_use]
    pub fn get(action: &'a str, content: Markup) -> Self {
        Self::new(action, "get", content)
    }

    #[must_use]
    pub fn class(mut self, class: &'a str) -> Self {
        self.class = Some(class);
        self
    }

    #[must_use]
    pub fn id(mut self, id: &'a str) -> Self {
        self.id = Some(id);
        self
    }

    /// Enable multipart/form-data encoding (for file uploads).
    #[must_use]
    pub fn multipart(mut self) -> Self {
        self.multipart = true;
        self
    }
}

impl Render for Form<'_> {
    fn render(&self) -> Markup {
        html! {
            form
                action=(self.action)
                method=(self.method)
                class=[self.class]
                id=[self.id]
                enctype=[self.multipart.then_some("multipart/form-data")]
            {
                (self.content)
            }
        }
    }
}

/// An input element.
#[derive(Debug, Clone)]
pub struct Input<'a> {
    pub name: &'a str,
    /// Input type ("text", "search", "hidden", ...)
    pub r#type: &'a str,
    pub value: Option<&'a str>,
    pub placeholder: Option<&'a str>,
    pub required: bool,
    pub id: Option<&'a str>,
    pub class: Option<&'a str>,
}

impl<'a> Input<'a> {
    /// Create a new input with the given name and type.
    #[must_use]
    pub fn new(name: &'a str, r#type: &'a str) -> Self {
        Self {
            name,
            r#type,
            value: None,
            placeholder: None,
            required: false,
            id: None,
            class: None,
        }
    }

    #[must_use]
    pub fn text(name: &'a str) -> Self {
        Self::new(name, "text")
    }

    #[must_use]
    pub fn search(name: &'a str) -> Self {
        Self::new(name, "search")
    }

    /// Hidden input carrying `value`.
    #[must_use]
    pub fn hidden(name: &'a str, value: &'a str) -> Self {
        Self::new(name, "hidden").value(value)
    }

    #[must_use]
    pub fn value(mut self, value: &'a str) -> Self {
        self.value = Some(value);
        self
    }

    /// Set the value if Some.
    #[must_use]
    pub fn value_opt(mut self, value: Option<&'a str>) -> Self {
        self.value = value;
        self
    }

    #[must_use]
    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn id(mut self, id: &'a str) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn class(mut self, class: &'a str) -> Self {
        self.class = Some(class);
        self
    }
}

impl Render for Input<'_> {
    fn render(&self) -> Markup {
        html! {
            input
                type=(self.r#type)
                name=(self.name)
                value=[self.value]
                placeholder=[self.placeholder]
                required[self.required]
                id=[self.id]
                class=[self.class];
        }
    }
}

/// A textarea element.
#[derive(Debug)]
pub struct TextArea<'a> {
    pub name: &'a str,
    pub value: Option<&'a str>,
    pub placeholder: Option<&'a str>,
    /// Number of visible rows
    pub rows: Option<u32>,
    pub required: bool,
    pub id: Option<&'a str>,
}

impl<'a> TextArea<'a> {
    #[must_use]
    pub fn new(name: &'a str) -> Self {
        Self {
            name,
            value: None,
            placeholder: None,
            rows: None,
            required: false,
            id: None,
        }
    }

    #[must_use]
    pub fn value_opt(mut self, value: Option<&'a str>) -> Self {
        self.value = value;
        self
    }

    #[must_use]
    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    #[must_use]
    pub fn rows(mut self, rows: u32) -> Self {
        self.rows = Some(rows);
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn id(mut self, id: &'a str) -> Self {
        self.id = Some(id);
        self
    }
}

impl Render for TextArea<'_> {
    fn render(&self) -> Markup {
        html! {
            textarea
                name=(self.name)
                placeholder=[self.placeholder]
                rows=[self.rows]
                required[self.required]
                id=[self.id]
            {
                @if let Some(value) = self.value {
                    (value)
                }
            }
        }
    }
}

/// A file picker. Only meaningful inside a multipart [`Form`].
#[derive(Debug)]
pub struct FileInput<'a> {
    pub name: &'a str,
    /// Comma-separated list of accepted extensions or MIME types
    pub accept: Option<&'a str>,
    pub id: Option<&'a str>,
}

impl<'a> FileInput<'a> {
    #[must_use]
    pub fn new(name: &'a str) -> Self {
        Self {
            name,
            accept: None,
            id: None,
        }
    }

    #[must_use]
    pub fn accept(mut self, accept: &'a str) -> Self {
        self.accept = Some(accept);
        self
    }

    #[must_use]
    pub fn id(mut self, id: &'a str) -> Self {
        self.id = Some(id);
        self
    }
}

impl Render for FileInput<'_> {
    fn render(&self) -> Markup {
        html! {
            input type="file" name=(self.name) accept=[self.accept] id=[self.id];
        }
    }
}

/// A form group container for label + input + help text.
#[derive(Debug)]
pub struct FormGroup<'a> {
    pub label: &'a str,
    /// Input ID (also used for label's `for` attribute)
    pub id: &'a str,
    pub input: Markup,
    pub help: Option<&'a str>,
}

impl<'a> FormGroup<'a> {
    #[must_use]
    pub fn new(label: &'a str, id: &'a str, input: Markup) -> Self {
        Self {
            label,
            id,
            input,
            help: None,
        }
    }

    #[must_use]
    pub fn help(mut self, help: &'a str) -> Self {
        self.help = Some(help);
        self
    }
}

impl Render for FormGroup<'_> {
    fn render(&self) -> Markup {
        html! {
            div class="form-group" {
                label for=(self.id) { (self.label) }
                (self.input)
                @if let Some(help) = self.help {
                    small { (help) }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multipart_post_form() {
        let form = Form::post("/create", html! { "body" })
            .id("post-form")
            .multipart();
        let html = form.render().into_string();

        assert!(html.contains(r#"action="/create""#));
        assert!(html.contains(r#"method="post""#));
        assert!(html.contains(r#"enctype="multipart/form-data""#));
        assert!(html.contains(r#"id="post-form""#));
    }

    #[test]
    fn test_get_form_has_no_enctype() {
        let html = Form::get("/", html! {}).render().into_string();
        assert!(html.contains(r#"method="get""#));
        assert!(!html.contains("enctype"));
    }

    #[test]
    fn test_input_escapes_value() {
        let html = Input::text("title")
            .value(r#"Q3 "final" <draft>"#)
            .required()
            .render()
            .into_string();

        assert!(html.contains(r#"value="Q3 &quot;final&quot; &lt;draft&gt;""#));
        assert!(html.contains("required"));
    }

    #[test]
    fn test_hidden_input() {
        let html = Input::hidden("excelData", "{}").id("excel-data").render().into_string();
        assert!(html.contains(r#"type="hidden""#));
        assert!(html.contains(r#"name="excelData""#));
        assert!(html.contains(r#"value="{}""#));
    }

    #[test]
    fn test_textarea_content() {
        let html = TextArea::new("content")
            .value_opt(Some("line one\nline <two>"))
            .rows(8)
            .render()
            .into_string();
        assert!(html.contains(r#"rows="8""#));
        assert!(html.contains("line one\nline &lt;two&gt;</textarea>"));
    }

    #[test]
    fn test_file_input_and_group() {
        let input = FileInput::new("sheetFile").accept(".csv,text/csv").id("sheet-file");
        let html = FormGroup::new("Import CSV", "sheet-file", input.render())
            .help("Replaces the current sheet.")
            .render()
            .into_string();

        assert!(html.contains(r#"type="file""#));
        assert!(html.contains(r#"accept=".csv,text/csv""#));
        assert!(html.contains(r#"<label for="sheet-file">Import CSV</label>"#));
        assert!(html.contains("<small>Replaces the current sheet.</small>"));
    }
}
