//! Create and edit form for a post, with the embedded spreadsheet editor.
//!
//! The editor is a third-party widget loaded from a configurable script URL.
//! The page hands it the stored workbook through the hidden `excelData` field
//! and writes `toJSON()` back into that field when the form is submitted.
//! Without the widget the field is posted back unchanged, so an edit never
//! drops an existing workbook.

use maud::{html, Markup, PreEscaped, Render};

use crate::components::{
    Alert, BaseLayout, Button, FileInput, Form, FormGroup, Input, TextArea,
};

const SHEET_EDITOR_SCRIPT: &str = r#"(function () {
    var host = document.getElementById('sheet-host');
    var field = document.getElementById('excel-data');
    var form = document.getElementById('post-form');
    if (!host || !field || !form) { return; }
    var Sheets = window.GC && GC.Spread && GC.Spread.Sheets;
    if (!Sheets) {
        host.textContent = 'Spreadsheet editor is not available. Existing data is kept; upload a CSV file to replace it.';
        host.style.height = 'auto';
        return;
    }
    if (host.dataset.licenseKey) { Sheets.LicenseKey = host.dataset.licenseKey; }
    var spread = new Sheets.Workbook(host);
    if (field.value) {
        try { spread.fromJSON(JSON.parse(field.value)); }
        catch (e) { console.error('Failed to load spreadsheet data', e); }
    }
    form.addEventListener('submit', function () {
        try { field.value = JSON.stringify(spread.toJSON()); }
        catch (e) { console.error('Failed to read spreadsheet data', e); }
    });
})();"#;

/// Where the spreadsheet widget comes from.
#[derive(Debug, Clone, Copy, Default)]
pub struct SheetEditor<'a> {
    pub script_url: Option<&'a str>,
    pub license_key: Option<&'a str>,
}

/// Parameters for rendering the create or edit form.
#[derive(Debug, Clone, Default)]
pub struct PostFormParams<'a> {
    /// `None` for a new post
    pub post_id: Option<i64>,
    pub title: &'a str,
    pub content: &'a str,
    /// Workbook JSON to seed the editor with
    pub excel_data: Option<&'a str>,
    /// Message from a rejected submission
    pub error: Option<&'a str>,
    pub editor: SheetEditor<'a>,
}

impl<'a> PostFormParams<'a> {
    /// Empty form for a new post.
    #[must_use]
    pub fn create(editor: SheetEditor<'a>) -> Self {
        Self {
            editor,
            ..Self::default()
        }
    }

    /// Form for editing post `id`.
    #[must_use]
    pub fn edit(id: i64, editor: SheetEditor<'a>) -> Self {
        Self {
            post_id: Some(id),
            editor,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn values(mut self, title: &'a str, content: &'a str, excel_data: Option<&'a str>) -> Self {
        self.title = title;
        self.content = content;
        self.excel_data = excel_data;
        self
    }

    #[must_use]
    pub fn error(mut self, error: &'a str) -> Self {
        self.error = Some(error);
        self
    }
}

#[must_use]
pub fn render_post_form_page(params: &PostFormParams<'_>) -> Markup {
    let (heading, action, submit_label, cancel_href) = match params.post_id {
        Some(id) => (
            "Edit Post",
            format!("/edit/{id}"),
            "Save Changes",
            format!("/board/{id}"),
        ),
        None => ("New Post", "/create".to_string(), "Create Post", "/".to_string()),
    };

    let fields = html! {
        (FormGroup::new("Title", "title",
            Input::text("title").value(params.title).id("title").required().render()))
        (FormGroup::new("Content", "content",
            TextArea::new("content").value_opt(Some(params.content)).id("content").rows(8).required().render()))

        fieldset class="sheet-editor" {
            legend { "Spreadsheet" }
            div id="sheet-host" data-license-key=[params.editor.license_key] {}
            (Input::hidden("excelData", params.excel_data.unwrap_or("")).id("excel-data"))
            (FormGroup::new("Import CSV", "sheet-file",
                FileInput::new("sheetFile").accept(".csv,text/csv").id("sheet-file").render())
                .help("Replaces the spreadsheet with the file's contents when saved."))
        }

        div class="actions" {
            (Button::primary(submit_label).r#type("submit"))
            (Button::outline("Cancel").href(&cancel_href))
        }
    };

    let content = html! {
        h1 { (heading) }
        @if let Some(error) = params.error {
            (Alert::error(error).with_title("Could not save post."))
        }
        (Form::post(&action, fields).id("post-form").multipart())
        script { (PreEscaped(SHEET_EDITOR_SCRIPT)) }
    };

    let mut layout = BaseLayout::new(heading);
    if let Some(src) = params.editor.script_url {
        layout = layout.with_script(src);
    }
    layout.render(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_form() {
        let html = render_post_form_page(&PostFormParams::create(SheetEditor::default())).into_string();

        assert!(html.contains("<h1>New Post</h1>"));
        assert!(html.contains(r#"action="/create""#));
        assert!(html.contains(r#"enctype="multipart/form-data""#));
        assert!(html.contains(r#"name="excelData" value="""#));
        assert!(html.contains(r#"name="sheetFile""#));
        assert!(html.contains("Create Post"));
        assert!(!html.contains("role=\"alert\""));
        assert!(!html.contains("data-license-key"));
    }

    #[test]
    fn test_edit_form_keeps_values_and_error() {
        let editor = SheetEditor {
            script_url: Some("https://cdn.example.com/spread.js"),
            license_key: Some("KEY-123"),
        };
        let params = PostFormParams::edit(4, editor)
            .values("Budget", "Numbers <draft>", Some(r#"{"sheets":{}}"#))
            .error("Title and content are required.");
        let html = render_post_form_page(&params).into_string();

        assert!(html.contains("<h1>Edit Post</h1>"));
        assert!(html.contains(r#"action="/edit/4""#));
        assert!(html.contains(r#"href="/board/4""#));
        assert!(html.contains(r#"value="Budget""#));
        assert!(html.contains("Numbers &lt;draft&gt;</textarea>"));
        assert!(html.contains(r#"value="{&quot;sheets&quot;:{}}""#));
        assert!(html.contains("Title and content are required."));
        assert!(html.contains(r#"<script src="https://cdn.example.com/spread.js"></script>"#));
        assert!(html.contains(r#"data-license-key="KEY-123""#));
    }

    #[test]
    fn test_editor_script_is_not_escaped() {
        let html = render_post_form_page(&PostFormParams::create(SheetEditor::default())).into_string();
        assert!(html.contains("spread.toJSON()"));
        assert!(html.contains("if (!host || !field || !form)"));
    }
}
