//! Post detail page: body, metadata, spreadsheet preview and actions.

use maud::{html, Markup, Render};

use super::format_timestamp;
use crate::components::{
    simple_row, Alert, BaseLayout, Button, Form, KeyValueTable, ResponsiveTable, Table,
    TableVariant,
};
use crate::db::Post;
use crate::spreadsheet::Workbook;

/// Rows of the active sheet shown inline; the CSV export has the rest.
const PREVIEW_ROWS: usize = 50;

#[must_use]
pub fn render_detail_page(post: &Post) -> Markup {
    let edit_href = format!("/edit/{}", post.id);
    let delete_action = format!("/board/{}/delete", post.id);
    let created = format_timestamp(&post.created_at);
    let updated = format_timestamp(&post.updated_at);

    let content = html! {
        article class="post" {
            h1 { (post.title) }
            (KeyValueTable::new()
                .item("No.", &post.id.to_string())
                .item("Created", &created)
                .item("Updated", &updated))
            div class="post-content" {
                @for line in post.content.lines() {
                    p { (line) }
                }
            }
        }

        section class="sheet" {
            h2 { "Spreadsheet" }
            (render_sheet_section(post))
        }

        div class="actions" {
            (Button::outline("Back to list").href("/"))
            (Button::primary("Edit").href(&edit_href))
            (Form::post(&delete_action, html! {
                (Button::danger("Delete")
                    .r#type("submit")
                    .onclick("return confirm('Delete this post?')"))
            })
            .class("inline"))
        }
    };

    BaseLayout::new(&post.title).render(content)
}

fn render_sheet_section(post: &Post) -> Markup {
    let Some(value) = post.excel_data() else {
        return html! { p { "No spreadsheet attached." } };
    };

    let workbook = match Workbook::from_value(value.clone()) {
        Ok(workbook) => workbook,
        Err(e) => {
            return html! { (Alert::error(&e.to_string()).with_title("Unreadable spreadsheet")) };
        }
    };

    let rows = workbook.preview_rows(PREVIEW_ROWS + 1);
    let truncated = rows.len() > PREVIEW_ROWS;
    let csv_href = format!("/board/{}/sheet.csv", post.id);
    let json_href = format!("/board/{}/sheet.json", post.id);
    let csv_name = format!("post-{}.csv", post.id);
    let json_name = format!("post-{}.json", post.id);

    html! {
        p class="sheet-meta" {
            @if let Some(name) = workbook.active_sheet_name() {
                "Sheet " strong { (name) }
            }
            " (" (workbook.sheet_count()) " in workbook)"
        }
        @if rows.is_empty() {
            p { "The active sheet has no values." }
        } @else {
            (ResponsiveTable::new(
                Table::new(vec![])
                    .variant(TableVariant::Sheet)
                    .rows(
                        rows.iter()
                            .take(PREVIEW_ROWS)
                            .map(|row| simple_row(row.as_slice()))
                            .collect(),
                    )
                    .render()
            ))
            @if truncated {
                p { small { "Showing the first " (PREVIEW_ROWS) " rows." } }
            }
        }
        div class="actions" {
            (Button::secondary("Download CSV").href(&csv_href).download(&csv_name))
            (Button::secondary("Download JSON").href(&json_href).download(&json_name))
        }
    }
}
