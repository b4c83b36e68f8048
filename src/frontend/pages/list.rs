//! Post list page with keyword search and pagination.

use maud::{html, Markup, Render};

use super::format_timestamp;
use crate::components::{
    markup_row, BaseLayout, Button, EmptyState, Form, Input, Pagination, ResponsiveTable, Table,
    TableVariant,
};
use crate::db::{PageSummary, Post};

#[derive(Debug, Clone, Copy)]
pub struct ListPageParams<'a> {
    pub posts: &'a [Post],
    pub pagination: &'a PageSummary,
    /// Active title filter, already trimmed
    pub keyword: Option<&'a str>,
}

#[must_use]
pub fn render_list_page(params: &ListPageParams<'_>) -> Markup {
    let summary = params.pagination;

    let content = html! {
        h1 { "Posts" }

        div class="toolbar" {
            (render_search_form(params.keyword))
            (Button::primary("New Post").href("/create"))
        }

        p class="result-count" {
            @if let Some(keyword) = params.keyword {
                (summary.total_count) " posts with " strong { (keyword) } " in the title"
            } @else {
                (summary.total_count) " posts"
            }
        }

        @if params.posts.is_empty() {
            @if params.keyword.is_some() {
                (EmptyState::no_results())
            } @else if summary.total_count > 0 {
                (EmptyState::new("This page is empty."))
            } @else {
                (EmptyState::no_posts())
            }
        } @else {
            (ResponsiveTable::new(render_posts_table(params.posts).render()))
        }

        (Pagination::new(summary.page, summary.total_pages, "/").with_keyword(params.keyword))
    };

    BaseLayout::new("Posts").render(content)
}

fn render_search_form(keyword: Option<&str>) -> Markup {
    let fields = html! {
        (Input::search("keyword")
            .value_opt(keyword)
            .placeholder("Search titles")
            .id("keyword"))
        (Button::outline("Search").r#type("submit"))
    };
    Form::get("/", fields).class("search-form").render()
}

fn render_posts_table(posts: &[Post]) -> Table<'static> {
    let rows = posts
        .iter()
        .map(|post| {
            let href = format!("/board/{}", post.id);
            markup_row(vec![
                html! { (post.id) },
                html! { a href=(href) { (post.title) } },
                html! {
                    @if post.excel_data.is_some() { "Yes" } @else { "-" }
                },
                html! { (format_timestamp(&post.created_at)) },
            ])
        })
        .collect();

    Table::new(vec!["No.", "Title", "Sheet", "Created"])
        .variant(TableVariant::Posts)
        .rows(rows)
}
