use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;
use maud::Markup;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::pages::{
    render_detail_page, render_error_page, render_list_page, render_post_form_page,
    ListPageParams, PostFormParams, SheetEditor,
};
use super::FrontendState;
use crate::client::ClientError;
use crate::db::{Post, PostInput};
use crate::spreadsheet::Workbook;

/// Frontend page routes.
pub fn router() -> Router<FrontendState> {
    Router::new()
        .route("/", get(list))
        .route("/create", get(create_form).post(create_submit))
        .route("/board/:id", get(detail))
        .route("/board/:id/delete", post(delete))
        .route("/board/:id/sheet.csv", get(sheet_csv))
        .route("/board/:id/sheet.json", get(sheet_json))
        .route("/edit/:id", get(edit_form).post(edit_submit))
        .route("/healthz", get(health))
}

fn error_page(status: StatusCode, message: &str) -> Response {
    (status, render_error_page(status, message)).into_response()
}

fn not_found_page() -> Response {
    error_page(StatusCode::NOT_FOUND, "Post not found.")
}

/// Map an API failure that is not a form problem to an error page.
fn client_error_page(err: &ClientError) -> Response {
    if err.is_not_found() {
        return not_found_page();
    }
    warn!(error = %err, "Board API request failed");
    error_page(
        StatusCode::BAD_GATEWAY,
        "The board service is unavailable. Please try again later.",
    )
}

/// Ids that do not decode or parse cannot name an existing post.
fn parse_post_id(raw: Result<Path<String>, PathRejection>) -> Option<i64> {
    raw.ok().and_then(|Path(id)| id.parse::<i64>().ok())
}

fn editor(state: &FrontendState) -> SheetEditor<'_> {
    SheetEditor {
        script_url: state.config.spreadsheet_script_url.as_deref(),
        license_key: state.config.spreadsheet_license_key.as_deref(),
    }
}

// ========== Form handling ==========

/// A CSV file picked in the form's import field.
#[derive(Debug)]
struct SheetUpload {
    file_name: String,
    bytes: Vec<u8>,
}

/// Fields of a submitted post form.
#[derive(Debug, Default)]
struct PostForm {
    title: String,
    content: String,
    excel_data: String,
    sheet_file: Option<SheetUpload>,
}

impl PostForm {
    async fn read(mut multipart: Multipart) -> Result<Self, String> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(|e| e.body_text())? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "title" => form.title = field.text().await.map_err(|e| e.body_text())?,
                "content" => form.content = field.text().await.map_err(|e| e.body_text())?,
                "excelData" => form.excel_data = field.text().await.map_err(|e| e.body_text())?,
                "sheetFile" => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let bytes = field.bytes().await.map_err(|e| e.body_text())?;
                    // An empty file input still submits a part.
                    if !bytes.is_empty() {
                        form.sheet_file = Some(SheetUpload {
                            file_name,
                            bytes: bytes.to_vec(),
                        });
                    }
                }
                other => debug!(field = other, "Ignoring unknown form field"),
            }
        }

        Ok(form)
    }

    /// The API request body. An uploaded CSV replaces the editor's workbook.
    fn to_input(&self) -> Result<PostInput, String> {
        let excel_data = if let Some(upload) = &self.sheet_file {
            let workbook = Workbook::from_csv(&upload.bytes, &sheet_name(&upload.file_name))
                .map_err(|e| format!("Could not import {}: {e}", upload.file_name))?;
            Some(workbook.into_value())
        } else if self.excel_data.trim().is_empty() {
            None
        } else {
            let workbook = Workbook::parse(&self.excel_data)
                .map_err(|e| format!("Spreadsheet data could not be read: {e}"))?;
            Some(workbook.into_value())
        };

        Ok(PostInput::new(self.title.clone(), self.content.clone()).with_excel_data(excel_data))
    }

    /// Re-render the form with what the user submitted and why it failed.
    fn render_with_error(
        &self,
        post_id: Option<i64>,
        state: &FrontendState,
        message: &str,
    ) -> Response {
        let params = match post_id {
            Some(id) => PostFormParams::edit(id, editor(state)),
            None => PostFormParams::create(editor(state)),
        };
        let excel_data = Some(self.excel_data.as_str()).filter(|d| !d.trim().is_empty());
        let params = params
            .values(&self.title, &self.content, excel_data)
            .error(message);

        (StatusCode::BAD_REQUEST, render_post_form_page(&params)).into_response()
    }
}

/// Sheet name for an imported file: its stem, or `Sheet1`.
fn sheet_name(file_name: &str) -> String {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let stem = base.rsplit_once('.').map_or(base, |(stem, _)| stem).trim();
    if stem.is_empty() {
        "Sheet1".to_string()
    } else {
        stem.to_string()
    }
}

// ========== Handlers ==========

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    page: Option<String>,
    keyword: Option<String>,
}

impl ListParams {
    fn page(&self) -> i64 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok())
            .unwrap_or(1)
            .max(1)
    }

    fn keyword(&self) -> Option<&str> {
        self.keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

async fn list(
    State(state): State<FrontendState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Response {
    let params = params.map_or_else(
        |rejection| {
            debug!(error = %rejection.body_text(), "Unreadable list query, using defaults");
            ListParams::default()
        },
        |Query(params)| params,
    );
    let keyword = params.keyword();
    match state.client.list_page(params.page(), keyword).await {
        Ok(page) => render_list_page(&ListPageParams {
            posts: &page.posts,
            pagination: &page.pagination,
            keyword,
        })
        .into_response(),
        Err(e) => client_error_page(&e),
    }
}

async fn fetch_post(
    state: &FrontendState,
    raw_id: Result<Path<String>, PathRejection>,
) -> Result<Post, Response> {
    let id = parse_post_id(raw_id).ok_or_else(not_found_page)?;
    state
        .client
        .get_post(id)
        .await
        .map_err(|e| client_error_page(&e))
}

async fn detail(
    State(state): State<FrontendState>,
    id: Result<Path<String>, PathRejection>,
) -> Response {
    match fetch_post(&state, id).await {
        Ok(post) => render_detail_page(&post).into_response(),
        Err(response) => response,
    }
}

async fn create_form(State(state): State<FrontendState>) -> Markup {
    render_post_form_page(&PostFormParams::create(editor(&state)))
}

async fn create_submit(State(state): State<FrontendState>, multipart: Multipart) -> Response {
    let form = match PostForm::read(multipart).await {
        Ok(form) => form,
        Err(message) => return PostForm::default().render_with_error(None, &state, &message),
    };
    let input = match form.to_input() {
        Ok(input) => input,
        Err(message) => return form.render_with_error(None, &state, &message),
    };

    match state.client.create_post(&input).await {
        Ok(()) => {
            info!("Post created via web form");
            Redirect::to("/").into_response()
        }
        Err(ref err @ ClientError::Api { ref message, .. }) if err.is_validation() => {
            form.render_with_error(None, &state, message)
        }
        Err(e) => client_error_page(&e),
    }
}

async fn edit_form(
    State(state): State<FrontendState>,
    id: Result<Path<String>, PathRejection>,
) -> Response {
    let post = match fetch_post(&state, id).await {
        Ok(post) => post,
        Err(response) => return response,
    };

    let excel_data = match post.excel_data().map(serde_json::to_string).transpose() {
        Ok(data) => data,
        Err(e) => {
            warn!(id = post.id, error = %e, "Failed to serialize stored workbook");
            None
        }
    };

    let params = PostFormParams::edit(post.id, editor(&state)).values(
        &post.title,
        &post.content,
        excel_data.as_deref(),
    );
    render_post_form_page(&params).into_response()
}

async fn edit_submit(
    State(state): State<FrontendState>,
    id: Result<Path<String>, PathRejection>,
    multipart: Multipart,
) -> Response {
    let Some(id) = parse_post_id(id) else {
        return not_found_page();
    };
    let form = match PostForm::read(multipart).await {
        Ok(form) => form,
        Err(message) => return PostForm::default().render_with_error(Some(id), &state, &message),
    };
    let input = match form.to_input() {
        Ok(input) => input,
        Err(message) => return form.render_with_error(Some(id), &state, &message),
    };

    match state.client.update_post(id, &input).await {
        Ok(()) => {
            info!(id, "Post updated via web form");
            Redirect::to(&format!("/board/{id}")).into_response()
        }
        Err(ref err @ ClientError::Api { ref message, .. }) if err.is_validation() => {
            form.render_with_error(Some(id), &state, message)
        }
        Err(e) => client_error_page(&e),
    }
}

async fn delete(
    State(state): State<FrontendState>,
    id: Result<Path<String>, PathRejection>,
) -> Response {
    let Some(id) = parse_post_id(id) else {
        return not_found_page();
    };

    match state.client.delete_post(id).await {
        Ok(()) => {
            info!(id, "Post deleted via web form");
            Redirect::to("/").into_response()
        }
        Err(e) => client_error_page(&e),
    }
}

/// The post's workbook, or a 404 page when it has none.
async fn fetch_workbook(
    state: &FrontendState,
    raw_id: Result<Path<String>, PathRejection>,
) -> Result<(i64, Workbook), Response> {
    let post = fetch_post(state, raw_id).await?;
    let value = post.excel_data().cloned().ok_or_else(|| {
        error_page(StatusCode::NOT_FOUND, "This post has no spreadsheet.")
    })?;
    let workbook = Workbook::from_value(value).map_err(|e| {
        warn!(id = post.id, error = %e, "Stored workbook is unreadable");
        error_page(StatusCode::UNPROCESSABLE_ENTITY, "The stored spreadsheet cannot be read.")
    })?;
    Ok((post.id, workbook))
}

fn download(content_type: &str, file_name: &str, body: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    )
        .into_response()
}

async fn sheet_csv(
    State(state): State<FrontendState>,
    id: Result<Path<String>, PathRejection>,
) -> Response {
    let (id, workbook) = match fetch_workbook(&state, id).await {
        Ok(found) => found,
        Err(response) => return response,
    };

    match workbook.to_csv() {
        Ok(csv) => download("text/csv; charset=utf-8", &format!("post-{id}.csv"), csv),
        Err(e) => {
            warn!(id, error = %e, "CSV export failed");
            error_page(StatusCode::INTERNAL_SERVER_ERROR, "Failed to export the spreadsheet.")
        }
    }
}

async fn sheet_json(
    State(state): State<FrontendState>,
    id: Result<Path<String>, PathRejection>,
) -> Response {
    let (id, workbook) = match fetch_workbook(&state, id).await {
        Ok(found) => found,
        Err(response) => return response,
    };

    match workbook.to_pretty_json() {
        Ok(json) => download("application/json", &format!("post-{id}.json"), json.into_bytes()),
        Err(e) => {
            warn!(id, error = %e, "JSON export failed");
            error_page(StatusCode::INTERNAL_SERVER_ERROR, "Failed to export the spreadsheet.")
        }
    }
}

async fn health() -> &'static str {
    "ok"
}
