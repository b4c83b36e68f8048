//! End-to-end tests for the frontend: real API server on an ephemeral port,
//! real client, frontend router driven with `oneshot`.

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use spread_board::client::BoardClient;
use spread_board::config::Config;
use spread_board::db::{Database, PoolSettings, PostInput};
use spread_board::frontend::{self, FrontendState};
use spread_board::web::{self, AppState};
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "----spread-board-test-boundary";

struct Harness {
    app: Router,
    client: BoardClient,
    _temp_dir: TempDir,
}

async fn setup() -> Harness {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db = Database::new(&temp_dir.path().join("board.sqlite"), &PoolSettings::default())
        .await
        .expect("Failed to create database");

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let api = web::create_app(AppState::new(db, Config::for_testing()));
    tokio::spawn(async move {
        axum::serve(listener, api).await.unwrap();
    });

    let mut config = Config::for_testing();
    config.api_base_url = format!("http://{addr}/api");
    let client = BoardClient::new(&config.api_base_url, Duration::from_secs(5)).unwrap();
    let app = frontend::create_app(FrontendState::new(client.clone(), config));

    Harness {
        app,
        client,
        _temp_dir: temp_dir,
    }
}

/// Build a multipart body; `file` is `(name, file_name, contents)`.
fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str, &str)>) -> String {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    if let Some((name, file_name, contents)) = file {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: text/csv\r\n\r\n{contents}\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    body
}

async fn submit(app: &Router, uri: &str, body: String) -> Response {
    let request = Request::post(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_create_via_form_redirects_to_list() {
    let h = setup().await;

    let body = multipart_body(
        &[("title", "Team roster"), ("content", "Who is on call"), ("excelData", "")],
        None,
    );
    let response = submit(&h.app, "/create", body).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let posts = h.client.list_posts().await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].title, "Team roster");
    assert!(posts[0].excel_data.is_none());

    let html = body_text(get(&h.app, "/").await).await;
    assert!(html.contains("Team roster"));
    assert!(html.contains(&format!(r#"href="/board/{}""#, posts[0].id)));
}

#[tokio::test]
async fn test_create_with_blank_title_rerenders_form() {
    let h = setup().await;

    let body = multipart_body(&[("title", "  "), ("content", "kept text")], None);
    let response = submit(&h.app, "/create", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let html = body_text(response).await;
    assert!(html.contains("Title and content are required."));
    assert!(html.contains("kept text</textarea>"));
    assert!(h.client.list_posts().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_csv_upload_becomes_workbook_and_exports() {
    let h = setup().await;

    let body = multipart_body(
        &[("title", "Sales"), ("content", "Monthly"), ("excelData", "")],
        Some(("sheetFile", "sales.csv", "month,total\njan,10\nfeb,\"1,200\"\n")),
    );
    let response = submit(&h.app, "/create", body).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let post = h.client.list_posts().await.unwrap().remove(0);
    let data = post.excel_data().expect("workbook stored");
    assert_eq!(data["sheets"]["sales"]["data"]["dataTable"]["1"]["1"]["value"], 10);

    let html = body_text(get(&h.app, &format!("/board/{}", post.id)).await).await;
    assert!(html.contains("<tr><td>jan</td><td>10</td></tr>"));

    let response = get(&h.app, &format!("/board/{}/sheet.csv", post.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/csv"));
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        format!("attachment; filename=\"post-{}.csv\"", post.id).as_str()
    );
    assert_eq!(
        body_text(response).await,
        "month,total\njan,10\nfeb,\"1,200\"\n"
    );

    let response = get(&h.app, &format!("/board/{}/sheet.json", post.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let exported: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(&exported, data);
}

#[tokio::test]
async fn test_invalid_workbook_json_rerenders_form() {
    let h = setup().await;

    let body = multipart_body(
        &[("title", "T"), ("content", "C"), ("excelData", "[1,2,3]")],
        None,
    );
    let response = submit(&h.app, "/create", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("Spreadsheet data could not be read"));
}

#[tokio::test]
async fn test_edit_keeps_workbook_and_redirects_to_detail() {
    let h = setup().await;
    let workbook = serde_json::json!({ "sheets": { "S": { "data": { "dataTable": {
        "0": { "0": { "value": "kept" } }
    } } } } });
    h.client
        .create_post(&PostInput::new("Old", "Body").with_excel_data(Some(workbook.clone())))
        .await
        .unwrap();
    let id = h.client.list_posts().await.unwrap()[0].id;

    let html = body_text(get(&h.app, &format!("/edit/{id}")).await).await;
    assert!(html.contains(r#"value="Old""#));
    assert!(html.contains("&quot;kept&quot;"));

    // Without the widget the hidden field is posted back as rendered.
    let body = multipart_body(
        &[
            ("title", "New"),
            ("content", "Body"),
            ("excelData", &workbook.to_string()),
        ],
        None,
    );
    let response = submit(&h.app, &format!("/edit/{id}"), body).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/board/{id}"));

    let post = h.client.get_post(id).await.unwrap();
    assert_eq!(post.title, "New");
    assert_eq!(post.excel_data(), Some(&workbook));
}

#[tokio::test]
async fn test_delete_via_form() {
    let h = setup().await;
    h.client.create_post(&PostInput::new("Gone", "soon")).await.unwrap();
    let id = h.client.list_posts().await.unwrap()[0].id;

    let response = h
        .app
        .clone()
        .oneshot(
            Request::post(format!("/board/{id}/delete"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert!(h.client.get_post(id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_missing_post_pages_are_404() {
    let h = setup().await;

    for uri in [
        "/board/99999",
        "/board/abc",
        "/board/%FF",
        "/edit/%FF",
        "/edit/99999",
        "/board/99999/sheet.csv",
    ] {
        let response = get(&h.app, uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
    }

    h.client.create_post(&PostInput::new("No sheet", "x")).await.unwrap();
    let id = h.client.list_posts().await.unwrap()[0].id;
    let response = get(&h.app, &format!("/board/{id}/sheet.json")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("This post has no spreadsheet."));
}

#[tokio::test]
async fn test_list_search_and_pagination() {
    let h = setup().await;
    for i in 0..12 {
        h.client
            .create_post(&PostInput::new(format!("report {i}"), "x"))
            .await
            .unwrap();
    }
    h.client.create_post(&PostInput::new("memo", "x")).await.unwrap();

    let html = body_text(get(&h.app, "/?keyword=report").await).await;
    assert!(html.contains("12 posts with <strong>report</strong> in the title"));
    assert!(html.contains("report 11"));
    assert!(!html.contains("memo"));
    assert!(html.contains(r#"href="/?page=2&amp;keyword=report""#));

    let html = body_text(get(&h.app, "/?page=2&keyword=report").await).await;
    assert!(html.contains("report 0"));
    assert!(!html.contains("report 11"));

    let response = get(&h.app, "/?page=1&page=2").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("memo"));
    assert!(html.contains("13 posts"));
}

#[tokio::test]
async fn test_api_down_renders_bad_gateway() {
    let mut config = Config::for_testing();
    // Nothing listens on port 9 (discard) in the test environment.
    config.api_base_url = "http://127.0.0.1:9/api".to_string();
    let client = BoardClient::new(&config.api_base_url, Duration::from_secs(2)).unwrap();
    let app = frontend::create_app(FrontendState::new(client, config));

    let response = get(&app, "/").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(body_text(response).await.contains("The board service is unavailable."));
}

#[tokio::test]
async fn test_forms_and_health_render() {
    let h = setup().await;

    let response = get(&h.app, "/create").await;
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    let html = body_text(response).await;
    assert!(html.contains("<h1>New Post</h1>"));
    assert!(html.contains(r#"enctype="multipart/form-data""#));

    let response = get(&h.app, "/healthz").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}
