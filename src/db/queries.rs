use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use sqlx::SqliteConnection;

use super::models::{NewPost, Post, PostPage, POSTS_PER_PAGE};

const POST_COLUMNS: &str = "id, title, content, excel_data, created_at, updated_at";

/// Current time in the stored timestamp format (RFC 3339, UTC, milliseconds).
fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn excel_data_text(post: &NewPost) -> Result<Option<String>> {
    post.excel_data
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .context("Failed to serialize excelData")
}

// ========== Posts ==========

/// Get every post, newest first.
pub async fn list_posts(conn: &mut SqliteConnection) -> Result<Vec<Post>> {
    sqlx::query_as(&format!(
        "SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC, id DESC"
    ))
    .fetch_all(conn)
    .await
    .context("Failed to list posts")
}

/// Get a post by its ID.
pub async fn get_post(conn: &mut SqliteConnection, id: i64) -> Result<Option<Post>> {
    sqlx::query_as(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?"))
        .bind(id)
        .fetch_optional(conn)
        .await
        .context("Failed to fetch post by id")
}

/// Insert a new post, returning its ID.
///
/// `created_at` and `updated_at` get the same timestamp.
pub async fn insert_post(conn: &mut SqliteConnection, post: &NewPost) -> Result<i64> {
    let now = now_timestamp();
    let result = sqlx::query(
        r"
        INSERT INTO posts (title, content, excel_data, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        ",
    )
    .bind(&post.title)
    .bind(&post.content)
    .bind(excel_data_text(post)?)
    .bind(&now)
    .bind(&now)
    .execute(conn)
    .await
    .context("Failed to insert post")?;

    Ok(result.last_insert_rowid())
}

/// Replace a post's title, content and workbook, returning the number of rows
/// affected (0 when the post does not exist).
pub async fn update_post(conn: &mut SqliteConnection, id: i64, post: &NewPost) -> Result<u64> {
    // MAX keeps updated_at from going behind created_at if the clock steps back.
    let result = sqlx::query(
        r"
        UPDATE posts
        SET title = ?, content = ?, excel_data = ?, updated_at = MAX(created_at, ?)
        WHERE id = ?
        ",
    )
    .bind(&post.title)
    .bind(&post.content)
    .bind(excel_data_text(post)?)
    .bind(now_timestamp())
    .bind(id)
    .execute(conn)
    .await
    .context("Failed to update post")?;

    Ok(result.rows_affected())
}

/// Delete a post, returning the number of rows affected.
pub async fn delete_post(conn: &mut SqliteConnection, id: i64) -> Result<u64> {
    let result = sqlx::query("DELETE FROM posts WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await
        .context("Failed to delete post")?;

    Ok(result.rows_affected())
}

// ========== Pagination ==========

/// Get one page of posts ranked by descending ID.
///
/// `page` is 1-based. When `keyword` is set, only posts whose title contains it
/// (case-sensitive) are ranked and counted. Both statements run on the same
/// connection.
pub async fn get_posts_page(
    conn: &mut SqliteConnection,
    page: i64,
    keyword: Option<&str>,
) -> Result<PostPage> {
    let start = page.saturating_sub(1).saturating_mul(POSTS_PER_PAGE);
    let end = page.saturating_mul(POSTS_PER_PAGE);

    let posts: Vec<Post> = sqlx::query_as(&format!(
        r"
        SELECT {POST_COLUMNS}
        FROM (
            SELECT {POST_COLUMNS},
                   ROW_NUMBER() OVER (ORDER BY id DESC) AS rn
            FROM posts
            WHERE (? IS NULL OR instr(title, ?) > 0)
        )
        WHERE rn > ? AND rn <= ?
        ORDER BY rn
        "
    ))
    .bind(keyword)
    .bind(keyword)
    .bind(start)
    .bind(end)
    .fetch_all(&mut *conn)
    .await
    .context("Failed to fetch page of posts")?;

    let (total_count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM posts WHERE (? IS NULL OR instr(title, ?) > 0)")
            .bind(keyword)
            .bind(keyword)
            .fetch_one(&mut *conn)
            .await
            .context("Failed to count matching posts")?;

    Ok(PostPage { posts, total_count })
}
