//! Typed HTTP client for the board API.
//!
//! Used by the frontend to talk to `board-server`. Every call decodes the JSON
//! envelope and turns `success: false` into [`ClientError::Api`].

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::db::{PageSummary, Post, PostInput};
use crate::web::envelope::Envelope;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to board API failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("board API returned {status}: {message}")]
    Api { status: StatusCode, message: String },
    #[error("board API response had no data")]
    MissingData,
}

impl ClientError {
    /// The API rejected the request as invalid input.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Api { status, .. } if *status == StatusCode::BAD_REQUEST)
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}

/// One page of posts as returned by `GET /board/page`.
#[derive(Debug, Clone)]
pub struct BoardPage {
    pub posts: Vec<Post>,
    pub pagination: PageSummary,
}

#[derive(Debug, Clone)]
pub struct BoardClient {
    http: Client,
    board_url: String,
}

impl BoardClient {
    /// Create a client for the API rooted at `api_base_url` (e.g. `http://host:3000/api`).
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(api_base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            board_url: format!("{}/board", api_base_url.trim_end_matches('/')),
        })
    }

    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        Self::new(&config.api_base_url, config.api_timeout)
    }

    fn post_url(&self, id: i64) -> String {
        format!("{}/{id}", self.board_url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Envelope<T>, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let envelope: Envelope<T> = response.json().await?;

        if !status.is_success() || !envelope.success {
            return Err(ClientError::Api {
                status,
                message: envelope.message.unwrap_or_default(),
            });
        }
        Ok(envelope)
    }

    /// Fetch every post, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API reports a failure.
    pub async fn list_posts(&self) -> Result<Vec<Post>, ClientError> {
        let envelope = self.send(self.http.get(&self.board_url)).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// Fetch one page of posts, optionally filtered by a title keyword.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API reports a failure, or the
    /// response lacks a pagination block.
    pub async fn list_page(
        &self,
        page: i64,
        keyword: Option<&str>,
    ) -> Result<BoardPage, ClientError> {
        let mut query = vec![("page", page.to_string())];
        if let Some(keyword) = keyword.filter(|k| !k.trim().is_empty()) {
            query.push(("keyword", keyword.to_string()));
        }

        let request = self
            .http
            .get(format!("{}/page", self.board_url))
            .query(&query);
        let envelope: Envelope<Vec<Post>> = self.send(request).await?;

        Ok(BoardPage {
            posts: envelope.data.unwrap_or_default(),
            pagination: envelope.pagination.ok_or(ClientError::MissingData)?,
        })
    }

    /// Fetch a single post.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Api`] with status 404 if the post does not exist.
    pub async fn get_post(&self, id: i64) -> Result<Post, ClientError> {
        let envelope = self.send(self.http.get(self.post_url(id))).await?;
        envelope.data.ok_or(ClientError::MissingData)
    }

    /// Create a post. The API does not report the new post's id.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Api`] with status 400 on invalid input.
    pub async fn create_post(&self, input: &PostInput) -> Result<(), ClientError> {
        let envelope: Envelope<serde_json::Value> =
            self.send(self.http.post(&self.board_url).json(input)).await?;
        debug!(message = envelope.message.as_deref().unwrap_or(""), "Post created");
        Ok(())
    }

    /// Replace a post's title, content and workbook.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Api`] with status 400 on invalid input or 404 if the
    /// post does not exist.
    pub async fn update_post(&self, id: i64, input: &PostInput) -> Result<(), ClientError> {
        let _: Envelope<serde_json::Value> =
            self.send(self.http.put(self.post_url(id)).json(input)).await?;
        Ok(())
    }

    /// Delete a post.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Api`] with status 404 if the post does not exist.
    pub async fn delete_post(&self, id: i64) -> Result<(), ClientError> {
        let _: Envelope<serde_json::Value> = self.send(self.http.delete(self.post_url(id))).await?;
        Ok(())
    }
}
