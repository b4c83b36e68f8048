use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::types::Json;
use thiserror::Error;

/// Number of posts on one page of the paginated listing.
pub const POSTS_PER_PAGE: i64 = 10;

/// A board post.
///
/// `excel_data` is the spreadsheet widget's serialized workbook. It is stored and
/// returned exactly as submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub excel_data: Option<Json<Value>>,
    pub created_at: String,
    pub updated_at: String,
}

impl Post {
    /// The stored workbook, if any.
    #[must_use]
    pub fn excel_data(&self) -> Option<&Value> {
        self.excel_data.as_ref().map(|json| &json.0)
    }
}

/// Request body for create and update, as sent over the wire.
///
/// Every field is optional here so that a missing field surfaces as a
/// [`ValidationError`] rather than a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excel_data: Option<Value>,
}

impl PostInput {
    #[must_use]
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            content: Some(content.into()),
            excel_data: None,
        }
    }

    #[must_use]
    pub fn with_excel_data(mut self, excel_data: Option<Value>) -> Self {
        self.excel_data = excel_data;
        self
    }

    /// Check required fields and the shape of `excelData`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingFields`] when title or content is absent or
    /// blank, and [`ValidationError::ExcelDataNotObject`] when `excelData` is present
    /// but not a JSON object.
    pub fn validate(self) -> Result<NewPost, ValidationError> {
        let title = self.title.filter(|t| !t.trim().is_empty());
        let content = self.content.filter(|c| !c.trim().is_empty());
        let (Some(title), Some(content)) = (title, content) else {
            return Err(ValidationError::MissingFields);
        };

        let excel_data = match self.excel_data {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) => Some(map),
            Some(_) => return Err(ValidationError::ExcelDataNotObject),
        };

        Ok(NewPost {
            title,
            content,
            excel_data,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title and content are required.")]
    MissingFields,
    #[error("excelData must be a JSON object.")]
    ExcelDataNotObject,
}

/// A validated post, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub excel_data: Option<Map<String, Value>>,
}

/// Pagination block of the paged listing response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub page: i64,
    pub total_pages: i64,
    pub total_count: i64,
    pub items_per_page: i64,
}

impl PageSummary {
    #[must_use]
    pub fn new(page: i64, total_count: i64) -> Self {
        Self {
            page,
            total_pages: (total_count + POSTS_PER_PAGE - 1) / POSTS_PER_PAGE,
            total_count,
            items_per_page: POSTS_PER_PAGE,
        }
    }
}

/// One page of posts plus the size of the whole filtered set.
#[derive(Debug, Clone)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub total_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_accepts_minimal_input() {
        let post = PostInput::new("Hi", "Body").validate().unwrap();
        assert_eq!(post.title, "Hi");
        assert_eq!(post.content, "Body");
        assert!(post.excel_data.is_none());
    }

    #[test]
    fn test_validate_rejects_blank_fields() {
        assert_eq!(
            PostInput::new("", "Body").validate(),
            Err(ValidationError::MissingFields)
        );
        assert_eq!(
            PostInput::new("Title", "   ").validate(),
            Err(ValidationError::MissingFields)
        );
        assert_eq!(
            PostInput::default().validate(),
            Err(ValidationError::MissingFields)
        );
    }

    #[test]
    fn test_validate_excel_data_shape() {
        let ok = PostInput::new("t", "c")
            .with_excel_data(Some(json!({"sheets": {}})))
            .validate()
            .unwrap();
        assert!(ok.excel_data.unwrap().contains_key("sheets"));

        let null = PostInput::new("t", "c")
            .with_excel_data(Some(Value::Null))
            .validate()
            .unwrap();
        assert!(null.excel_data.is_none());

        for bad in [json!([1, 2]), json!("sheet"), json!(3)] {
            assert_eq!(
                PostInput::new("t", "c").with_excel_data(Some(bad)).validate(),
                Err(ValidationError::ExcelDataNotObject)
            );
        }
    }

    #[test]
    fn test_post_input_wire_names() {
        let input: PostInput =
            serde_json::from_value(json!({"title": "a", "content": "b", "excelData": null}))
                .unwrap();
        assert_eq!(input.excel_data, None);

        let wire = serde_json::to_value(
            PostInput::new("a", "b").with_excel_data(Some(json!({"k": 1}))),
        )
        .unwrap();
        assert_eq!(wire["excelData"]["k"], 1);
    }

    #[test]
    fn test_page_summary_rounds_up() {
        assert_eq!(PageSummary::new(1, 0).total_pages, 0);
        assert_eq!(PageSummary::new(1, 10).total_pages, 1);
        assert_eq!(PageSummary::new(3, 25).total_pages, 3);
        assert_eq!(PageSummary::new(1, 25).items_per_page, 10);
    }

    #[test]
    fn test_post_serializes_camel_case() {
        let post = Post {
            id: 7,
            title: "t".to_string(),
            content: "c".to_string(),
            excel_data: None,
            created_at: "2024-01-01T00:00:00.000Z".to_string(),
            updated_at: "2024-01-01T00:00:00.000Z".to_string(),
        };
        let value = serde_json::to_value(&post).unwrap();
        assert_eq!(value["createdAt"], "2024-01-01T00:00:00.000Z");
        assert!(value["excelData"].is_null());
    }
}
