//! Maud HTML template components for the board UI.
//!
//! - `layout`: Base page layout and navigation
//! - `alert`: Alert messages and empty-list placeholders
//! - `button`: Configurable button and link-button components
//! - `form`: Form, input, textarea and file-picker elements
//! - `pagination`: Page navigation controls
//! - `table`: Post list, metadata and sheet preview tables
//!
//! # Example
//!
//! ```ignore
//! use maud::html;
//! use crate::components::{Alert, BaseLayout, Button};
//!
//! let content = html! {
//!     h1 { "Posts" }
//!     (Alert::success("Post created successfully."))
//!     (Button::primary("New Post").href("/create"))
//! };
//! BaseLayout::new("Posts").render(content)
//! ```

pub mod alert;
pub mod button;
pub mod form;
pub mod layout;
pub mod pagination;
pub mod table;

pub use alert::{Alert, AlertVariant, EmptyState};
pub use button::{Button, ButtonVariant};
pub use form::{FileInput, Form, FormGroup, Input, TextArea};
pub use layout::BaseLayout;
pub use pagination::Pagination;
pub use table::{markup_row, simple_row, KeyValueTable, ResponsiveTable, Table, TableVariant};
