use axum::http::StatusCode;
use maud::{html, Markup};

use crate::components::{Alert, BaseLayout, Button};

/// Full error page for `status`, e.g. a missing post or an unreachable API.
#[must_use]
pub fn render_error_page(status: StatusCode, message: &str) -> Markup {
    let title = status.canonical_reason().unwrap_or("Error");

    let content = html! {
        h1 { (status.as_u16()) " " (title) }
        (Alert::error(message))
        (Button::outline("Back to list").href("/"))
    };

    BaseLayout::new(title).render(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_page() {
        let html = render_error_page(StatusCode::NOT_FOUND, "Post not found.").into_string();
        assert!(html.contains("<h1>404 Not Found</h1>"));
        assert!(html.contains("Post not found."));
        assert!(html.contains("<title>Not Found - Spread Board</title>"));
    }

    #[test]
    fn test_bad_gateway_page() {
        let html = render_error_page(StatusCode::BAD_GATEWAY, "The board service is unavailable.")
            .into_string();
        assert!(html.contains("<h1>502 Bad Gateway</h1>"));
    }
}
