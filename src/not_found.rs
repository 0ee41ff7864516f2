use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::html::error_view;

/// Route handler for any path that does not match a route.
pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}

pub fn get_404_not_found_response() -> Response {
    (
        StatusCode::NOT_FOUND,
        error_view(
            "Not Found",
            "404",
            "Page not found.",
            "Check that the address is correct.",
        ),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::{body::to_bytes, http::StatusCode};
    use scraper::{Html, Selector};

    use super::get_404_not_found_response;

    #[tokio::test]
    async fn renders_not_found_page() {
        let response = get_404_not_found_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let document = Html::parse_document(&String::from_utf8_lossy(&body));
        let header = document
            .select(&Selector::parse("h1").unwrap())
            .next()
            .expect("No h1 in page");
        assert_eq!(header.text().collect::<String>().trim(), "404");
    }
}
